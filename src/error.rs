//! Error types for the lens_usage library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for lens_usage operations
pub type Result<T> = std::result::Result<T, LensError>;

/// Error types for scanning, aggregation and chart rendering
#[derive(Error, Debug)]
pub enum LensError {
    /// Root path does not exist or is not a directory
    #[error("Invalid directory path: {}", path.display())]
    InvalidDirectory { path: PathBuf },

    /// No file under the root produced usable lens metadata
    #[error("No valid EXIF data found under {}", path.display())]
    NoValidData { path: PathBuf },

    /// EXIF metadata could not be read from a single file
    #[error("EXIF processing error: {message}")]
    ExifError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Scan contained no focal lengths to draw
    #[error("No focal length data to plot")]
    NoFocalData,

    /// Chart files could not be written
    #[error("Chart export failed: {message}")]
    ChartExport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Interactive chart could not be opened
    #[error("Chart display failed: {message}")]
    ChartDisplay {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration file could not be loaded or saved
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Report serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LensError {
    /// Create an EXIF processing error with context
    pub fn exif<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ExifError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a chart export error with context
    pub fn chart_export<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ChartExport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a chart display error with context
    pub fn chart_display<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ChartDisplay {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if this error still lets the run finish its remaining steps
    ///
    /// An empty chart only skips the drawing step; the text reports are
    /// already out by then.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LensError::NoFocalData | LensError::ExifError { .. } | LensError::ChartDisplay { .. }
        )
    }

    /// Get user-friendly error description for console display
    pub fn user_message(&self) -> String {
        match self {
            LensError::InvalidDirectory { .. } => "Invalid directory path.".to_string(),
            LensError::NoValidData { .. } => "No valid EXIF data found.".to_string(),
            LensError::NoFocalData => "No focal length data to plot.".to_string(),
            LensError::ChartDisplay { .. } => {
                "Could not open the chart viewer. Use --save-plot to write the chart to files instead."
                    .to_string()
            }
            other => other.to_string(),
        }
    }
}
