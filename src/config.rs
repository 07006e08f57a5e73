//! Configuration structures for the lens usage analysis.
//!
//! All tunable parameters live here, grouped into summary settings and
//! chart settings. Nothing is read from disk unless a caller asks for it:
//!
//! ```no_run
//! use lens_usage::AnalysisConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = AnalysisConfig::from_json_file(Path::new("lens-usage.json"))?;
//!
//! // Or use defaults
//! let config = AnalysisConfig::default();
//! # Ok::<(), lens_usage::LensError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{chart, summary};
use crate::error::{LensError, Result};

/// Complete configuration for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// How many of the most frequent apertures and focal lengths to list per lens
    pub top_n: usize,

    /// Directory that receives exported chart files
    pub output_dir: PathBuf,

    /// Bubble chart settings
    #[serde(default)]
    pub chart: ChartConfig,
}

/// Bubble chart layout and export parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Chart title shown above the plot
    pub title: String,

    /// Marker diameter per square root of image count (pixels)
    pub marker_scale: f64,

    /// Marker fill opacity (0.0-1.0)
    pub marker_opacity: f64,

    /// Minimum chart height in pixels
    pub min_height: u32,

    /// Extra height per lens row in pixels
    pub height_per_lens: u32,

    /// Left margin for lens labels in pixels
    pub left_margin: u32,

    /// Static export width before scaling
    pub export_width: u32,

    /// Static export height before scaling
    pub export_height: u32,

    /// Static export pixel multiplier
    pub export_scale: u32,

    /// File name of the interactive document
    pub html_file_name: String,

    /// File name of the static image
    pub png_file_name: String,

    /// TrueType font for the static image labels; common system fonts are
    /// tried when unset
    pub font_path: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: summary::DEFAULT_TOP_N,
            output_dir: PathBuf::from("."),
            chart: ChartConfig::default(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: chart::TITLE.to_string(),
            marker_scale: chart::MARKER_SCALE,
            marker_opacity: chart::MARKER_OPACITY,
            min_height: chart::MIN_HEIGHT_PX,
            height_per_lens: chart::HEIGHT_PER_LENS_PX,
            left_margin: chart::LEFT_MARGIN_PX,
            export_width: chart::EXPORT_WIDTH_PX,
            export_height: chart::EXPORT_HEIGHT_PX,
            export_scale: chart::EXPORT_SCALE,
            html_file_name: chart::HTML_FILE_NAME.to_string(),
            png_file_name: chart::PNG_FILE_NAME.to_string(),
            font_path: None,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LensError::config(format!("Failed to read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            LensError::config(format!("Failed to parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| {
            LensError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }

    /// Reject values the aggregator or renderer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(LensError::invalid_parameter("top_n", self.top_n));
        }
        self.chart.validate()
    }
}

impl ChartConfig {
    /// Reject degenerate chart dimensions and file names
    pub fn validate(&self) -> Result<()> {
        if !(self.marker_scale > 0.0 && self.marker_scale.is_finite()) {
            return Err(LensError::invalid_parameter("chart.marker_scale", self.marker_scale));
        }
        if !(0.0..=1.0).contains(&self.marker_opacity) {
            return Err(LensError::invalid_parameter("chart.marker_opacity", self.marker_opacity));
        }
        if self.export_width == 0 || self.export_height == 0 {
            return Err(LensError::invalid_parameter(
                "chart.export_size",
                format!("{}x{}", self.export_width, self.export_height),
            ));
        }
        if self.export_scale == 0 {
            return Err(LensError::invalid_parameter("chart.export_scale", self.export_scale));
        }
        if self.left_margin >= self.export_width {
            return Err(LensError::invalid_parameter("chart.left_margin", self.left_margin));
        }
        if self.html_file_name.trim().is_empty() {
            return Err(LensError::invalid_parameter("chart.html_file_name", "<empty>"));
        }
        if self.png_file_name.trim().is_empty() {
            return Err(LensError::invalid_parameter("chart.png_file_name", "<empty>"));
        }
        Ok(())
    }

    /// Interactive chart height for the given number of lens rows
    pub fn height_for(&self, lens_count: usize) -> u32 {
        let rows = u32::try_from(lens_count).unwrap_or(u32::MAX);
        self.min_height.max(self.height_per_lens.saturating_mul(rows))
    }
}
