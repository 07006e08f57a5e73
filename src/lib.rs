//! # Lens Usage
//!
//! A Rust crate for understanding which lenses, focal lengths and apertures
//! a photographer actually uses, based on the EXIF metadata of their photos.
//!
//! This library:
//! - Walks a directory tree of JPEG photos
//! - Extracts lens model, focal length and f-number from each file
//! - Tallies usage per directory and across the whole tree
//! - Renders console reports and a focal length bubble chart
//!
//! ## Example
//!
//! ```rust,no_run
//! use lens_usage::{analyze_directory, report::OverviewReport};
//! use std::path::Path;
//!
//! let analysis = analyze_directory(Path::new("photos"), 5)?;
//! println!("{}", OverviewReport(&analysis.overview));
//! # Ok::<(), lens_usage::LensError>(())
//! ```

use std::path::Path;

use serde::Serialize;

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod constants;
pub mod error;
pub mod metadata;
pub mod report;
pub mod scanner;

pub use aggregate::{Aggregator, DirectorySummary, FrequencyTable, LensSummary, Overview, ValueCount};
pub use chart::{ChartOutcome, ChartOutput, ChartRenderer, ExportedChart, FocalChart};
pub use config::{AnalysisConfig, ChartConfig};
pub use error::{LensError, Result};
pub use metadata::{ExifExtractor, LensMetadata};
pub use scanner::{scan_directory, DirectoryScanner, LensSample, MetadataSource, ScanIndex};

/// Scan result together with its summaries
#[derive(Debug, Clone, Serialize)]
pub struct LensAnalysis {
    /// Raw per-directory, per-lens samples
    #[serde(skip)]
    pub index: ScanIndex,
    /// Lens statistics per directory
    pub directories: Vec<DirectorySummary>,
    /// Lens statistics across all directories
    pub overview: Overview,
}

impl LensAnalysis {
    /// Summarize an existing scan
    pub fn from_index(index: ScanIndex, top_n: usize) -> Self {
        let aggregator = Aggregator::new(top_n);
        let directories = aggregator.directory_summaries(&index);
        let overview = aggregator.overall_overview(&index);
        Self {
            index,
            directories,
            overview,
        }
    }

    /// Summaries as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Scan a photo directory and summarize its lens usage
///
/// This is the main entry point of the library.
///
/// # Arguments
///
/// * `root` - Directory to scan recursively
/// * `top_n` - Number of most frequent apertures/focal lengths listed per lens
///
/// # Errors
///
/// Returns `LensError` if:
/// - `root` is not a directory ([`LensError::InvalidDirectory`])
/// - no photo under `root` carries usable lens metadata ([`LensError::NoValidData`])
pub fn analyze_directory(root: &Path, top_n: usize) -> Result<LensAnalysis> {
    analyze_with(&DirectoryScanner::new(), root, top_n)
}

/// [`analyze_directory`] with a custom scanner
pub fn analyze_with<S: MetadataSource>(
    scanner: &DirectoryScanner<S>,
    root: &Path,
    top_n: usize,
) -> Result<LensAnalysis> {
    let index = scanner.scan(root)?;
    if index.is_empty() {
        return Err(LensError::NoValidData {
            path: root.to_path_buf(),
        });
    }
    Ok(LensAnalysis::from_index(index, top_n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_serialization() {
        let mut index = ScanIndex::new();
        index.insert(".", "Lens A", LensSample::new(50.0, 1.8));
        index.insert(".", "Lens A", LensSample::new(50.0, 2.8));

        let analysis = LensAnalysis::from_index(index, 5);
        let json = analysis.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value.get("index").is_none());
        assert_eq!(value["overview"]["total_images"], 2);
        assert_eq!(value["directories"][0]["directory"], ".");
        assert_eq!(value["overview"]["lenses"][0]["top_focal_lengths"][0]["count"], 2);
    }
}
