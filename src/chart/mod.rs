//! Focal length bubble chart
//!
//! This module builds the per-lens focal length view of a scan and renders
//! it either as an interactive document opened in the browser, or as a pair
//! of files (HTML document plus PNG image).
//!
//! - x: focal length, ticks every 10mm
//! - y: lens (categorical)
//! - bubble size: `sqrt(image count)`

pub mod figure;
pub mod html;
pub mod raster;
pub mod viewer;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

pub use figure::{ChartPoint, ChartSeries, FocalChart, TickRange};

use crate::config::ChartConfig;
use crate::error::{LensError, Result};
use crate::scanner::ScanIndex;

/// Where the chart goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartOutput {
    /// Open the interactive document in the default browser
    Display,
    /// Write the HTML document and PNG image into a directory
    Export { dir: PathBuf },
}

/// Files written by an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedChart {
    pub html_path: PathBuf,
    pub png_path: PathBuf,
}

/// Result of a successful render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartOutcome {
    /// Document written to this path and handed to the browser
    Displayed { html_path: PathBuf },
    Exported(ExportedChart),
}

/// Renders the bubble chart of a scan
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    config: ChartConfig,
}

impl ChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Build the chart from `index` and send it to `output`
    ///
    /// # Errors
    ///
    /// Returns [`LensError::NoFocalData`] without drawing anything if the
    /// index is empty, or an export/display error if writing or launching
    /// the viewer fails.
    pub fn render(&self, index: &ScanIndex, output: &ChartOutput) -> Result<ChartOutcome> {
        let chart = FocalChart::from_index(index)?;
        match output {
            ChartOutput::Display => self
                .display(&chart)
                .map(|html_path| ChartOutcome::Displayed { html_path }),
            ChartOutput::Export { dir } => self.export(&chart, dir).map(ChartOutcome::Exported),
        }
    }

    /// Write the HTML document and the PNG image into `dir`
    pub fn export(&self, chart: &FocalChart, dir: &Path) -> Result<ExportedChart> {
        fs::create_dir_all(dir).map_err(|e| {
            LensError::chart_export(format!("Failed to create {}", dir.display()), e)
        })?;

        let html_path = dir.join(&self.config.html_file_name);
        self.write_html(chart, &html_path)?;

        let png_path = dir.join(&self.config.png_file_name);
        raster::write_png(chart, &self.config, &png_path)?;

        info!(
            html = %html_path.display(),
            png = %png_path.display(),
            lenses = chart.lens_count(),
            "Chart exported"
        );

        Ok(ExportedChart {
            html_path,
            png_path,
        })
    }

    /// Write the HTML document to the temp directory and open it
    pub fn display(&self, chart: &FocalChart) -> Result<PathBuf> {
        let html_path = std::env::temp_dir().join(&self.config.html_file_name);
        self.write_html(chart, &html_path)?;

        info!(path = %html_path.display(), "Opening chart");
        viewer::open_in_browser(&html_path)?;
        Ok(html_path)
    }

    fn write_html(&self, chart: &FocalChart, path: &Path) -> Result<()> {
        let document = html::render_html(chart, &self.config)?;
        fs::write(path, document)
            .map_err(|e| LensError::chart_export(format!("Failed to write {}", path.display()), e))
    }
}
