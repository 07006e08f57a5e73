//! Command-line interface for lens_usage
//!
//! Prints lens usage reports for a photo directory and shows (or saves)
//! a focal length bubble chart.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use lens_usage::report::{DirectoryReport, OverviewReport};
use lens_usage::{
    analyze_directory, AnalysisConfig, ChartOutcome, ChartOutput, ChartRenderer, LensError,
};

/// Lens usage statistics from photo EXIF metadata
#[derive(Parser)]
#[command(name = "lens-usage")]
#[command(about = "Summarize lens, focal length and aperture usage of a photo directory", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to image directory
    #[arg(name = "DIR")]
    dir: PathBuf,

    /// Save plots to files instead of opening an interactive view
    #[arg(long)]
    save_plot: bool,

    /// Directory the saved plots are written to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Number of most frequent apertures and focal lengths listed per lens
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the summaries as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Log skipped files and scan progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{}", error);
            return ExitCode::from(2);
        }
    };

    let analysis = match analyze_directory(&cli.dir, config.top_n) {
        Ok(analysis) => analysis,
        Err(error @ LensError::InvalidDirectory { .. }) => {
            println!("{}", error.user_message());
            return ExitCode::FAILURE;
        }
        Err(error @ LensError::NoValidData { .. }) => {
            println!("{}", error.user_message());
            return ExitCode::SUCCESS;
        }
        Err(error) => {
            eprintln!("Analysis failed: {}", error);
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match analysis.to_json() {
            Ok(json) => println!("{}", json),
            Err(error) => {
                eprintln!("Error serializing summaries: {}", error);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", DirectoryReport(&analysis.directories));
        print!("{}", OverviewReport(&analysis.overview));
    }

    let output = if cli.save_plot {
        ChartOutput::Export {
            dir: config.output_dir.clone(),
        }
    } else {
        ChartOutput::Display
    };

    let renderer = ChartRenderer::new(config.chart);
    match renderer.render(&analysis.index, &output) {
        Ok(ChartOutcome::Exported(files)) => {
            println!(
                "Plots saved as {} and {}",
                files.html_path.display(),
                files.png_path.display()
            );
            ExitCode::SUCCESS
        }
        Ok(ChartOutcome::Displayed { .. }) => ExitCode::SUCCESS,
        Err(error) if error.is_recoverable() => {
            warn!(error = %error, "Chart skipped");
            println!("{}", error.user_message());
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Chart rendering failed: {}", error);
            ExitCode::FAILURE
        }
    }
}

/// Defaults, then the optional config file, then command-line overrides
fn load_config(cli: &Cli) -> lens_usage::Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };

    if let Some(top) = cli.top {
        config.top_n = top;
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }

    config.validate()?;
    Ok(config)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
