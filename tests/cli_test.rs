//! Command-line contract of the `lens-usage` binary
//!
//! Exit statuses, diagnostics and the export confirmation, checked by
//! running the built executable against generated photo trees.

mod common;

use std::path::Path;
use std::process::{Command, Output};

use common::{write_file, write_photo, Photo};

fn lens_usage(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lens-usage"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("binary should start")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

// ============================================================================
// Exit Status Tests
// ============================================================================

#[test]
fn test_invalid_directory_exits_with_failure() {
    let output = lens_usage(&["definitely/not/a/directory"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Invalid directory path."));
    assert!(!stdout(&output).contains("Lens Usage Summary"));
}

#[test]
fn test_no_usable_data_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "plain.jpg", &common::jpeg_without_exif());

    let output = lens_usage(&[path_arg(dir.path()), "--save-plot"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("No valid EXIF data found."));
    assert!(!stdout(&output).contains("Lens Usage Summary"));
    assert!(!stdout(&output).contains("Plots saved as"));
}

#[test]
fn test_unparseable_config_exits_with_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "config.json", b"{ not json");

    let output = lens_usage(&[path_arg(dir.path()), "--config", path_arg(&config)]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Configuration error"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_zero_top_exits_with_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    write_photo(dir.path(), "a.jpg", &Photo::new("Lens A", 50, 18));

    let output = lens_usage(&[path_arg(dir.path()), "--top", "0"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("top_n"));
}

// ============================================================================
// Output Tests
// ============================================================================

#[test]
fn test_save_plot_prints_reports_and_confirmation() {
    let photos = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_photo(photos.path(), "a.jpg", &Photo::new("Lens A", 35, 20));
    write_photo(photos.path(), "trip/b.jpg", &Photo::new("Lens B", 85, 18));

    let output = lens_usage(&[
        path_arg(photos.path()),
        "--save-plot",
        "--output-dir",
        path_arg(out.path()),
    ]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("=== Lens Usage Summary ==="));
    assert!(text.contains("Directory: trip\n"));
    assert!(text.contains("OVERALL LENS OVERVIEW (All Directories)"));
    assert!(text.contains("Total Images Analysed: 2"));

    let html = out.path().join("lens_focal_usage.html");
    let png = out.path().join("lens_focal_usage.png");
    let confirmation = format!("Plots saved as {} and {}", html.display(), png.display());
    assert!(text.contains(&confirmation), "stdout: {}", text);
    assert!(html.is_file());
    assert!(png.is_file());
}

#[test]
fn test_reports_survive_chart_failure() {
    let photos = tempfile::tempdir().unwrap();
    write_photo(photos.path(), "a.jpg", &Photo::new("Lens A", 35, 20));
    // A file where the output directory should go
    let blocker = write_file(photos.path(), "charts", b"");

    let output = lens_usage(&[
        path_arg(photos.path()),
        "--save-plot",
        "--output-dir",
        path_arg(&blocker),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Lens: Lens A\nTotal Images: 1\n"));
    assert!(!stdout(&output).contains("Plots saved as"));
    assert!(stderr(&output).contains("Chart rendering failed"));
}

#[test]
fn test_json_output() {
    let photos = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_photo(photos.path(), "a.jpg", &Photo::new("Lens A", 50, 28));
    write_photo(photos.path(), "b.jpg", &Photo::new("Lens A", 50, 40));

    let output = lens_usage(&[
        path_arg(photos.path()),
        "--json",
        "--save-plot",
        "--output-dir",
        path_arg(out.path()),
    ]);

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    let json_end = text.rfind('}').expect("JSON document on stdout");
    let summaries: serde_json::Value = serde_json::from_str(&text[..=json_end]).unwrap();

    assert_eq!(summaries["overview"]["total_images"], 2);
    assert_eq!(summaries["overview"]["lenses"][0]["lens"], "Lens A");
    assert_eq!(summaries["directories"][0]["directory"], ".");
    assert!(!text.contains("=== Lens Usage Summary ==="));
}
