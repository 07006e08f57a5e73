//! Console rendering of lens summaries
//!
//! Text serialization only; every number comes from the aggregator.

use std::fmt;

use crate::aggregate::{DirectorySummary, LensSummary, Overview, ValueCount};

/// Format a value the way photographers read it: `2.8`, `50.0`, `4.5`
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// `f/2.8 (12), f/4.0 (3)`
pub fn format_apertures(values: &[ValueCount]) -> String {
    values
        .iter()
        .map(|v| format!("f/{} ({})", format_value(v.value), v.count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `50.0mm (12), 35.0mm (3)`
pub fn format_focal_lengths(values: &[ValueCount]) -> String {
    values
        .iter()
        .map(|v| format!("{}mm ({})", format_value(v.value), v.count))
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_lens(f: &mut fmt::Formatter<'_>, lens: &LensSummary) -> fmt::Result {
    writeln!(f, "Lens: {}", lens.lens)?;
    writeln!(f, "Total Images: {}", lens.total_images)?;
    writeln!(f, "Top Apertures: {}", format_apertures(&lens.top_apertures))?;
    writeln!(f, "Top Focal Lengths: {}", format_focal_lengths(&lens.top_focal_lengths))
}

/// Per-directory lens usage report
pub struct DirectoryReport<'a>(pub &'a [DirectorySummary]);

impl fmt::Display for DirectoryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== Lens Usage Summary ===\n")?;

        for dir in self.0 {
            writeln!(f, "\nDirectory: {}", dir.directory)?;
            writeln!(f, "{}", "=".repeat(14 + dir.directory.chars().count()))?;

            for lens in &dir.lenses {
                writeln!(f)?;
                write_lens(f, lens)?;
            }

            writeln!(f, "\n{}", "-".repeat(70))?;
        }
        Ok(())
    }
}

/// Lens usage report across all directories
pub struct OverviewReport<'a>(pub &'a Overview);

impl fmt::Display for OverviewReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nOVERALL LENS OVERVIEW (All Directories)")?;
        writeln!(f, "{}", "=".repeat(45))?;
        writeln!(f, "\nTotal Images Analysed: {}\n", self.0.total_images)?;

        for lens in &self.0.lenses {
            write_lens(f, lens)?;
            writeln!(f, "{}", "-".repeat(60))?;
        }
        Ok(())
    }
}
