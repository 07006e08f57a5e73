//! Bubble chart data model
//!
//! Built straight from the scan index: per lens, how often each focal
//! length was used. Apertures play no part here.

use crate::aggregate::FrequencyTable;
use crate::constants::chart::TICK_STEP_MM;
use crate::error::{LensError, Result};
use crate::scanner::ScanIndex;

/// One bubble: a focal length and the number of photos taken at it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub focal_length_mm: f64,
    pub count: usize,
}

impl ChartPoint {
    /// Marker diameter in pixels, `sqrt(count) * scale`
    pub fn marker_size(&self, scale: f64) -> f64 {
        (self.count as f64).sqrt() * scale
    }
}

/// All bubbles of one lens row
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub lens: String,
    pub points: Vec<ChartPoint>,
}

/// X-axis ticks, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRange {
    pub start: i64,
    pub end: i64,
    pub step: i64,
}

impl TickRange {
    /// Smallest step-aligned range covering `[min, max]`
    pub fn covering(min: f64, max: f64, step: i64) -> Self {
        let step = step.max(1);
        let step_f = step as f64;
        Self {
            start: ((min / step_f).floor() as i64).saturating_mul(step),
            end: ((max / step_f).ceil() as i64).saturating_mul(step),
            step,
        }
    }

    /// Number of step-aligned ticks between `start` and `end`
    pub fn count(&self) -> u64 {
        let span = self.end.abs_diff(self.start);
        span / self.step.unsigned_abs() + 1
    }

    /// Tick values, widened to a multiple of `step` so at most `max_ticks` come out
    ///
    /// A single corrupt focal length can stretch the range to billions of
    /// millimetres; the output stays bounded regardless.
    pub fn ticks(&self, max_ticks: usize) -> Vec<i64> {
        let max_ticks = (max_ticks.max(1)) as u64;
        let stride = self.count().div_ceil(max_ticks).max(1);
        let step = i64::try_from(stride)
            .map_or(i64::MAX, |stride| self.step.saturating_mul(stride));
        let step = usize::try_from(step).unwrap_or(usize::MAX);
        (self.start..=self.end).step_by(step.max(1)).collect()
    }

    /// Axis span with half a step of padding on both sides
    pub fn axis_range(&self) -> (f64, f64) {
        let pad = self.step as f64 / 2.0;
        (self.start as f64 - pad, self.end as f64 + pad)
    }
}

/// Focal length usage per lens, ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct FocalChart {
    pub series: Vec<ChartSeries>,
    pub ticks: TickRange,
}

impl FocalChart {
    /// Count focal lengths per lens across every directory
    ///
    /// # Errors
    ///
    /// Returns [`LensError::NoFocalData`] if the index holds no samples.
    pub fn from_index(index: &ScanIndex) -> Result<Self> {
        let mut series = Vec::new();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for (lens, samples) in index.samples_by_lens() {
            let table: FrequencyTable = samples.iter().map(|s| s.focal_length_mm).collect();
            if table.is_empty() {
                continue;
            }

            let points: Vec<ChartPoint> = table
                .entries()
                .iter()
                .map(|e| ChartPoint {
                    focal_length_mm: e.value,
                    count: e.count,
                })
                .collect();

            for point in &points {
                min = min.min(point.focal_length_mm);
                max = max.max(point.focal_length_mm);
            }

            series.push(ChartSeries {
                lens: lens.to_string(),
                points,
            });
        }

        if series.is_empty() {
            return Err(LensError::NoFocalData);
        }

        Ok(Self {
            series,
            ticks: TickRange::covering(min, max, TICK_STEP_MM),
        })
    }

    /// Number of lens rows
    pub fn lens_count(&self) -> usize {
        self.series.len()
    }

    /// Total photos represented by the chart
    pub fn total_images(&self) -> usize {
        self.series
            .iter()
            .flat_map(|s| s.points.iter())
            .map(|p| p.count)
            .sum()
    }
}
