//! Static PNG export of the bubble chart
//!
//! Mirrors the interactive layout: title on top, one labelled row per lens,
//! focal length ticks along the bottom and translucent bubbles. Labels need
//! a TrueType font. Without one the image is still drawn, unlabelled.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{DynamicImage, ImageFormat, Pixel, Rgba, RgbImage, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::{debug, warn};

use super::figure::FocalChart;
use crate::config::ChartConfig;
use crate::constants::chart::{
    FONT_CANDIDATES, LABEL_FONT_PX, MIN_TICK_SPACING_PX, PALETTE, TITLE_FONT_PX,
};
use crate::error::{LensError, Result};

/// Unscaled margins besides the configurable left one
const RIGHT_MARGIN_PX: u32 = 40;
const TOP_MARGIN_PX: u32 = 80;
const BOTTOM_MARGIN_PX: u32 = 60;

/// Tick mark length below the x-axis
const TICK_LENGTH_PX: u32 = 6;

/// Gap between the plot area and its labels
const LABEL_GAP_PX: f64 = 8.0;

const X_AXIS_TITLE: &str = "Focal Length (mm)";

const BACKGROUND: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);
const PLOT_BACKGROUND: Rgba<u8> = Rgba([0xE5, 0xEC, 0xF6, 0xFF]);
const GRID: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);
const AXIS: Rgba<u8> = Rgba([0x44, 0x44, 0x44, 0xFF]);
const TEXT: Rgba<u8> = Rgba([0x2A, 0x3F, 0x5F, 0xFF]);

/// Pixel bounds of the plot area
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl PlotArea {
    fn new(width: u32, height: u32, config: &ChartConfig) -> Self {
        let scale = f64::from(config.export_scale);
        let left = f64::from(config.left_margin) * scale;
        let right = (f64::from(width) - f64::from(RIGHT_MARGIN_PX) * scale).max(left + 1.0);
        let top = f64::from(TOP_MARGIN_PX) * scale;
        let bottom = (f64::from(height) - f64::from(BOTTOM_MARGIN_PX) * scale).max(top + 1.0);
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    fn x_for(&self, value: f64, range: (f64, f64)) -> f64 {
        let (min, max) = range;
        self.left + (value - min) / (max - min) * (self.right - self.left)
    }

    /// Row centers from the bottom up, matching a category axis
    fn y_for_row(&self, row: usize, rows: usize) -> f64 {
        let band = (self.bottom - self.top) / rows.max(1) as f64;
        self.bottom - (row as f64 + 0.5) * band
    }

    /// How many x ticks fit without their labels running into each other
    fn max_ticks(&self, scale: f64) -> usize {
        let spacing = f64::from(MIN_TICK_SPACING_PX) * scale;
        ((self.right - self.left) / spacing).floor().max(1.0) as usize + 1
    }
}

/// Load the label font: the configured one, else the first system font found
pub fn load_font(config: &ChartConfig) -> Option<FontVec> {
    let candidates: Vec<PathBuf> = match &config.font_path {
        Some(path) => vec![path.clone()],
        None => FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
    };

    for path in &candidates {
        let Ok(bytes) = fs::read(path) else {
            continue;
        };
        match FontVec::try_from_vec(bytes) {
            Ok(font) => {
                debug!(font = %path.display(), "Loaded chart font");
                return Some(font);
            }
            Err(err) => debug!(font = %path.display(), error = %err, "Unusable font file"),
        }
    }

    warn!("No usable TrueType font found, PNG chart is drawn without labels");
    None
}

/// Rasterize the chart at `export_width x export_height` times `export_scale`
pub fn render_png(chart: &FocalChart, config: &ChartConfig, font: Option<&FontVec>) -> RgbImage {
    let width = config.export_width.saturating_mul(config.export_scale).max(1);
    let height = config.export_height.saturating_mul(config.export_scale).max(1);
    let scale = f64::from(config.export_scale);

    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);
    let area = PlotArea::new(width, height, config);
    let range = chart.ticks.axis_range();
    let rows = chart.lens_count();
    let ticks = chart.ticks.ticks(area.max_ticks(scale));

    fill(&mut img, area.left, area.top, area.right, area.bottom, PLOT_BACKGROUND);

    let line = scale.max(1.0);
    let tick_bottom = area.bottom + f64::from(TICK_LENGTH_PX) * scale;
    for &tick in &ticks {
        let x = area.x_for(tick as f64, range);
        fill(&mut img, x - line / 2.0, area.top, x + line / 2.0, area.bottom, GRID);
        fill(&mut img, x - line / 2.0, area.bottom, x + line / 2.0, tick_bottom, AXIS);
    }
    for row in 0..rows {
        let y = area.y_for_row(row, rows);
        fill(&mut img, area.left, y - line / 2.0, area.right, y + line / 2.0, GRID);
    }

    // x-axis baseline
    fill(&mut img, area.left, area.bottom, area.right, area.bottom + line, AXIS);

    for (row, series) in chart.series.iter().enumerate() {
        let color = bubble_color(row, config.marker_opacity);
        let y = area.y_for_row(row, rows);
        for point in &series.points {
            let x = area.x_for(point.focal_length_mm, range);
            let radius = point.marker_size(config.marker_scale) / 2.0 * scale;
            fill_circle(&mut img, x, y, radius, color);
        }
    }

    if let Some(font) = font {
        let labels = Labels {
            font,
            title: PxScale::from(TITLE_FONT_PX * scale as f32),
            label: PxScale::from(LABEL_FONT_PX * scale as f32),
        };
        let gap = LABEL_GAP_PX * scale;

        let title_y = (area.top - f64::from(labels.title.y)) / 2.0;
        labels.draw(&mut img, labels.title, &config.title, area.left, title_y);

        let tick_label_y = tick_bottom + gap / 2.0;
        for &tick in &ticks {
            let text = format!("{tick}mm");
            let x = area.x_for(tick as f64, range) - f64::from(labels.width(labels.label, &text)) / 2.0;
            labels.draw(&mut img, labels.label, &text, x, tick_label_y);
        }

        let axis_title_y = tick_label_y + f64::from(labels.label.y) + gap / 2.0;
        let axis_title_x = (area.left + area.right) / 2.0
            - f64::from(labels.width(labels.label, X_AXIS_TITLE)) / 2.0;
        labels.draw(&mut img, labels.label, X_AXIS_TITLE, axis_title_x, axis_title_y);

        let max_lens_width = (area.left - 2.0 * gap).max(0.0) as f32;
        for (row, series) in chart.series.iter().enumerate() {
            let text = labels.fit(labels.label, &series.lens, max_lens_width);
            let x = area.left - gap - f64::from(labels.width(labels.label, &text));
            let y = area.y_for_row(row, rows) - f64::from(labels.label.y) / 2.0;
            labels.draw(&mut img, labels.label, &text, x, y);
        }
    }

    DynamicImage::ImageRgba8(img).into_rgb8()
}

/// Rasterize the chart and write it as PNG
pub fn write_png(chart: &FocalChart, config: &ChartConfig, path: &Path) -> Result<()> {
    let font = load_font(config);
    render_png(chart, config, font.as_ref())
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| LensError::chart_export(format!("Failed to write {}", path.display()), e))
}

/// Text drawing with one font at two sizes
struct Labels<'a> {
    font: &'a FontVec,
    title: PxScale,
    label: PxScale,
}

impl Labels<'_> {
    /// Advance width of `text` in pixels
    fn width(&self, size: PxScale, text: &str) -> f32 {
        let scaled = self.font.as_scaled(size);
        text.chars().map(|c| scaled.h_advance(scaled.glyph_id(c))).sum()
    }

    /// `text`, shortened with a trailing "..." until it fits in `max_width`
    fn fit(&self, size: PxScale, text: &str, max_width: f32) -> String {
        if self.width(size, text) <= max_width {
            return text.to_string();
        }
        let mut chars: Vec<char> = text.chars().collect();
        while !chars.is_empty() {
            chars.pop();
            let candidate = format!("{}...", chars.iter().collect::<String>().trim_end());
            if self.width(size, &candidate) <= max_width {
                return candidate;
            }
        }
        String::new()
    }

    /// Draw `text` with its top-left corner at (`x`, `y`)
    fn draw(&self, img: &mut RgbaImage, size: PxScale, text: &str, x: f64, y: f64) {
        draw_text_mut(img, TEXT, x.round() as i32, y.round() as i32, size, self.font, text);
    }
}

/// Palette color of a lens row with the marker opacity as alpha
fn bubble_color(row: usize, opacity: f64) -> Rgba<u8> {
    let [r, g, b] = PALETTE[row % PALETTE.len()];
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([r, g, b, alpha])
}

/// Opaque rectangle between two corners, clipped to the image
fn fill(img: &mut RgbaImage, left: f64, top: f64, right: f64, bottom: f64, color: Rgba<u8>) {
    let width = (right - left).round().max(1.0) as u32;
    let height = (bottom - top).round().max(1.0) as u32;
    let rect = Rect::at(left.round() as i32, top.round() as i32).of_size(width, height);
    draw_filled_rect_mut(img, rect, color);
}

/// Disc alpha-blended over what is already drawn, each pixel blended once
fn fill_circle(img: &mut RgbaImage, cx: f64, cy: f64, radius: f64, color: Rgba<u8>) {
    let (width, height) = img.dimensions();
    let r2 = radius * radius;
    for y in span(cy - radius, cy + radius + 1.0, height) {
        for x in span(cx - radius, cx + radius + 1.0, width) {
            let dx = f64::from(x) + 0.5 - cx;
            let dy = f64::from(y) + 0.5 - cy;
            if dx * dx + dy * dy <= r2 {
                img.get_pixel_mut(x, y).blend(&color);
            }
        }
    }
}

/// Pixel span `[from, to)` clamped to `0..limit`
fn span(from: f64, to: f64, limit: u32) -> std::ops::Range<u32> {
    let start = from.round().clamp(0.0, f64::from(limit)) as u32;
    let end = to.round().clamp(0.0, f64::from(limit)) as u32;
    start..end.max(start)
}
