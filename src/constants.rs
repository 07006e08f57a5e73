//! Fixed values shared by the extractor, aggregator and chart renderer

/// Lens metadata conventions
pub mod lens {
    /// Lens model used when the EXIF block carries no `LensModel` tag.
    /// Records with this model are never aggregated.
    pub const UNKNOWN_LENS: &str = "Unknown Lens";

    /// File extensions (lowercase) eligible for metadata extraction
    pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg"];
}

/// Summary and report parameters
pub mod summary {
    /// Number of most frequent apertures/focal lengths listed per lens
    pub const DEFAULT_TOP_N: usize = 5;

    /// Directory label for files sitting directly in the scan root
    pub const ROOT_LABEL: &str = ".";
}

/// Bubble chart layout
pub mod chart {
    /// Spacing between x-axis ticks in millimetres
    pub const TICK_STEP_MM: i64 = 10;

    /// Marker diameter in pixels per square root of the image count
    pub const MARKER_SCALE: f64 = 8.0;

    /// Marker fill opacity (0.0-1.0)
    pub const MARKER_OPACITY: f64 = 0.7;

    /// Chart height floor in pixels
    pub const MIN_HEIGHT_PX: u32 = 400;

    /// Additional chart height per lens row in pixels
    pub const HEIGHT_PER_LENS_PX: u32 = 80;

    /// Left margin reserved for lens names in pixels
    pub const LEFT_MARGIN_PX: u32 = 200;

    /// Static export size (before scaling)
    pub const EXPORT_WIDTH_PX: u32 = 1600;
    pub const EXPORT_HEIGHT_PX: u32 = 900;

    /// Static export pixel multiplier
    pub const EXPORT_SCALE: u32 = 2;

    pub const TITLE: &str = "Focal Length Usage per Lens";
    pub const HTML_FILE_NAME: &str = "lens_focal_usage.html";
    pub const PNG_FILE_NAME: &str = "lens_focal_usage.png";

    /// plotly.js bundle loaded by the interactive document
    pub const PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

    /// Minimum distance between labelled x ticks in the static export (before scaling)
    pub const MIN_TICK_SPACING_PX: u32 = 60;

    /// Font sizes of the static export in pixels (before scaling)
    pub const TITLE_FONT_PX: f32 = 20.0;
    pub const LABEL_FONT_PX: f32 = 13.0;

    /// TrueType fonts tried in order when no font is configured
    pub const FONT_CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
        "/System/Library/Fonts/Helvetica.ttc",
        "C:\\Windows\\Fonts\\arial.ttf",
        "C:\\Windows\\Fonts\\segoeui.ttf",
    ];

    /// Series colors, cycled per lens (plotly default qualitative palette)
    pub const PALETTE: [[u8; 3]; 10] = [
        [0x63, 0x6E, 0xFA],
        [0xEF, 0x55, 0x3B],
        [0x00, 0xCC, 0x96],
        [0xAB, 0x63, 0xFA],
        [0xFF, 0xA1, 0x5A],
        [0x19, 0xD3, 0xF3],
        [0xFF, 0x66, 0x92],
        [0xB6, 0xE8, 0x80],
        [0xFF, 0x97, 0xFF],
        [0xFE, 0xCB, 0x52],
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions_are_lowercase() {
        for ext in lens::SUPPORTED_EXTENSIONS {
            assert_eq!(*ext, ext.to_lowercase());
        }
    }

    #[test]
    fn test_chart_layout_ranges() {
        assert!(chart::MARKER_OPACITY > 0.0 && chart::MARKER_OPACITY <= 1.0);
        assert!(chart::LEFT_MARGIN_PX < chart::EXPORT_WIDTH_PX);
        assert!(chart::TICK_STEP_MM > 0);
        assert!(chart::MIN_TICK_SPACING_PX > 0);
        assert!(chart::FONT_CANDIDATES.iter().all(|p| p.ends_with(".ttf") || p.ends_with(".ttc")));
        assert_ne!(chart::HTML_FILE_NAME, chart::PNG_FILE_NAME);
    }
}
