//! EXIF metadata extraction and parsing
//!
//! Extracts the lens model, focal length and aperture of a photo. Any
//! failure (unreadable file, no EXIF block, malformed values) collapses
//! into "no data" at the public boundary.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use exif::{Exif, Field, In, Reader, Tag, Value};
use serde::Serialize;
use tracing::debug;

use crate::constants::lens::{SUPPORTED_EXTENSIONS, UNKNOWN_LENS};
use crate::error::{LensError, Result};

/// Lens-related EXIF metadata of a single photo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LensMetadata {
    /// Sanitized lens model, or [`UNKNOWN_LENS`] when the tag is missing
    pub lens_model: String,
    /// Focal length in millimetres
    pub focal_length_mm: Option<f64>,
    /// Aperture f-number
    pub aperture: Option<f64>,
}

impl LensMetadata {
    /// Whether the record carries the placeholder lens model
    pub fn is_unknown_lens(&self) -> bool {
        self.lens_model == UNKNOWN_LENS
    }

    /// Focal length and aperture, if this record can be aggregated
    ///
    /// Requires a known lens and strictly positive values for both
    /// numbers. Cameras write 0 for lenses they cannot identify; negative
    /// signed rationals have no optical meaning.
    pub fn usable_values(&self) -> Option<(f64, f64)> {
        if self.is_unknown_lens() {
            return None;
        }
        match (self.focal_length_mm, self.aperture) {
            (Some(focal), Some(aperture)) if focal > 0.0 && aperture > 0.0 => {
                Some((focal, aperture))
            }
            _ => None,
        }
    }
}

/// EXIF metadata extractor
pub struct ExifExtractor;

impl ExifExtractor {
    /// Check whether a file is eligible for extraction (`.jpg` / `.jpeg`)
    pub fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                SUPPORTED_EXTENSIONS.contains(&ext.as_str())
            })
    }

    /// Extract lens metadata from an image file
    ///
    /// # Arguments
    ///
    /// * `image_path` - Path to image file
    ///
    /// # Returns
    ///
    /// The extracted metadata, or `None` if the file cannot be read or
    /// carries no EXIF block
    pub fn extract(image_path: &Path) -> Option<LensMetadata> {
        match Self::read_metadata(image_path) {
            Ok(metadata) => Some(metadata),
            Err(err) => {
                debug!(path = %image_path.display(), error = %err, "No lens metadata");
                None
            }
        }
    }

    /// Read and interpret the EXIF block of a file
    fn read_metadata(image_path: &Path) -> Result<LensMetadata> {
        let file = File::open(image_path).map_err(|e| {
            LensError::exif(format!("Failed to open {}", image_path.display()), e)
        })?;
        let mut reader = BufReader::new(file);

        let exif = Reader::new()
            .read_from_container(&mut reader)
            .map_err(|e| LensError::ExifError {
                message: format!("Failed to read EXIF from {}: {}", image_path.display(), e),
                source: None,
            })?;

        Ok(Self::from_exif(&exif))
    }

    /// Interpret the lens tags of a parsed EXIF block
    fn from_exif(exif: &Exif) -> LensMetadata {
        let lens_model = exif
            .get_field(Tag::LensModel, In::PRIMARY)
            .map(|field| Self::sanitize_lens_model(&Self::field_text(field)))
            .unwrap_or_else(|| UNKNOWN_LENS.to_string());

        let focal_length_mm = exif
            .get_field(Tag::FocalLength, In::PRIMARY)
            .and_then(|field| Self::value_to_float(&field.value));

        let aperture = exif
            .get_field(Tag::FNumber, In::PRIMARY)
            .and_then(|field| Self::value_to_float(&field.value));

        LensMetadata {
            lens_model,
            focal_length_mm,
            aperture,
        }
    }

    /// Raw text of a field; ASCII components are decoded directly, other
    /// value types use their EXIF display form
    fn field_text(field: &Field) -> String {
        match field.value {
            Value::Ascii(ref parts) => parts
                .iter()
                .map(|part| String::from_utf8_lossy(part))
                .collect::<Vec<_>>()
                .join(" "),
            _ => field.display_value().to_string(),
        }
    }

    /// Drop every character outside printable ASCII
    pub fn sanitize_lens_model(text: &str) -> String {
        text.chars()
            .filter(|c| c.is_ascii_graphic() || matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c'))
            .collect()
    }

    /// Convert the first component of an EXIF value to a float
    ///
    /// Rationals are divided out; integer, float and numeric text values
    /// are coerced directly. Non-finite results count as absent.
    fn value_to_float(value: &Value) -> Option<f64> {
        let number = match value {
            Value::Rational(v) => v.first().and_then(|r| Self::rational_to_float(r.num, r.denom)),
            Value::SRational(v) => v.first().and_then(|r| {
                if r.denom == 0 {
                    None
                } else {
                    Some(f64::from(r.num) / f64::from(r.denom))
                }
            }),
            Value::Byte(v) => v.first().map(|&n| f64::from(n)),
            Value::Short(v) => v.first().map(|&n| f64::from(n)),
            Value::Long(v) => v.first().map(|&n| f64::from(n)),
            Value::SByte(v) => v.first().map(|&n| f64::from(n)),
            Value::SShort(v) => v.first().map(|&n| f64::from(n)),
            Value::SLong(v) => v.first().map(|&n| f64::from(n)),
            Value::Float(v) => v.first().map(|&n| f64::from(n)),
            Value::Double(v) => v.first().copied(),
            Value::Ascii(v) => v
                .first()
                .and_then(|bytes| std::str::from_utf8(bytes).ok())
                .and_then(|text| text.trim().parse::<f64>().ok()),
            _ => None,
        }?;

        number.is_finite().then_some(number)
    }

    /// Convert EXIF rational to float
    fn rational_to_float(numerator: u32, denominator: u32) -> Option<f64> {
        if denominator == 0 {
            None
        } else {
            Some(f64::from(numerator) / f64::from(denominator))
        }
    }
}
