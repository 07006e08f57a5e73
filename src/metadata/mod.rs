//! EXIF metadata extraction module
//!
//! This module handles extraction and normalization of the lens-related
//! EXIF tags: lens model, focal length and f-number.

pub mod extractor;

pub use extractor::{ExifExtractor, LensMetadata};
