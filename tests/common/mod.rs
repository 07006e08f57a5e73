//! Test photo fixtures: minimal JPEG files carrying an EXIF block

#![allow(dead_code)]

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};

/// Lens tags to embed in a test photo
#[derive(Debug, Clone, Copy, Default)]
pub struct Photo<'a> {
    pub lens: Option<&'a str>,
    /// Focal length as numerator/denominator
    pub focal: Option<(u32, u32)>,
    /// F-number as numerator/denominator
    pub fnumber: Option<(u32, u32)>,
}

impl<'a> Photo<'a> {
    /// Photo with a whole-millimetre focal length and an f-number in tenths
    pub fn new(lens: &'a str, focal_mm: u32, fnumber_tenths: u32) -> Self {
        Self {
            lens: Some(lens),
            focal: Some((focal_mm, 1)),
            fnumber: Some((fnumber_tenths, 10)),
        }
    }
}

fn rational((num, denom): (u32, u32)) -> Value {
    Value::Rational(vec![Rational { num, denom }])
}

/// TIFF-structured EXIF payload for `photo`
pub fn exif_payload(photo: &Photo) -> Vec<u8> {
    let mut fields = Vec::new();
    if let Some(lens) = photo.lens {
        fields.push(Field {
            tag: Tag::LensModel,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![lens.as_bytes().to_vec()]),
        });
    }
    if let Some(focal) = photo.focal {
        fields.push(Field {
            tag: Tag::FocalLength,
            ifd_num: In::PRIMARY,
            value: rational(focal),
        });
    }
    if let Some(fnumber) = photo.fnumber {
        fields.push(Field {
            tag: Tag::FNumber,
            ifd_num: In::PRIMARY,
            value: rational(fnumber),
        });
    }

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, false).expect("EXIF payload should encode");
    buf.into_inner()
}

/// SOI, APP1 "Exif" segment, EOI
pub fn jpeg_with_exif(photo: &Photo) -> Vec<u8> {
    let payload = exif_payload(photo);
    let segment_len = u16::try_from(2 + 6 + payload.len()).expect("EXIF segment too large");

    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE1];
    bytes.extend_from_slice(&segment_len.to_be_bytes());
    bytes.extend_from_slice(b"Exif\0\0");
    bytes.extend_from_slice(&payload);
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    bytes
}

/// SOI, EOI and nothing else
pub fn jpeg_without_exif() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xD9]
}

/// Write `bytes` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, bytes: &[u8]) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture directory");
    }
    fs::write(&path, bytes).expect("write fixture file");
    path
}

/// Write a JPEG with the given lens tags to `root/relative`
pub fn write_photo(root: &Path, relative: &str, photo: &Photo) -> PathBuf {
    write_file(root, relative, &jpeg_with_exif(photo))
}
