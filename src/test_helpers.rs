//! Shared test utilities for the imgsqueeze test suite.
//!
//! Synthesizes small images in memory so tests never depend on fixture files.

use crate::types::SourceImage;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

/// An RGB gradient surface of the given size.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

/// Encode a gradient of the given size into `format`.
pub fn encode_test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    gradient(width, height).write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// A JPEG stored as `width`x`height` with an EXIF Orientation tag.
///
/// The APP1 segment goes right after SOI and holds a big-endian TIFF
/// header with a single IFD0 entry (tag 0x0112, SHORT).
pub fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let jpeg = encode_test_image(width, height, ImageFormat::Jpeg);
    let mut payload = b"Exif\0\0MM\0\x2a\0\0\0\x08".to_vec();
    payload.extend_from_slice(&[0x00, 0x01, 0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    payload.extend_from_slice(&orientation.to_be_bytes());
    payload.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    let len = (payload.len() + 2) as u16;

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// A real PNG source image.
pub fn png_source(name: &str, width: u32, height: u32) -> SourceImage {
    SourceImage::new(name, encode_test_image(width, height, ImageFormat::Png))
}

/// A source understood by [`MockBackend`](crate::imaging::backend::tests::MockBackend).
pub fn mock_source(name: &str, width: u32, height: u32) -> SourceImage {
    SourceImage::new(name, format!("{width}x{height}").into_bytes())
}

/// A source no backend can decode.
pub fn corrupt_source(name: &str) -> SourceImage {
    SourceImage::new(name, b"\x00\x01corrupt\xff".to_vec())
}
