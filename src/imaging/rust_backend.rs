//! Pure Rust image processing backend (plus `libwebp` for lossy WebP).
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, BMP, TIFF, WebP) | `image::ImageReader` with format sniffing, EXIF orientation applied |
//! | Draw | `image::DynamicImage::resize_exact` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality 10–100, RGB only) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (lossless, quality ignored) |
//! | Encode → WebP | `webp::Encoder` (lossy, quality 10–100) |

use super::backend::{BackendError, Dimensions, ImageBackend, Surface};
use super::params::{OutputFormat, Quality, ResampleFilter};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::borrow::Cow;
use std::io::Cursor;
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("gif", ImageFormat::Gif),
    ("bmp", ImageFormat::Bmp),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    INPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl Surface for DynamicImage {
    fn dimensions(&self) -> Dimensions {
        let (width, height) = image::GenericImageView::dimensions(self);
        Dimensions::new(width, height)
    }
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// PNG can't store float samples; everything else passes through as-is.
fn png_compatible(img: &DynamicImage) -> Cow<'_, DynamicImage> {
    match img {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            Cow::Owned(DynamicImage::ImageRgba16(img.to_rgba16()))
        }
        _ => Cow::Borrowed(img),
    }
}

fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    // JPEG has no alpha channel; flatten to RGB before encoding.
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.value() as u8);
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {e}")))?;
    Ok(buf)
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    png_compatible(img)
        .write_with_encoder(PngEncoder::new(&mut buf))
        .map_err(|e| BackendError::Encode(format!("PNG encode failed: {e}")))?;
    Ok(buf)
}

fn encode_webp(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let rgba = img.to_rgba8();
    let encoder = webp::Encoder::from_rgba(&rgba, rgba.width(), rgba.height());
    let encoded = encoder
        .encode_simple(false, quality.value() as f32)
        .map_err(|e| BackendError::Encode(format!("WebP encode failed: {e:?}")))?;
    Ok(encoded.to_vec())
}

impl ImageBackend for RustBackend {
    type Surface = DynamicImage;

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| BackendError::Decode(format!("failed to read image header: {e}")))?;
        if reader.format().is_none() {
            return Err(BackendError::Decode("unrecognized image format".to_string()));
        }
        let mut decoder = reader
            .into_decoder()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        // Missing or unreadable EXIF means the pixels are already upright.
        let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
        let mut img =
            DynamicImage::from_decoder(decoder).map_err(|e| BackendError::Decode(e.to_string()))?;
        img.apply_orientation(orientation);
        Ok(img)
    }

    fn draw(
        &self,
        surface: &DynamicImage,
        target: Dimensions,
        filter: ResampleFilter,
    ) -> Result<DynamicImage, BackendError> {
        if target.is_empty() {
            return Err(BackendError::Draw(format!(
                "cannot draw into a {target} surface"
            )));
        }
        Ok(surface.resize_exact(target.width, target.height, filter.into()))
    }

    fn encode(
        &self,
        surface: &DynamicImage,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError> {
        if surface.dimensions().is_empty() {
            return Err(BackendError::Encode(format!(
                "cannot encode a {} surface",
                surface.dimensions()
            )));
        }
        match format {
            OutputFormat::Jpeg => encode_jpeg(surface, quality),
            OutputFormat::Png => encode_png(surface),
            OutputFormat::Webp => encode_webp(surface, quality),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{encode_test_image, gradient, jpeg_with_orientation};

    #[test]
    fn supported_extensions_match_decodable_formats() {
        let exts = supported_input_extensions();
        for expected in &["jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp"] {
            assert!(
                exts.contains(expected),
                "expected {expected} in supported extensions"
            );
        }
    }

    #[test]
    fn decode_synthetic_png() {
        let bytes = encode_test_image(200, 150, ImageFormat::Png);
        let img = RustBackend::new().decode(&bytes).unwrap();
        assert_eq!(img.dimensions(), Dimensions::new(200, 150));
    }

    #[test]
    fn decode_synthetic_jpeg() {
        let bytes = encode_test_image(64, 48, ImageFormat::Jpeg);
        let img = RustBackend::new().decode(&bytes).unwrap();
        assert_eq!(img.dimensions(), Dimensions::new(64, 48));
    }

    #[test]
    fn decode_applies_exif_rotation() {
        // Orientation 6: stored landscape, displayed rotated 90° clockwise
        let bytes = jpeg_with_orientation(400, 300, 6);
        let img = RustBackend::new().decode(&bytes).unwrap();
        assert_eq!(img.dimensions(), Dimensions::new(300, 400));
    }

    #[test]
    fn decode_keeps_normal_orientation() {
        let bytes = jpeg_with_orientation(400, 300, 1);
        let img = RustBackend::new().decode(&bytes).unwrap();
        assert_eq!(img.dimensions(), Dimensions::new(400, 300));
    }

    #[test]
    fn decode_garbage_errors() {
        let result = RustBackend::new().decode(b"definitely not an image");
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn decode_truncated_png_errors() {
        let bytes = encode_test_image(50, 50, ImageFormat::Png);
        let result = RustBackend::new().decode(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn draw_produces_exact_size() {
        let backend = RustBackend::new();
        let img = gradient(120, 80);
        let drawn = backend
            .draw(&img, Dimensions::new(30, 50), ResampleFilter::Triangle)
            .unwrap();
        assert_eq!(drawn.dimensions(), Dimensions::new(30, 50));
        // Source surface is untouched.
        assert_eq!(img.dimensions(), Dimensions::new(120, 80));
    }

    #[test]
    fn draw_rejects_zero_area() {
        let backend = RustBackend::new();
        let img = gradient(10, 10);
        let result = backend.draw(&img, Dimensions::new(0, 10), ResampleFilter::Nearest);
        assert!(matches!(result, Err(BackendError::Draw(_))));
    }

    #[test]
    fn encode_jpeg_magic_bytes() {
        let bytes = RustBackend::new()
            .encode(&gradient(10, 10), OutputFormat::Jpeg, Quality::new(80))
            .unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn encode_jpeg_flattens_alpha() {
        let rgba = DynamicImage::ImageRgba8(gradient(16, 16).to_rgba8());
        let bytes = RustBackend::new()
            .encode(&rgba, OutputFormat::Jpeg, Quality::new(80))
            .unwrap();
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn encode_png_magic_bytes() {
        let bytes = RustBackend::new()
            .encode(&gradient(10, 10), OutputFormat::Png, Quality::new(80))
            .unwrap();
        assert_eq!(
            &bytes[0..8],
            &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]
        );
    }

    #[test]
    fn encode_png_ignores_quality() {
        let backend = RustBackend::new();
        let img = gradient(32, 32);
        let low = backend.encode(&img, OutputFormat::Png, Quality::new(10)).unwrap();
        let high = backend.encode(&img, OutputFormat::Png, Quality::new(100)).unwrap();
        assert_eq!(low, high);
    }

    #[test]
    fn encode_png_from_float_surface() {
        let float = DynamicImage::ImageRgb32F(gradient(8, 8).to_rgb32f());
        let bytes = RustBackend::new()
            .encode(&float, OutputFormat::Png, Quality::default())
            .unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn encode_webp_riff_container() {
        let bytes = RustBackend::new()
            .encode(&gradient(10, 10), OutputFormat::Webp, Quality::new(80))
            .unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[test]
    fn lower_jpeg_quality_is_smaller() {
        let backend = RustBackend::new();
        let img = gradient(256, 256);
        let low = backend.encode(&img, OutputFormat::Jpeg, Quality::new(10)).unwrap();
        let high = backend.encode(&img, OutputFormat::Jpeg, Quality::new(100)).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn encode_rejects_empty_surface() {
        let empty = DynamicImage::new_rgb8(0, 0);
        let result = RustBackend::new().encode(&empty, OutputFormat::Png, Quality::default());
        assert!(matches!(result, Err(BackendError::Encode(_))));
    }
}
