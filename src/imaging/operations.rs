//! High-level image operations.
//!
//! These functions combine calculations with backend execution: validate the
//! settings, decode, compute the target size, draw, encode.

use super::backend::{BackendError, Dimensions, ImageBackend, Surface};
use super::calculations::calculate_target_dimensions;
use super::params::TransformSettings;
use crate::types::{SourceImage, TransformResult};
use thiserror::Error;
use tracing::debug;

/// Why a single transform failed. Never affects other images in a batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("could not decode image: {0}")]
    Decode(String),
    #[error("could not encode image: {0}")]
    Encode(String),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

impl From<BackendError> for TransformError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Decode(msg) => Self::Decode(msg),
            BackendError::Draw(msg) | BackendError::Encode(msg) => Self::Encode(msg),
        }
    }
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, TransformError>;

/// Reject settings that would produce a zero-area output.
pub fn validate_settings(settings: &TransformSettings) -> Result<()> {
    if settings.max_width == 0 || settings.max_height == 0 {
        return Err(TransformError::InvalidSettings(format!(
            "max dimensions must be positive, got {}x{}",
            settings.max_width, settings.max_height
        )));
    }
    Ok(())
}

/// Plan a transform without touching pixels.
///
/// Useful for dry runs and for testing dimension logic.
pub fn plan_transform(native: Dimensions, settings: &TransformSettings) -> Result<Dimensions> {
    validate_settings(settings)?;
    Ok(calculate_target_dimensions(native, settings))
}

/// Decode `source` and report its native and planned output dimensions.
pub fn plan_source(
    backend: &impl ImageBackend,
    source: &SourceImage,
    settings: &TransformSettings,
) -> Result<(Dimensions, Dimensions)> {
    validate_settings(settings)?;
    let native = backend.decode(source.bytes())?.dimensions();
    Ok((native, calculate_target_dimensions(native, settings)))
}

/// Resize and re-encode one image.
///
/// Every intermediate surface is dropped before this returns, whether it
/// succeeds or fails.
pub fn transform(
    backend: &impl ImageBackend,
    source: &SourceImage,
    settings: &TransformSettings,
) -> Result<TransformResult> {
    validate_settings(settings)?;

    let drawn = {
        let decoded = backend.decode(source.bytes())?;
        let native = decoded.dimensions();
        let target = calculate_target_dimensions(native, settings);
        debug!(name = source.name(), %native, %target, "resizing");
        backend.draw(&decoded, target, settings.filter)?
    };

    let encoded = backend.encode(&drawn, settings.output_format, settings.quality)?;
    let result = TransformResult::new(encoded, drawn.dimensions(), settings.output_format);

    debug!(
        name = source.name(),
        original = source.original_size(),
        compressed = result.byte_length,
        format = %settings.output_format,
        "encoded"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::params::{OutputFormat, Quality, ResampleFilter};
    use crate::test_helpers::{corrupt_source, mock_source};

    fn settings(max_width: u32, max_height: u32, maintain_aspect_ratio: bool) -> TransformSettings {
        TransformSettings {
            max_width,
            max_height,
            maintain_aspect_ratio,
            ..TransformSettings::default()
        }
    }

    #[test]
    fn plan_wide_source_into_hd_box() {
        let planned = plan_transform(Dimensions::new(4000, 2000), &settings(1920, 1080, true));
        assert_eq!(planned, Ok(Dimensions::new(1920, 960)));
    }

    #[test]
    fn plan_small_source_is_untouched() {
        let planned = plan_transform(Dimensions::new(800, 600), &settings(1920, 1080, true));
        assert_eq!(planned, Ok(Dimensions::new(800, 600)));
    }

    #[test]
    fn plan_without_aspect_is_exact() {
        let planned = plan_transform(Dimensions::new(800, 600), &settings(500, 500, false));
        assert_eq!(planned, Ok(Dimensions::new(500, 500)));
    }

    #[test]
    fn plan_zero_width_is_invalid() {
        let planned = plan_transform(Dimensions::new(800, 600), &settings(0, 500, false));
        assert!(matches!(planned, Err(TransformError::InvalidSettings(_))));
    }

    #[test]
    fn transform_runs_decode_draw_encode_in_order() {
        let backend = MockBackend::new();
        let s = TransformSettings {
            quality: Quality::new(65),
            output_format: OutputFormat::Webp,
            filter: ResampleFilter::CatmullRom,
            ..settings(1920, 1080, true)
        };

        let result = transform(&backend, &mock_source("big.jpg", 4000, 2000), &s).unwrap();

        assert_eq!(result.dimensions, Dimensions::new(1920, 960));
        assert_eq!(result.format, OutputFormat::Webp);
        assert_eq!(result.encoded_bytes, b"webp:1920x960:q65");
        assert_eq!(result.byte_length, result.encoded_bytes.len() as u64);

        assert_eq!(
            backend.get_operations(),
            vec![
                RecordedOp::Decode(Dimensions::new(4000, 2000)),
                RecordedOp::Draw {
                    from: Dimensions::new(4000, 2000),
                    to: Dimensions::new(1920, 960),
                    filter: ResampleFilter::CatmullRom,
                },
                RecordedOp::Encode {
                    dimensions: Dimensions::new(1920, 960),
                    format: OutputFormat::Webp,
                    quality: 65,
                },
            ]
        );
    }

    #[test]
    fn transform_always_draws_even_without_scaling() {
        let backend = MockBackend::new();
        let result = transform(
            &backend,
            &mock_source("small.png", 800, 600),
            &settings(1920, 1080, true),
        )
        .unwrap();

        assert_eq!(result.dimensions, Dimensions::new(800, 600));
        assert!(backend.get_operations().iter().any(|op| matches!(
            op,
            RecordedOp::Draw { to, .. } if *to == Dimensions::new(800, 600)
        )));
    }

    #[test]
    fn transform_stretches_without_aspect() {
        let backend = MockBackend::new();
        let result = transform(
            &backend,
            &mock_source("photo.png", 800, 600),
            &settings(500, 500, false),
        )
        .unwrap();
        assert_eq!(result.dimensions, Dimensions::new(500, 500));
    }

    #[test]
    fn transform_corrupt_source_is_decode_error() {
        let backend = MockBackend::new();
        let result = transform(&backend, &corrupt_source("bad.jpg"), &settings(100, 100, true));
        assert!(matches!(result, Err(TransformError::Decode(_))));
    }

    #[test]
    fn transform_invalid_settings_skips_decoding() {
        let backend = MockBackend::new();
        let result = transform(
            &backend,
            &mock_source("photo.png", 800, 600),
            &settings(500, 0, true),
        );
        assert!(matches!(result, Err(TransformError::InvalidSettings(_))));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn transform_encoder_failure_is_encode_error() {
        let backend = MockBackend::failing_encoder();
        let result = transform(
            &backend,
            &mock_source("photo.png", 800, 600),
            &settings(100, 100, true),
        );
        assert!(matches!(result, Err(TransformError::Encode(_))));
    }

    #[test]
    fn draw_errors_surface_as_encode_errors() {
        let err: TransformError = BackendError::Draw("no".into()).into();
        assert_eq!(err, TransformError::Encode("no".into()));
    }

    #[test]
    fn plan_source_reports_native_and_target() {
        let backend = MockBackend::new();
        let (native, target) = plan_source(
            &backend,
            &mock_source("big.jpg", 4000, 2000),
            &settings(1920, 1080, true),
        )
        .unwrap();
        assert_eq!(native, Dimensions::new(4000, 2000));
        assert_eq!(target, Dimensions::new(1920, 960));
        // No draw or encode for a plan.
        assert_eq!(backend.get_operations().len(), 1);
    }
}
