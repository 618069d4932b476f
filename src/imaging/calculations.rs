//! Pure calculation functions for output dimensions and size savings.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;
use super::params::TransformSettings;

/// Fit `source` inside `max` preserving aspect ratio, downscale only.
///
/// `ratio = min(max.width / W, max.height / H)`. A ratio of 1 or more keeps
/// the native size untouched; anything smaller scales both edges by it.
/// Each edge is rounded to the nearest pixel and kept within `[1, max]`.
///
/// # Examples
/// ```
/// # use imgsqueeze::imaging::{Dimensions, calculate_fit_dimensions};
/// let fit = calculate_fit_dimensions(Dimensions::new(4000, 2000), Dimensions::new(1920, 1080));
/// assert_eq!(fit, Dimensions::new(1920, 960));
/// ```
pub fn calculate_fit_dimensions(source: Dimensions, max: Dimensions) -> Dimensions {
    let ratio_w = max.width as f64 / source.width as f64;
    let ratio_h = max.height as f64 / source.height as f64;
    let ratio = ratio_w.min(ratio_h);

    if ratio >= 1.0 {
        return source;
    }

    let scale = |edge: u32, limit: u32| -> u32 {
        ((edge as f64 * ratio).round() as u32).min(limit).max(1)
    };

    Dimensions {
        width: scale(source.width, max.width),
        height: scale(source.height, max.height),
    }
}

/// Compute the output dimensions for `source` under `settings`.
///
/// Aspect-preserving settings fit the image inside the bounding box; otherwise
/// the output is exactly `max_width × max_height`, stretching if needed.
/// Zero-sized bounds are not checked here; see
/// [`plan_transform`](super::operations::plan_transform).
pub fn calculate_target_dimensions(source: Dimensions, settings: &TransformSettings) -> Dimensions {
    let max = Dimensions {
        width: settings.max_width,
        height: settings.max_height,
    };

    if settings.maintain_aspect_ratio {
        calculate_fit_dimensions(source, max)
    } else {
        max
    }
}

/// Percentage saved going from `original` to `compressed` bytes.
///
/// `round((original - compressed) / original * 100)`, rounding halves up.
/// Returns `0` when there is no compressed size yet or the original is empty.
/// Negative when the output grew.
pub fn calculate_savings(original: u64, compressed: Option<u64>) -> i64 {
    let Some(compressed) = compressed else {
        return 0;
    };
    if original == 0 {
        return 0;
    }

    let pct = (original as f64 - compressed as f64) / original as f64 * 100.0;
    (pct + 0.5).floor() as i64
}
