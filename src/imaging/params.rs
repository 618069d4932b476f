//! Parameter types for the resize-and-recode transform.
//!
//! These types describe *what* to produce, not *how* to produce it. They are
//! the interface between [`operations`](super::operations) (which decides the
//! target size) and the [`backend`](super::backend) (which does the pixel
//! work), so a mock backend can stand in for the real one in tests.
//!
//! ## Types
//!
//! - [`Quality`] — Encoder fidelity (10–100, default 80). Clamped on construction.
//! - [`OutputFormat`] — JPEG, PNG or WebP.
//! - [`ResampleFilter`] — Which filter the single whole-image draw uses.
//! - [`TransformSettings`] — The shared settings snapshot applied to every image in a batch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality setting for lossy image encoding (10-100).
///
/// Encoders receive this value on their native 0–100 scale, which is the
/// `quality / 100` fidelity fraction scaled back up. Lossless encoders ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quality(u32);

impl Quality {
    pub const MIN: u32 = 10;
    pub const MAX: u32 = 100;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Encoded output format.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    /// File extension used for downloads. Matches the format name.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Resampling filter for the resize draw.
///
/// Any filter satisfies the dimension laws; they differ only in sharpness
/// and speed. `Lanczos3` is the sharpest and the slowest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

/// Settings snapshot shared read-only by every transform in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformSettings {
    pub quality: Quality,
    pub output_format: OutputFormat,
    pub max_width: u32,
    pub max_height: u32,
    /// When false the output is stretched to exactly `max_width × max_height`.
    pub maintain_aspect_ratio: bool,
    pub filter: ResampleFilter,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            quality: Quality::default(),
            output_format: OutputFormat::default(),
            max_width: 1920,
            max_height: 1080,
            maintain_aspect_ratio: true,
            filter: ResampleFilter::default(),
        }
    }
}
