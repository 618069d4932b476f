//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three capabilities the transform
//! consumes from its host: decode bytes into a pixel surface, draw a surface
//! at a new size, and encode a surface to bytes.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate with `libwebp` for lossy WebP.

use super::params::{OutputFormat, Quality, ResampleFilter};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("draw failed: {0}")]
    Draw(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A decoded pixel buffer owned by a backend.
pub trait Surface {
    fn dimensions(&self) -> Dimensions;
}

/// Trait for image processing backends.
///
/// Surfaces are owned values: whatever a backend allocates for decoding or
/// drawing is released when the surface is dropped, on every exit path.
pub trait ImageBackend: Sync {
    type Surface: Surface;

    /// Decode raw image bytes into a surface at native resolution.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Surface, BackendError>;

    /// Rasterize `surface` into a new surface of exactly `target` size.
    fn draw(
        &self,
        surface: &Self::Surface,
        target: Dimensions,
        filter: ResampleFilter,
    ) -> Result<Self::Surface, BackendError>;

    /// Encode `surface` to `format`. Lossless formats ignore `quality`.
    fn encode(
        &self,
        surface: &Self::Surface,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError>;
}
