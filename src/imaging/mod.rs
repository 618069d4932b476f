//! Image processing: the resize-and-recode transform.
//!
//! | Step | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (format sniffed from bytes) |
//! | **Size** | [`calculate_target_dimensions`] (pure) |
//! | **Draw** | `resize_exact` with a configurable filter |
//! | **Encode** | JPEG/PNG via `image`, lossy WebP via `webp` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and savings math (unit testable)
//! - **Parameters**: Data structures describing the transform
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`transform`] and friends, combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, Surface};
pub use calculations::{calculate_fit_dimensions, calculate_savings, calculate_target_dimensions};
pub use operations::{TransformError, plan_source, plan_transform, transform, validate_settings};
pub use params::{OutputFormat, Quality, ResampleFilter, TransformSettings};
pub use rust_backend::{RustBackend, supported_input_extensions};
