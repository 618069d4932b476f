//! # imgsqueeze
//!
//! Batch image compression: shrink every image to fit a bounding box and
//! re-encode it as JPEG, PNG or WebP at a chosen quality.
//!
//! # Architecture: One Transform, Many Images
//!
//! The core is a single pure operation, [`imaging::transform`], which turns
//! one source image plus one settings snapshot into one encoded result:
//!
//! ```text
//! decode → compute target size → draw at target size → encode
//! ```
//!
//! Everything else is orchestration around it:
//!
//! - [`batch`] runs the transform for many images in parallel and keeps each
//!   outcome paired with the image it came from.
//! - [`export`] writes results as `compressed_<name>.<format>` files.
//! - [`inputs`] expands files and directories into source images.
//! - The CLI (`main.rs`) layers config and prints results.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Transform pipeline: dimension math, backend trait, `image`/`webp` backend |
//! | [`types`] | `SourceImage` and `TransformResult` values |
//! | [`inputs`] | Expands command-line paths into source images, collecting unreadable ones |
//! | [`batch`] | Keyed image collection, parallel processing, per-item status and summary |
//! | [`naming`] | Download file names and collision suffixes |
//! | [`export`] | Writes compressed results to disk |
//! | [`config`] | `imgsqueeze.toml` loading, validation, merging, CLI overrides |
//! | [`output`] | CLI output formatting and JSON report |
//!
//! # Design Decisions
//!
//! ## Downscale Only
//!
//! With aspect ratio preserved, images are only ever shrunk. An image that
//! already fits is re-encoded at its native size, never enlarged. Turning the
//! aspect ratio off stretches every image to exactly the bounding box.
//!
//! ## Partial Failure
//!
//! A corrupt or unsupported image fails on its own. The rest of the batch is
//! still compressed and written, and the CLI exits non-zero afterwards.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling and JPEG/PNG encoding use the `image` crate. Lossy
//! WebP goes through `webp` (libwebp bindings) since `image` only writes
//! lossless WebP. The [`imaging::ImageBackend`] trait keeps all of this behind
//! one seam so the pipeline is tested against a mock without encoding pixels.

pub mod batch;
pub mod config;
pub mod export;
pub mod imaging;
pub mod inputs;
pub mod naming;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
