//! Values passed into and out of the transform.
//!
//! A [`SourceImage`] is never modified; every transform produces a fresh
//! [`TransformResult`] owned by the caller.

use crate::imaging::{Dimensions, OutputFormat};
use serde::Serialize;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Original image bytes as supplied by the user.
///
/// Bytes are reference-counted so a batch can share them with worker
/// threads without copying.
#[derive(Debug, Clone)]
pub struct SourceImage {
    name: String,
    bytes: Arc<[u8]>,
}

impl SourceImage {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, naming the image after its file name.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    /// Display name, usually the original file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte length of the source ("original size").
    pub fn original_size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Output of one successful transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformResult {
    #[serde(skip)]
    pub encoded_bytes: Vec<u8>,
    pub byte_length: u64,
    pub dimensions: Dimensions,
    pub format: OutputFormat,
}

impl TransformResult {
    pub fn new(encoded_bytes: Vec<u8>, dimensions: Dimensions, format: OutputFormat) -> Self {
        Self {
            byte_length: encoded_bytes.len() as u64,
            encoded_bytes,
            dimensions,
            format,
        }
    }
}
