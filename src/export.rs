//! Write compressed results to disk.
//!
//! The per-image and bulk "download" actions: each compressed item becomes
//! a `compressed_<stem>.<format>` file (see [`naming`](crate::naming)).
//! Pending and failed items are skipped by [`export_all`].

use crate::batch::{Batch, BatchItem, ImageId};
use crate::naming::{claim_unique_name, output_file_name};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} has not been compressed")]
    NotCompressed(String),
}

fn write_item(item: &BatchItem, path: &Path) -> Result<(), ExportError> {
    let result = item
        .result()
        .ok_or_else(|| ExportError::NotCompressed(item.source.name().to_string()))?;
    fs::write(path, &result.encoded_bytes)?;
    debug!(path = %path.display(), bytes = result.byte_length, "wrote");
    Ok(())
}

/// Save one compressed item into `dir`, returning the written path.
pub fn export_item(item: &BatchItem, dir: &Path) -> Result<PathBuf, ExportError> {
    let result = item
        .result()
        .ok_or_else(|| ExportError::NotCompressed(item.source.name().to_string()))?;
    fs::create_dir_all(dir)?;
    let path = dir.join(output_file_name(item.source.name(), result.format));
    write_item(item, &path)?;
    Ok(path)
}

/// Save every compressed item in `batch` into `dir`.
///
/// Colliding names within the batch get a numeric suffix, so no result
/// overwrites another. Existing files from earlier runs are overwritten.
pub fn export_all(batch: &Batch, dir: &Path) -> Result<Vec<(ImageId, PathBuf)>, ExportError> {
    fs::create_dir_all(dir)?;
    let mut taken = HashSet::new();
    let mut written = Vec::new();

    for item in batch.items() {
        let Some(result) = item.result() else {
            continue;
        };
        let name = claim_unique_name(output_file_name(item.source.name(), result.format), &mut taken);
        let path = dir.join(name);
        write_item(item, &path)?;
        written.push((item.id, path));
    }

    Ok(written)
}
