//! Input discovery: turn command-line paths into source images.
//!
//! Files named explicitly are always attempted. Directories contribute files
//! with a supported extension, sorted by name, one level deep unless
//! recursive. Symlinks are followed.
//!
//! Anything that cannot be walked or read becomes an [`UnreadableInput`]
//! instead of aborting the run, so it can be reported next to the batch.

use crate::imaging::supported_input_extensions;
use crate::types::SourceImage;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// A path that never made it into the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnreadableInput {
    pub path: PathBuf,
    pub error: String,
}

impl UnreadableInput {
    fn new(path: PathBuf, error: impl ToString) -> Self {
        let error = error.to_string();
        warn!(path = %path.display(), error = %error, "could not read");
        Self { path, error }
    }
}

/// Paths found by [`discover`] plus the ones that could not be walked.
#[derive(Debug, Default)]
pub struct Discovered {
    pub files: Vec<PathBuf>,
    pub unreadable: Vec<UnreadableInput>,
}

pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| supported_input_extensions().contains(&ext.as_str()))
}

/// Expand `paths` into image files.
pub fn discover(paths: &[PathBuf], recursive: bool) -> Discovered {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut found = Discovered::default();

    for path in paths {
        if !path.is_dir() {
            found.files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path)
            .follow_links(true)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    if has_supported_extension(entry.path()) {
                        found.files.push(entry.into_path());
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    let at = err.path().unwrap_or(path.as_path()).to_path_buf();
                    found.unreadable.push(UnreadableInput::new(at, err));
                }
            }
        }
    }
    found
}

/// Read every file, splitting successes from failures.
pub fn read_sources(files: &[PathBuf]) -> (Vec<SourceImage>, Vec<UnreadableInput>) {
    let mut sources = Vec::new();
    let mut unreadable = Vec::new();
    for path in files {
        match SourceImage::from_path(path) {
            Ok(source) => sources.push(source),
            Err(err) => unreadable.push(UnreadableInput::new(path.clone(), err)),
        }
    }
    (sources, unreadable)
}
