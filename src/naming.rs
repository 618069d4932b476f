//! Download file names for compressed images.
//!
//! Every result is saved as `compressed_<stem>.<format>`:
//! - `holiday.jpg` as WebP → `compressed_holiday.webp`
//! - `scan.final.png` as JPEG → `compressed_scan.final.jpeg`
//! - `README` as PNG → `compressed_README.png`
//!
//! The stem drops only the last extension. When two images in one export
//! share a stem, later ones get `-2`, `-3`, … appended to the stem.

use crate::imaging::OutputFormat;
use std::collections::HashSet;
use std::path::Path;

pub const OUTPUT_PREFIX: &str = "compressed_";

/// File name without its directory or last extension.
pub fn file_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}

/// Download name for `original_name` encoded as `format`.
pub fn output_file_name(original_name: &str, format: OutputFormat) -> String {
    format!(
        "{OUTPUT_PREFIX}{}.{}",
        file_stem(original_name),
        format.extension()
    )
}

/// Return `name`, or the first `<stem>-N.<ext>` variant not in `taken`.
///
/// The returned name is inserted into `taken`.
pub fn claim_unique_name(name: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.clone()) {
        return name;
    }

    let path = Path::new(&name);
    let stem = file_stem(&name);
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut n = 2;
    loop {
        let candidate = format!("{stem}-{n}{ext}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
