//! Configuration module.
//!
//! Handles loading, validating, and layering `imgsqueeze.toml`. Stock
//! defaults are overridden by the config file, which is in turn overridden by
//! command-line flags.
//!
//! ## Config File Location
//!
//! `imgsqueeze.toml` in the working directory is picked up automatically.
//! `--config <FILE>` points at any other file (which must then exist).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [transform]
//! quality = 80                  # Encoder quality (10-100), ignored for PNG
//! format = "jpeg"               # jpeg | png | webp
//! max_width = 1920              # Bounding box width in pixels
//! max_height = 1080             # Bounding box height in pixels
//! maintain_aspect_ratio = true  # false = stretch to exactly max_width x max_height
//! filter = "lanczos3"           # nearest | triangle | catmull-rom | gaussian | lanczos3
//!
//! [output]
//! dir = "compressed"            # Where compressed files are written
//!
//! [processing]
//! max_processes = 4             # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::imaging::{OutputFormat, Quality, ResampleFilter, TransformSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "imgsqueeze.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full configuration loaded from `imgsqueeze.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SqueezeConfig {
    /// Settings applied to every image.
    pub transform: TransformConfig,
    /// Where results go.
    pub output: OutputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SqueezeConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.transform;
        if !(Quality::MIN..=Quality::MAX).contains(&t.quality) {
            return Err(ConfigError::Validation(format!(
                "transform.quality must be {}-{}",
                Quality::MIN,
                Quality::MAX
            )));
        }
        if t.max_width == 0 || t.max_height == 0 {
            return Err(ConfigError::Validation(
                "transform.max_width and transform.max_height must be positive".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Transform settings as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    /// Encoder quality, 10 (smallest) to 100 (best). Ignored for PNG.
    pub quality: u32,
    /// Output format for every image.
    pub format: OutputFormat,
    /// Bounding box width in pixels.
    pub max_width: u32,
    /// Bounding box height in pixels.
    pub max_height: u32,
    /// Fit inside the box (downscale only) instead of stretching to it.
    pub maintain_aspect_ratio: bool,
    /// Resampling filter for the resize.
    pub filter: ResampleFilter,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self::from(TransformSettings::default())
    }
}

impl From<TransformSettings> for TransformConfig {
    fn from(s: TransformSettings) -> Self {
        Self {
            quality: s.quality.value(),
            format: s.output_format,
            max_width: s.max_width,
            max_height: s.max_height,
            maintain_aspect_ratio: s.maintain_aspect_ratio,
            filter: s.filter,
        }
    }
}

impl TransformConfig {
    /// The immutable settings snapshot handed to every transform.
    pub fn to_settings(&self) -> TransformSettings {
        TransformSettings {
            quality: Quality::new(self.quality),
            output_format: self.format,
            max_width: self.max_width,
            max_height: self.max_height,
            maintain_aspect_ratio: self.maintain_aspect_ratio,
            filter: self.filter,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory compressed files are written to.
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("compressed"),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub quality: Option<u32>,
    pub format: Option<OutputFormat>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// `Some(false)` turns off aspect-ratio preservation.
    pub maintain_aspect_ratio: Option<bool>,
    pub filter: Option<ResampleFilter>,
    pub output_dir: Option<PathBuf>,
    pub max_processes: Option<usize>,
}

impl Overrides {
    /// Apply on top of `config` and re-validate.
    pub fn apply(self, mut config: SqueezeConfig) -> Result<SqueezeConfig, ConfigError> {
        let t = &mut config.transform;
        if let Some(q) = self.quality {
            t.quality = q;
        }
        if let Some(f) = self.format {
            t.format = f;
        }
        if let Some(w) = self.max_width {
            t.max_width = w;
        }
        if let Some(h) = self.max_height {
            t.max_height = h;
        }
        if let Some(keep) = self.maintain_aspect_ratio {
            t.maintain_aspect_ratio = keep;
        }
        if let Some(f) = self.filter {
            t.filter = f;
        }
        if let Some(dir) = self.output_dir {
            config.output.dir = dir;
        }
        if let Some(n) = self.max_processes {
            config.processing.max_processes = Some(n);
        }
        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SqueezeConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SqueezeConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SqueezeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `imgsqueeze.toml` from `dir`, falling back to stock defaults.
pub fn load_config(dir: &Path) -> Result<SqueezeConfig, ConfigError> {
    let overlay = load_raw_config(&dir.join(CONFIG_FILENAME))?;
    resolve_config(stock_defaults_value()?, overlay)
}

/// Load an explicitly named config file. Missing files are an error.
pub fn load_config_file(path: &Path) -> Result<SqueezeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(stock_defaults_value()?, Some(overlay))
}

/// Returns a fully-commented stock `imgsqueeze.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imgsqueeze Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# imgsqueeze reads ./imgsqueeze.toml, or the file given with --config.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Transform (applied to every image in a batch)
# ---------------------------------------------------------------------------
[transform]
# Encoder quality, 10 (smallest file) to 100 (best fidelity).
# PNG is lossless and ignores this value.
quality = 80

# Output format: "jpeg", "png" or "webp".
# JPEG has no transparency; transparent areas are flattened.
format = "jpeg"

# Bounding box in pixels.
max_width = 1920
max_height = 1080

# true:  shrink to fit inside the box, keeping proportions (never enlarges).
# false: stretch to exactly max_width x max_height (may distort).
maintain_aspect_ratio = true

# Resampling filter: "nearest", "triangle", "catmull-rom", "gaussian", "lanczos3".
filter = "lanczos3"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Directory for compressed_<name>.<format> files.
dir = "compressed"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
