//! Scale configuration.
//!
//! Handles loading, validating, and merging resize settings. Configuration is
//! layered: stock defaults are overridden by an optional `config.toml`, which
//! is in turn overridden by whatever the caller supplies (CLI flags, or a
//! partial table at runtime).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//! max_width = 300     # Fit bound on width, 0 = unset
//! max_height = 0      # Fit bound on height, 0 = unset
//! thumb_size = 50     # Square thumbnail edge, 0 = unset
//! quality = 0.8       # Lossy encoding quality, 0.0 - 1.0
//! ```
//!
//! The camelCase spellings `maxWidth`, `maxHeight` and `thumbSize` are accepted
//! as aliases.
//!
//! ## Partial Configuration
//!
//! Every merge is shallow: only the supplied keys change, everything else keeps
//! its prior value. Merging never resets a field to its default.
//!
//! Unknown keys are kept, carried through later merges, and ignored by the
//! pipeline.

use crate::imaging::Quality;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Resize settings.
///
/// Zero means "unset" for all three dimensions. Whether the bounds are usable
/// is decided per image by the fit resolver, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Fit bound on width in pixels.
    #[serde(alias = "maxWidth")]
    pub max_width: u32,
    /// Fit bound on height in pixels.
    #[serde(alias = "maxHeight")]
    pub max_height: u32,
    /// Edge of the square thumbnail in pixels.
    #[serde(alias = "thumbSize")]
    pub thumb_size: u32,
    /// Encoder quality for lossy formats.
    pub quality: Quality,
    /// Keys this crate does not know about, retained verbatim.
    #[serde(flatten)]
    pub extra: toml::Table,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            max_width: 300,
            max_height: 0,
            thumb_size: 50,
            quality: Quality::default(),
            extra: toml::Table::new(),
        }
    }
}

/// A partial update to a [`ScaleConfig`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaleConfigUpdate {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub thumb_size: Option<u32>,
    pub quality: Option<Quality>,
}

impl ScaleConfigUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ScaleConfig {
    /// Shallow merge: a new config with only the supplied fields replaced.
    pub fn merged(&self, update: &ScaleConfigUpdate) -> Self {
        Self {
            max_width: update.max_width.unwrap_or(self.max_width),
            max_height: update.max_height.unwrap_or(self.max_height),
            thumb_size: update.thumb_size.unwrap_or(self.thumb_size),
            quality: update.quality.unwrap_or(self.quality),
            extra: self.extra.clone(),
        }
    }

    /// [`merged`](Self::merged), then [`validate`](Self::validate) the result.
    ///
    /// Use at the point where outside input (CLI flags) is applied.
    pub fn try_merged(&self, update: &ScaleConfigUpdate) -> Result<Self, ConfigError> {
        let config = self.merged(update);
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let q = self.quality.value();
        if !q.is_finite() || !(0.0..=1.0).contains(&q) {
            return Err(ConfigError::Validation(format!(
                "quality must be between 0 and 1, got {q}"
            )));
        }
        Ok(())
    }
}

/// Resolve the effective worker count for batch processing.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1 (user can constrain down, not up)
pub fn effective_threads(requested: Option<usize>) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    requested.map(|n| n.clamp(1, cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

const KEY_ALIASES: &[(&str, &str)] = &[
    ("maxWidth", "max_width"),
    ("maxHeight", "max_height"),
    ("thumbSize", "thumb_size"),
];

/// Rewrite camelCase aliases to their canonical keys so an overlay replaces
/// the base value instead of sitting next to it.
fn canonical_keys(table: toml::Table) -> toml::Table {
    table
        .into_iter()
        .map(|(key, value)| {
            let key = KEY_ALIASES
                .iter()
                .find(|(alias, _)| *alias == key)
                .map(|(_, canonical)| canonical.to_string())
                .unwrap_or(key);
            (key, value)
        })
        .collect()
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ScaleConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in canonical_keys(overlay_table) {
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

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ScaleConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ScaleConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Merge an untyped partial table onto an existing config.
///
/// Keys absent from `partial` keep their value in `old`; unknown keys in
/// either are carried into the result.
pub fn merge_config(old: &ScaleConfig, partial: toml::Table) -> Result<ScaleConfig, ConfigError> {
    let base = toml::Value::try_from(old)?;
    resolve_config(base, Some(toml::Value::Table(partial)))
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from a TOML file layered on the stock defaults.
///
/// A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<ScaleConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Resizer Configuration
# =====================
# All settings are optional. Values shown below are the defaults.
# CLI flags override values from this file.
# Unknown keys are kept and ignored.

# Fit bound on width in pixels (0 = unset).
# With only max_width set, every image is scaled to exactly this width.
max_width = 300

# Fit bound on height in pixels (0 = unset).
# With both bounds set, landscape and square images snap to max_width,
# portrait images snap to max_height.
max_height = 0

# Edge of the square thumbnail in pixels (0 = unset).
thumb_size = 50

# Lossy encoding quality, 0.0 (worst) to 1.0 (best).
# Ignored by lossless output formats (PNG, WebP).
quality = 0.8
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = ScaleConfig::default();
        assert_eq!(config.max_width, 300);
        assert_eq!(config.max_height, 0);
        assert_eq!(config.thumb_size, 50);
        assert_eq!(config.quality, Quality(0.8));
        assert!(config.extra.is_empty());
    }

    #[test]
    fn stock_toml_parses_to_defaults() {
        let config: ScaleConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, ScaleConfig::default());
    }

    // =========================================================================
    // Typed merge
    // =========================================================================

    #[test]
    fn merged_replaces_only_supplied_fields() {
        let config = ScaleConfig::default().merged(&ScaleConfigUpdate {
            max_height: Some(200),
            ..ScaleConfigUpdate::default()
        });
        assert_eq!(config.max_width, 300);
        assert_eq!(config.max_height, 200);
        assert_eq!(config.thumb_size, 50);
        assert_eq!(config.quality, Quality(0.8));
    }

    #[test]
    fn merged_is_not_a_reset() {
        let first = ScaleConfig::default().merged(&ScaleConfigUpdate {
            quality: Some(Quality::new(0.5)),
            ..ScaleConfigUpdate::default()
        });
        let second = first.merged(&ScaleConfigUpdate {
            max_width: Some(0),
            ..ScaleConfigUpdate::default()
        });
        assert_eq!(second.quality, Quality(0.5));
        assert_eq!(second.max_width, 0);
    }

    #[test]
    fn empty_update_is_identity() {
        let config = ScaleConfig::default();
        let update = ScaleConfigUpdate::default();
        assert!(update.is_empty());
        assert_eq!(config.merged(&update), config);
    }

    #[test]
    fn try_merged_rejects_out_of_range_quality() {
        let result = ScaleConfig::default().try_merged(&ScaleConfigUpdate {
            quality: Some(Quality(1.5)),
            ..ScaleConfigUpdate::default()
        });
        assert!(matches!(result, Err(ConfigError::Validation(ref m)) if m.contains("1.5")));
    }

    #[test]
    fn try_merged_applies_valid_update() {
        let config = ScaleConfig::default()
            .try_merged(&ScaleConfigUpdate {
                thumb_size: Some(96),
                quality: Some(Quality(0.25)),
                ..ScaleConfigUpdate::default()
            })
            .unwrap();
        assert_eq!(config.thumb_size, 96);
        assert_eq!(config.quality, Quality(0.25));
        assert_eq!(config.max_width, 300);
    }

    // =========================================================================
    // Untyped merge
    // =========================================================================

    #[test]
    fn merge_config_keeps_unknown_keys() {
        let partial: toml::Table = toml::from_str("test = 'test'\nmax_width = 120").unwrap();
        let config = merge_config(&ScaleConfig::default(), partial).unwrap();
        assert_eq!(config.max_width, 120);
        assert_eq!(config.quality, Quality(0.8));
        assert_eq!(
            config.extra.get("test"),
            Some(&toml::Value::String("test".into()))
        );

        // Carried through a second merge
        let partial: toml::Table = toml::from_str("thumb_size = 64").unwrap();
        let config = merge_config(&config, partial).unwrap();
        assert_eq!(config.thumb_size, 64);
        assert_eq!(config.max_width, 120);
        assert!(config.extra.contains_key("test"));
    }

    #[test]
    fn merge_config_accepts_camel_case_aliases() {
        let partial: toml::Table = toml::from_str("maxWidth = 0\nmaxHeight = 300").unwrap();
        let config = merge_config(&ScaleConfig::default(), partial).unwrap();
        assert_eq!(config.max_width, 0);
        assert_eq!(config.max_height, 300);
        assert!(config.extra.is_empty());
    }

    #[test]
    fn merge_config_rejects_bad_quality() {
        let partial: toml::Table = toml::from_str("quality = 1.5").unwrap();
        let result = merge_config(&ScaleConfig::default(), partial);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn merge_config_rejects_wrong_type() {
        let partial: toml::Table = toml::from_str("max_width = 'wide'").unwrap();
        let result = merge_config(&ScaleConfig::default(), partial);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn merge_toml_is_key_by_key() {
        let base: toml::Value = toml::from_str("a = 1\n[t]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[t]\ny = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["t"]["x"].as_integer(), Some(1));
        assert_eq!(merged["t"]["y"].as_integer(), Some(3));
    }

    // =========================================================================
    // File loading
    // =========================================================================

    #[test]
    fn load_config_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config, ScaleConfig::default());
    }

    #[test]
    fn load_config_sparse_file_overrides() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "maxHeight = 480\nquality = 0.6\nowner = 'ops'\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.max_width, 300);
        assert_eq!(config.max_height, 480);
        assert_eq!(config.quality, Quality(0.6));
        assert!(config.extra.contains_key("owner"));
    }

    #[test]
    fn load_config_invalid_toml_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "max_width = = 3").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn effective_threads_clamps_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(None), cores);
        assert_eq!(effective_threads(Some(usize::MAX)), cores);
        assert_eq!(effective_threads(Some(0)), 1);
        assert_eq!(effective_threads(Some(1)), 1);
    }
}
