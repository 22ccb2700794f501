//! Archive configuration.
//!
//! Handles loading, validating, and merging `nsarchive.toml`. Stock defaults
//! reproduce the published archive page, so a missing file is valid and a
//! user file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "NSArchive"          # <title> and page heading
//! intro = "NSArchive is ..."   # Markdown shown above the catalog
//! index_object = "index.html"  # Object name the catalog is published under
//!
//! [storage]
//! url_template = "file/nsarchive/{name}"  # Public URL; {name} = object name
//! checksums = true             # Compute SHA-256 for each listed object
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the config directory.
pub const CONFIG_FILENAME: &str = "nsarchive.toml";

/// Placeholder substituted with the object name in `storage.url_template`.
const NAME_PLACEHOLDER: &str = "{name}";

const DEFAULT_INTRO: &str = "NSArchive is a collection of daily snapshots of \
[NationStates](https://www.nationstates.net) data. NationStates produces two \
daily dumps, [Nations and Regions](https://www.nationstates.net/pages/api.html#dumps), \
which are archived here. Founding data is collected from the \
[World API](https://www.nationstates.net/pages/api.html#worldapi); it is based \
on UTC time and is always one day behind. The source code for this project \
can be viewed on GitHub [here](https://github.com/nsupc/nsarchive).";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Archive configuration loaded from `nsarchive.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Catalog page text and publish location.
    pub site: SiteConfig,
    /// How stored objects are listed and linked.
    pub storage: StorageConfig,
}

impl ArchiveConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.title must not be empty".into(),
            ));
        }
        if self.site.index_object.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.index_object must not be empty".into(),
            ));
        }
        if let Some(category) = Category::ALL
            .into_iter()
            .find(|c| self.site.index_object.starts_with(c.prefix()))
        {
            return Err(ConfigError::Validation(format!(
                "site.index_object must not live under the {} prefix",
                category.prefix()
            )));
        }
        if !self.storage.url_template.contains(NAME_PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "storage.url_template must contain {NAME_PLACEHOLDER}"
            )));
        }
        Ok(())
    }
}

/// Catalog page settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Page `<title>` and top-level heading.
    pub title: String,
    /// Markdown paragraph(s) rendered between the heading and the catalog.
    pub intro: String,
    /// Object name the rendered catalog is published under.
    pub index_object: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "NSArchive".to_string(),
            intro: DEFAULT_INTRO.to_string(),
            index_object: "index.html".to_string(),
        }
    }
}

/// Storage listing and link settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Public access URL for an object; `{name}` is replaced by the object name.
    pub url_template: String,
    /// Whether listings compute a SHA-256 checksum per object.
    pub checksums: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url_template: "file/nsarchive/{name}".to_string(),
            checksums: true,
        }
    }
}

impl StorageConfig {
    /// Resolve the public URL of a stored object.
    pub fn object_url(&self, name: &str) -> String {
        self.url_template.replace(NAME_PLACEHOLDER, name)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ArchiveConfig::default()).expect("default config must serialize")
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

/// Load `nsarchive.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ArchiveConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ArchiveConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `nsarchive.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<ArchiveConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Returns a fully-commented stock `nsarchive.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# NSArchive Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Catalog page
# ---------------------------------------------------------------------------
[site]
# Page <title> and top-level heading.
title = "NSArchive"

# Markdown rendered between the heading and the catalog.
intro = """
NSArchive is a collection of daily snapshots of \
[NationStates](https://www.nationstates.net) data. NationStates produces two \
daily dumps, [Nations and Regions](https://www.nationstates.net/pages/api.html#dumps), \
which are archived here. Founding data is collected from the \
[World API](https://www.nationstates.net/pages/api.html#worldapi); it is based \
on UTC time and is always one day behind. The source code for this project \
can be viewed on GitHub [here](https://github.com/nsupc/nsarchive)."""

# Object name the rendered catalog is published under.
index_object = "index.html"

# ---------------------------------------------------------------------------
# Storage
# ---------------------------------------------------------------------------
[storage]
# Public URL of each archived object. {name} is replaced by the object name,
# e.g. "nations/2024-01-05-nations.xml.gz".
url_template = "file/nsarchive/{name}"

# Compute a SHA-256 checksum for every listed object and show it on the page.
# Reads every archived file, so turn off for very large local mirrors.
checksums = true
"##
}
