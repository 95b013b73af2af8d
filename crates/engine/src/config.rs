//! State configuration via `stateful.toml`
//!
//! Holds the settings that are part of the stored format and therefore must
//! not change under an existing store: dictionary bucket addressing and
//! array lengths. Edit the file and restart to change them.

use std::collections::BTreeMap;
use std::num::NonZeroU64;
use std::path::Path;

use serde::{Deserialize, Serialize};

use stateful_core::{Error, Result, StateKey};
use stateful_primitives::BucketAddressing;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "stateful.toml";

/// Dictionary settings, the `[dictionary]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// Reduce hash codes modulo this many buckets; raw hash codes when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_modulus: Option<u64>,
}

/// Configuration loaded from `stateful.toml`
///
/// # Example
///
/// ```toml
/// [dictionary]
/// # bucket_modulus = 1024
///
/// [arrays]
/// slots = 16
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatefulConfig {
    /// Dictionary settings
    #[serde(default)]
    pub dictionary: DictionaryConfig,
    /// Array lengths by state name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub arrays: BTreeMap<String, u64>,
}

impl StatefulConfig {
    /// Bucket addressing derived from `[dictionary]`
    ///
    /// # Errors
    ///
    /// Returns `Config` if `bucket_modulus` is zero.
    pub fn bucket_addressing(&self) -> Result<BucketAddressing> {
        match self.dictionary.bucket_modulus {
            None => Ok(BucketAddressing::Raw),
            Some(modulus) => NonZeroU64::new(modulus)
                .map(BucketAddressing::Modulo)
                .ok_or_else(|| Error::Config("dictionary.bucket_modulus must be at least 1".to_string())),
        }
    }

    /// Configured length of the array `name`; names compare case-insensitively
    pub fn array_length(&self, name: &StateKey) -> Option<u64> {
        self.arrays
            .iter()
            .find(|(configured, _)| StateKey::new(configured.as_str()).is_ok_and(|k| k == *name))
            .map(|(_, length)| *length)
    }

    /// Check every setting
    ///
    /// # Errors
    ///
    /// Returns `Config` for a zero bucket modulus, an empty array name or a
    /// zero array length.
    pub fn validate(&self) -> Result<()> {
        self.bucket_addressing()?;
        for (name, length) in &self.arrays {
            if name.is_empty() {
                return Err(Error::Config("array names must not be empty".to_string()));
            }
            if *length < 1 {
                return Err(Error::Config(format!(
                    "array '{}' must have a length of at least 1",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Stateful configuration
#
# These settings are part of the stored format. Changing them for an
# existing store makes its dictionaries and arrays unreadable.

[dictionary]
# Reduce hash codes modulo a fixed number of buckets.
# Leave unset to address buckets by the raw 64-bit hash code.
# bucket_modulus = 1024

# Default lengths for arrays registered with `configured_array`.
[arrays]
# slots = 16
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: StatefulConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::Config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
