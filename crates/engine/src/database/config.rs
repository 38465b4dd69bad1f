//! Database configuration via `entrystore.toml`
//!
//! On first open, a default `entrystore.toml` is created in the data
//! directory. To change settings, edit the file and reopen.

use entrystore_core::{Error, Limits, Result};
use entrystore_durability::DurabilityMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name placed in the database data directory.
pub const CONFIG_FILE_NAME: &str = "entrystore.toml";

/// Default number of mutations between automatic checkpoints.
pub const DEFAULT_CHECKPOINT_EVERY: u64 = 10_000;

/// Database configuration loaded from `entrystore.toml`.
///
/// # Example
///
/// ```toml
/// durability = "standard"
/// checkpoint_every = 10000
/// # max_entries = 1000000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Durability mode: `"standard"` or `"always"`.
    #[serde(default = "default_durability_str")]
    pub durability: String,
    /// Mutations between automatic checkpoints. `0` disables them.
    #[serde(default = "default_checkpoint_every")]
    pub checkpoint_every: u64,
    /// Optional cap on the number of entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<u64>,
}

fn default_durability_str() -> String {
    "standard".to_string()
}

fn default_checkpoint_every() -> u64 {
    DEFAULT_CHECKPOINT_EVERY
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            durability: default_durability_str(),
            checkpoint_every: DEFAULT_CHECKPOINT_EVERY,
            max_entries: None,
        }
    }
}

impl DatabaseConfig {
    /// Parse the durability string into a `DurabilityMode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `"standard"` or `"always"`.
    pub fn durability_mode(&self) -> Result<DurabilityMode> {
        match self.durability.as_str() {
            "standard" => Ok(DurabilityMode::standard_default()),
            "always" => Ok(DurabilityMode::Always),
            other => Err(Error::invalid_input(format!(
                "Invalid durability mode '{}' in {}. Expected \"standard\" or \"always\".",
                other, CONFIG_FILE_NAME
            ))),
        }
    }

    /// Store limits derived from this config.
    pub fn limits(&self) -> Limits {
        Limits {
            max_entries: self.max_entries,
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# EntryStore database configuration
#
# Durability mode: "standard" (default) or "always"
#   "standard" = periodic fsync (~100ms), may lose last interval on crash
#   "always"   = fsync every mutation, zero data loss
durability = "standard"

# Mutations between automatic checkpoints (0 disables).
# A checkpoint folds the log into a single image and deletes old segments.
checkpoint_every = 10000

# Optional cap on the number of entries. Appends past the cap are rejected.
# max_entries = 1000000
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DatabaseConfig = toml::from_str(&content).map_err(|e| {
            Error::invalid_input(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        // Validate the durability value eagerly
        config.durability_mode()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::SerializationError(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
