//! Database builder for fluent configuration
//!
//! Settings given to the builder override `entrystore.toml` and are written
//! back to it, so a later `Database::open` sees the same configuration.

use entrystore_core::{Error, Result};
use entrystore_durability::DurabilityMode;
use std::path::PathBuf;
use std::sync::Arc;

use super::config::{DatabaseConfig, CONFIG_FILE_NAME};
use super::Database;

/// Builder for Database configuration
///
/// ```ignore
/// use entrystore_engine::Database;
///
/// // 1. Simple open, settings from entrystore.toml
/// let db = Database::open("/data/entries")?;
///
/// // 2. Builder for custom settings
/// let db = Database::builder()
///     .path("/data/entries")
///     .always()
///     .max_entries(1_000_000)
///     .open()?;
///
/// // 3. In memory, no files
/// let db = Database::builder().cache().open()?;
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseBuilder {
    path: Option<PathBuf>,
    durability: DurabilityMode,
    max_entries: Option<u64>,
    checkpoint_every: Option<u64>,
}

impl DatabaseBuilder {
    /// Create new builder with defaults (Standard durability)
    pub fn new() -> Self {
        Self {
            path: None,
            durability: DurabilityMode::standard_default(),
            max_entries: None,
            checkpoint_every: None,
        }
    }

    /// Set database path
    pub fn path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// fsync after every mutation
    pub fn always(mut self) -> Self {
        self.durability = DurabilityMode::Always;
        self
    }

    /// Periodic fsync (100ms or 1000 mutations, whichever comes first)
    pub fn standard(mut self) -> Self {
        self.durability = DurabilityMode::standard_default();
        self
    }

    /// Keep everything in memory.
    ///
    /// With a path, existing data is recovered but nothing new is written.
    pub fn cache(mut self) -> Self {
        self.durability = DurabilityMode::Cache;
        self
    }

    /// Cap the number of entries
    pub fn max_entries(mut self, max: u64) -> Self {
        self.max_entries = Some(max);
        self
    }

    /// Mutations between automatic checkpoints (`0` disables)
    pub fn checkpoint_every(mut self, every: u64) -> Self {
        self.checkpoint_every = Some(every);
        self
    }

    /// Current durability mode
    pub fn get_durability(&self) -> DurabilityMode {
        self.durability
    }

    /// Open the database
    ///
    /// # Errors
    ///
    /// Returns error if no path was set for a durable mode, or if directory
    /// creation, config parsing or recovery fails.
    pub fn open(self) -> Result<Arc<Database>> {
        let Some(path) = self.path.clone() else {
            if self.durability.requires_wal() {
                return Err(Error::invalid_input(
                    "a path is required for a durable database; use cache() for in-memory",
                ));
            }
            return Ok(Database::cache_with(self.apply_to(DatabaseConfig::default())));
        };

        std::fs::create_dir_all(&path)?;
        let config_path = path.join(CONFIG_FILE_NAME);

        let base = if config_path.exists() {
            DatabaseConfig::from_file(&config_path)?
        } else {
            DatabaseConfig::default()
        };
        let cfg = self.apply_to(base);

        if self.durability.requires_wal() {
            cfg.write_to_file(&config_path)?;
        }

        Database::open_with_mode(&path, self.durability, cfg)
    }

    fn apply_to(&self, mut cfg: DatabaseConfig) -> DatabaseConfig {
        match self.durability {
            DurabilityMode::Always => cfg.durability = "always".to_string(),
            DurabilityMode::Standard { .. } => cfg.durability = "standard".to_string(),
            DurabilityMode::Cache => {}
        }
        if self.max_entries.is_some() {
            cfg.max_entries = self.max_entries;
        }
        if let Some(every) = self.checkpoint_every {
            cfg.checkpoint_every = every;
        }
        cfg
    }
}

impl Default for DatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
