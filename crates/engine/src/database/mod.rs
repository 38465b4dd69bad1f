//! Database: durable, thread-safe handle on an entry store
//!
//! Every mutation runs under one mutex in three steps:
//!
//! 1. validate against the current state (rejections stop here)
//! 2. append a WAL record
//! 3. apply to the in-memory store
//!
//! A failed WAL write therefore leaves the store unchanged.

pub mod builder;
pub mod config;

pub use builder::DatabaseBuilder;
pub use config::{DatabaseConfig, CONFIG_FILE_NAME};

use crate::recovery::{self, checkpoint_error};
use entrystore_core::{Entry, Error, Mutation, RemovalPolicy, Result};
use entrystore_durability::{
    Checkpoint, DurabilityMode, WalConfig, WalCounters, WalRecord, WalWriter,
};
use entrystore_storage::{EntrySnapshot, EntryStore};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

/// Point-in-time description of an open database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    /// Data directory (None for cache databases)
    pub path: Option<PathBuf>,
    /// `"cache"`, `"standard"` or `"always"`
    pub durability: String,
    /// Number of entries
    pub len: u64,
    /// Mutations applied since the database was created
    pub seq: u64,
    /// Watermark of the latest checkpoint
    pub checkpoint_seq: u64,
    /// Active WAL segment (0 when nothing is logged)
    pub wal_segment: u64,
    /// Configured entry cap
    pub max_entries: Option<u64>,
    /// Mutations between automatic checkpoints
    pub checkpoint_every: u64,
}

struct Inner {
    store: EntryStore,
    wal: Option<WalWriter>,
    checkpoint_seq: u64,
    mutations_since_checkpoint: u64,
}

/// Durable entry store
///
/// `Database` is `Send + Sync`; share it across threads with `Arc`.
pub struct Database {
    inner: Arc<Mutex<Inner>>,
    data_dir: Option<PathBuf>,
    database_uuid: [u8; 16],
    durability: DurabilityMode,
    config: DatabaseConfig,
    flush_shutdown: Arc<AtomicBool>,
    flush_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Database {
    /// Open the database at `path`, creating it if needed.
    ///
    /// Settings come from `entrystore.toml` in the data directory; a file
    /// with commented defaults is written on first open.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Arc<Self>> {
        let data_dir = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        let config_path = data_dir.join(CONFIG_FILE_NAME);
        DatabaseConfig::write_default_if_missing(&config_path)?;
        let cfg = DatabaseConfig::from_file(&config_path)?;

        Self::open_with(path, cfg)
    }

    /// Open the database at `path` with an explicit configuration.
    ///
    /// The configuration is written to `entrystore.toml` so that later
    /// `Database::open` calls pick up the same settings.
    pub fn open_with<P: AsRef<Path>>(path: P, cfg: DatabaseConfig) -> Result<Arc<Self>> {
        let data_dir = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        let mode = cfg.durability_mode()?;
        cfg.write_to_file(&data_dir.join(CONFIG_FILE_NAME))?;

        Self::open_with_mode(&data_dir, mode, cfg)
    }

    /// Fluent builder
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// In-memory database with default settings. Creates no files.
    pub fn cache() -> Arc<Self> {
        Self::cache_with(DatabaseConfig::default())
    }

    pub(crate) fn cache_with(cfg: DatabaseConfig) -> Arc<Self> {
        Arc::new(Database {
            inner: Arc::new(Mutex::new(Inner {
                store: EntryStore::with_limits(cfg.limits()),
                wal: None,
                checkpoint_seq: 0,
                mutations_since_checkpoint: 0,
            })),
            data_dir: None,
            database_uuid: [0u8; 16],
            durability: DurabilityMode::Cache,
            config: cfg,
            flush_shutdown: Arc::new(AtomicBool::new(false)),
            flush_handle: Mutex::new(None),
        })
    }

    pub(crate) fn open_with_mode(
        data_dir: &Path,
        durability: DurabilityMode,
        cfg: DatabaseConfig,
    ) -> Result<Arc<Self>> {
        std::fs::create_dir_all(data_dir)?;

        let state = recovery::recover(data_dir, cfg.limits())?;
        let database_uuid = state
            .database_uuid
            .unwrap_or_else(|| *uuid::Uuid::new_v4().as_bytes());

        let wal = WalWriter::new(
            data_dir.join("wal"),
            database_uuid,
            durability,
            WalConfig::default(),
        )?;

        info!(
            target: "entrystore::engine",
            path = ?data_dir,
            durability = durability.description(),
            len = state.store.len(),
            seq = state.store.seq(),
            "Database opened"
        );

        let inner = Arc::new(Mutex::new(Inner {
            store: state.store,
            wal: Some(wal),
            checkpoint_seq: state.checkpoint_seq,
            mutations_since_checkpoint: 0,
        }));
        let flush_shutdown = Arc::new(AtomicBool::new(false));

        // Background fsync so Standard mode bounds its loss window even when idle
        let flush_handle = if let DurabilityMode::Standard { interval_ms, .. } = durability {
            let inner = Arc::clone(&inner);
            let shutdown = Arc::clone(&flush_shutdown);
            let interval = std::time::Duration::from_millis(interval_ms);

            let handle = std::thread::Builder::new()
                .name("entrystore-wal-flush".to_string())
                .spawn(move || {
                    while !shutdown.load(Ordering::Relaxed) {
                        std::thread::sleep(interval);
                        if shutdown.load(Ordering::Relaxed) {
                            break;
                        }
                        let mut inner = inner.lock();
                        if let Some(wal) = inner.wal.as_mut() {
                            if let Err(e) = wal.sync_if_overdue() {
                                warn!(target: "entrystore::wal", error = %e, "Background WAL sync failed");
                            }
                        }
                    }
                })?;
            Some(handle)
        } else {
            None
        };

        Ok(Arc::new(Database {
            inner,
            data_dir: Some(data_dir.to_path_buf()),
            database_uuid,
            durability,
            config: cfg,
            flush_shutdown,
            flush_handle: Mutex::new(flush_handle),
        }))
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Copy of every entry in position order.
    pub fn read_all(&self) -> Vec<Entry> {
        self.inner.lock().store.read_all()
    }

    /// Immutable snapshot of the entries, tagged with its `seq`.
    pub fn snapshot(&self) -> EntrySnapshot {
        self.inner.lock().store.snapshot()
    }

    /// Entry at `index`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index >= len`.
    pub fn read_at(&self, index: u64) -> Result<Entry> {
        self.inner.lock().store.read_at(index)
    }

    /// Number of entries.
    pub fn len(&self) -> u64 {
        self.inner.lock().store.len()
    }

    /// Whether the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Push `value` onto the end.
    pub fn append(&self, value: Entry) -> Result<()> {
        self.mutate(Mutation::Append(value))
    }

    /// Zero the entry at `index`, keeping the length.
    pub fn remove_leaving_gaps(&self, index: u64) -> Result<()> {
        self.remove(RemovalPolicy::LeaveGap, index)
    }

    /// Remove the entry at `index`, shifting later entries forward.
    pub fn remove_shift_compact(&self, index: u64) -> Result<()> {
        self.remove(RemovalPolicy::ShiftCompact, index)
    }

    /// Remove the entry at `index` by moving the last entry into its place.
    pub fn remove_swap_compact(&self, index: u64) -> Result<()> {
        self.remove(RemovalPolicy::SwapCompact, index)
    }

    /// Remove the entry at `index` under `policy`.
    pub fn remove(&self, policy: RemovalPolicy, index: u64) -> Result<()> {
        self.mutate(Mutation::remove(policy, index))
    }

    fn mutate(&self, mutation: Mutation) -> Result<()> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if let Err(e) = inner.store.validate(&mutation) {
            debug!(target: "entrystore::engine", ?mutation, error = %e, "Mutation rejected");
            return Err(e);
        }

        let seq = inner.store.seq() + 1;
        if let Some(wal) = inner.wal.as_mut() {
            wal.append(&WalRecord::new(seq, mutation))?;
        }
        inner.store.apply_validated(mutation);
        inner.mutations_since_checkpoint += 1;

        debug!(target: "entrystore::engine", seq, ?mutation, "Mutation applied");

        let every = self.config.checkpoint_every;
        if every > 0 && inner.mutations_since_checkpoint >= every {
            // The mutation is already durable per the WAL; a failed
            // checkpoint is retried on the next trigger.
            if let Err(e) = self.checkpoint_locked(inner) {
                warn!(target: "entrystore::engine", error = %e, "Automatic checkpoint failed");
            }
        }

        Ok(())
    }

    // ========================================================================
    // Durability
    // ========================================================================

    /// Write a checkpoint and drop the WAL segments it covers.
    ///
    /// No-op for databases that persist nothing.
    pub fn checkpoint(&self) -> Result<()> {
        let mut guard = self.inner.lock();
        self.checkpoint_locked(&mut guard)
    }

    fn checkpoint_locked(&self, inner: &mut Inner) -> Result<()> {
        let (Some(data_dir), Some(wal)) = (self.data_dir.as_ref(), inner.wal.as_mut()) else {
            return Ok(());
        };
        if !self.durability.requires_wal() {
            return Ok(());
        }

        wal.flush()?;

        let seq = inner.store.seq();
        Checkpoint::new(self.database_uuid, seq, inner.store.read_all())
            .write_atomic(data_dir)
            .map_err(checkpoint_error)?;
        inner.checkpoint_seq = seq;
        inner.mutations_since_checkpoint = 0;

        let segments_removed = wal.prune_after_checkpoint()?;

        info!(
            target: "entrystore::engine",
            seq,
            len = inner.store.len(),
            segments_removed,
            "Checkpoint created"
        );
        Ok(())
    }

    /// Force logged mutations to disk regardless of durability mode.
    pub fn flush(&self) -> Result<()> {
        if let Some(wal) = self.inner.lock().wal.as_mut() {
            wal.flush()?;
        }
        Ok(())
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Whether this database persists nothing.
    pub fn is_cache(&self) -> bool {
        !self.durability.requires_wal()
    }

    /// Data directory (None for in-memory databases).
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Durability mode in effect.
    pub fn durability(&self) -> DurabilityMode {
        self.durability
    }

    /// Configuration in effect.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Cumulative WAL counters (None for in-memory databases).
    pub fn durability_counters(&self) -> Option<WalCounters> {
        self.inner.lock().wal.as_ref().map(|w| w.counters())
    }

    /// Current state summary.
    pub fn info(&self) -> DatabaseInfo {
        let inner = self.inner.lock();
        let durability = match self.durability {
            DurabilityMode::Cache => "cache",
            DurabilityMode::Always => "always",
            DurabilityMode::Standard { .. } => "standard",
        };
        DatabaseInfo {
            path: self.data_dir.clone(),
            durability: durability.to_string(),
            len: inner.store.len(),
            seq: inner.store.seq(),
            checkpoint_seq: inner.checkpoint_seq,
            wal_segment: inner.wal.as_ref().map_or(0, |w| w.current_segment()),
            max_entries: inner.store.limits().max_entries,
            checkpoint_every: self.config.checkpoint_every,
        }
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        self.flush_shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.flush_handle.lock().take() {
            let _ = handle.join();
        }

        if let Err(e) = self.flush() {
            warn!(target: "entrystore::engine", error = %e, "Final WAL flush failed");
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("data_dir", &self.data_dir)
            .field("durability", &self.durability)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
