//! Shared helpers.

use entrystore::Database;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Open a fresh `always`-durability database in its own temp directory.
pub fn fresh() -> (TempDir, Arc<Database>) {
    let dir = TempDir::new().unwrap();
    let db = open(dir.path());
    (dir, db)
}

/// Open (or reopen) the database at `path` with per-mutation fsync.
pub fn open(path: &Path) -> Arc<Database> {
    Database::builder().path(path).always().open().unwrap()
}

/// Append each value in order.
pub fn seed(db: &Database, values: &[u64]) {
    for &v in values {
        db.append(v).unwrap();
    }
}

/// Drop `db` and reopen it from disk.
pub fn reopen(dir: &TempDir, db: Arc<Database>) -> Arc<Database> {
    drop(db);
    open(dir.path())
}
