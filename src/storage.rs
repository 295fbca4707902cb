//! Durable Store Adapter
//!
//! Persistent mirror of the hot cache so resolution cost survives restarts.
//! The store is strictly an optimization: every failure is contained here,
//! logged, and optionally reported through an observer hook; the hot path
//! never waits on it and never sees its errors.

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{params, Connection};
use tracing::info;

use crate::cache::{CacheEntry, CacheKey};
use crate::error::StorageError;

// == Durable Store Trait ==
/// Narrow interface over a persistent key-value store.
///
/// Only whole-collection read, best-effort put, and expiry pruning are
/// needed; implementations are injected so tests can substitute failing or
/// in-memory doubles.
pub trait DurableStore: Send + Sync {
    /// Reads every persisted record. Called once, at startup.
    fn load_all(&self) -> Result<Vec<(CacheKey, CacheEntry)>, StorageError>;

    /// Writes or overwrites one record.
    fn put(&self, key: &CacheKey, entry: &CacheEntry) -> Result<(), StorageError>;

    /// Deletes records older than the TTL. Returns the number removed.
    fn remove_expired(&self, ttl_secs: u64) -> Result<usize, StorageError>;
}

// == SQLite Store ==
/// SQLite-backed durable mirror.
///
/// Opened once at startup; the single shared connection is what makes open
/// idempotent for the rest of the process.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    // == Open ==
    /// Opens (or creates) the mirror database at the given path.
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        let conn =
            Connection::open(db_path).map_err(|e| StorageError::Open(e.to_string()))?;

        // WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| StorageError::Open(e.to_string()))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS resolved_addresses (
                cache_key TEXT PRIMARY KEY,
                address TEXT NOT NULL,
                details TEXT NOT NULL,
                resolved_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_resolved_at
                ON resolved_addresses(resolved_at);",
        )
        .map_err(|e| StorageError::Open(e.to_string()))?;

        info!(path = %db_path.display(), "durable mirror opened");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl DurableStore for SqliteStore {
    fn load_all(&self) -> Result<Vec<(CacheKey, CacheEntry)>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT cache_key, address, details, resolved_at FROM resolved_addresses")
            .map_err(|e| StorageError::Read(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                let key: String = row.get(0)?;
                let address: String = row.get(1)?;
                let details: String = row.get(2)?;
                let resolved_at: i64 = row.get(3)?;
                Ok((
                    CacheKey::from_raw(key),
                    CacheEntry::with_timestamp(address, details, resolved_at),
                ))
            })
            .map_err(|e| StorageError::Read(e.to_string()))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| StorageError::Read(e.to_string()))
    }

    fn put(&self, key: &CacheKey, entry: &CacheEntry) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO resolved_addresses
             (cache_key, address, details, resolved_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![key.as_str(), entry.address, entry.details, entry.timestamp_ms],
        )
        .map_err(|e| StorageError::Write(e.to_string()))?;
        Ok(())
    }

    fn remove_expired(&self, ttl_secs: u64) -> Result<usize, StorageError> {
        let conn = self.conn.lock();
        let cutoff = crate::cache::entry::current_timestamp_ms() - (ttl_secs as i64) * 1000;
        conn.execute(
            "DELETE FROM resolved_addresses WHERE resolved_at <= ?1",
            params![cutoff],
        )
        .map_err(|e| StorageError::Write(e.to_string()))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::entry::current_timestamp_ms;
    use crate::provider::Lang;

    fn open_temp_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("mirror.db")).unwrap();
        (dir, store)
    }

    fn key(n: usize) -> CacheKey {
        CacheKey::build(n as f64 / 10_000.0, 0.0, Lang::En, 4)
    }

    #[test]
    fn test_store_put_and_load_all() {
        let (_dir, store) = open_temp_store();

        store
            .put(&key(1), &CacheEntry::new("Olaya St", "12"))
            .unwrap();
        store.put(&key(2), &CacheEntry::new("Tahlia St", "")).unwrap();

        let rows = store.load_all().unwrap();
        assert_eq!(rows.len(), 2);
        let (_, entry) = rows.iter().find(|(k, _)| *k == key(1)).unwrap();
        assert_eq!(entry.address, "Olaya St");
        assert_eq!(entry.details, "12");
    }

    #[test]
    fn test_store_put_overwrites_existing_key() {
        let (_dir, store) = open_temp_store();

        store.put(&key(1), &CacheEntry::new("old", "")).unwrap();
        store.put(&key(1), &CacheEntry::new("new", "")).unwrap();

        let rows = store.load_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1.address, "new");
    }

    #[test]
    fn test_store_remove_expired() {
        let (_dir, store) = open_temp_store();

        let old = current_timestamp_ms() - 8 * 24 * 3600 * 1000;
        store
            .put(&key(1), &CacheEntry::with_timestamp("stale", "", old))
            .unwrap();
        store.put(&key(2), &CacheEntry::new("fresh", "")).unwrap();

        let removed = store.remove_expired(7 * 24 * 3600).unwrap();
        assert_eq!(removed, 1);

        let rows = store.load_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1.address, "fresh");
    }

    #[test]
    fn test_store_reopen_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirror.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .put(&key(1), &CacheEntry::new("survives restart", ""))
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let rows = store.load_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1.address, "survives restart");
    }

    #[test]
    fn test_store_open_bad_path_fails() {
        let result = SqliteStore::open(Path::new("/nonexistent-dir/mirror.db"));
        assert!(matches!(result, Err(StorageError::Open(_))));
    }
}
