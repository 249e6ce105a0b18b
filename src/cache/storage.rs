//! Cache storage trait with in-memory and SQLite implementations.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::key::{EntityTag, QueryKey};

/// A serialized query result.
#[derive(Debug, Clone)]
pub struct CachedEntry {
  /// JSON-encoded payload
  pub data: Vec<u8>,
  pub cached_at: DateTime<Utc>,
}

/// Trait for cache storage backends.
pub trait CacheStorage: Send + Sync {
  fn get(&self, key: &QueryKey) -> Result<Option<CachedEntry>>;

  /// Store (or replace) the payload for a key, stamped with the current time.
  fn store(&self, key: &QueryKey, data: &[u8]) -> Result<()>;

  /// Drop every entry under `tag`. Returns how many were removed.
  fn invalidate(&self, tag: EntityTag) -> Result<usize>;

  fn clear(&self) -> Result<()>;
}

/// Process-local storage; the default backend.
#[derive(Default)]
pub struct MemoryStorage {
  entries: Mutex<HashMap<String, (EntityTag, CachedEntry)>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

impl CacheStorage for MemoryStorage {
  fn get(&self, key: &QueryKey) -> Result<Option<CachedEntry>> {
    let entries = self.entries.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;
    Ok(entries.get(&key.cache_hash()).map(|(_, entry)| entry.clone()))
  }

  fn store(&self, key: &QueryKey, data: &[u8]) -> Result<()> {
    let mut entries = self.entries.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;
    entries.insert(
      key.cache_hash(),
      (
        key.tag,
        CachedEntry {
          data: data.to_vec(),
          cached_at: Utc::now(),
        },
      ),
    );
    Ok(())
  }

  fn invalidate(&self, tag: EntityTag) -> Result<usize> {
    let mut entries = self.entries.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;
    let before = entries.len();
    entries.retain(|_, (entry_tag, _)| *entry_tag != tag);
    Ok(before - entries.len())
  }

  fn clear(&self) -> Result<()> {
    self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?
      .clear();
    Ok(())
  }
}

/// SQLite-based cache storage, kept across runs.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

impl SqliteStorage {
  /// Open the cache database at the default location.
  pub fn open_default() -> Result<Self> {
    Self::open(&Self::default_path()?)
  }

  pub fn open(path: &Path) -> Result<Self> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create cache directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open cache database at {}: {}", path.display(), e))?;

    let storage = Self {
      conn: Mutex::new(conn),
    };
    storage.run_migrations()?;

    Ok(storage)
  }

  fn default_path() -> Result<PathBuf> {
    Ok(crate::config::data_dir()?.join("cache.db"))
  }

  fn run_migrations(&self) -> Result<()> {
    let conn = self.conn.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute_batch(CACHE_SCHEMA)
      .map_err(|e| eyre!("Failed to run cache migrations: {}", e))?;

    Ok(())
  }
}

const CACHE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS query_cache (
    query_hash TEXT PRIMARY KEY,
    entity_tag TEXT NOT NULL,
    query_description TEXT NOT NULL,
    data BLOB NOT NULL,
    cached_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_query_cache_tag ON query_cache(entity_tag);
"#;

impl CacheStorage for SqliteStorage {
  fn get(&self, key: &QueryKey) -> Result<Option<CachedEntry>> {
    let conn = self.conn.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;

    let row: Option<(Vec<u8>, String)> = conn
      .query_row(
        "SELECT data, cached_at FROM query_cache WHERE query_hash = ?",
        params![key.cache_hash()],
        |row| Ok((row.get(0)?, row.get(1)?)),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read cache entry: {}", e))?;

    match row {
      Some((data, cached_at)) => Ok(Some(CachedEntry {
        data,
        cached_at: parse_datetime(&cached_at)?,
      })),
      None => Ok(None),
    }
  }

  fn store(&self, key: &QueryKey, data: &[u8]) -> Result<()> {
    let conn = self.conn.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        "INSERT OR REPLACE INTO query_cache (query_hash, entity_tag, query_description, data, cached_at)
         VALUES (?, ?, ?, ?, ?)",
        params![
          key.cache_hash(),
          key.tag.as_str(),
          key.description(),
          data,
          Utc::now().to_rfc3339()
        ],
      )
      .map_err(|e| eyre!("Failed to store cache entry: {}", e))?;

    Ok(())
  }

  fn invalidate(&self, tag: EntityTag) -> Result<usize> {
    let conn = self.conn.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        "DELETE FROM query_cache WHERE entity_tag = ?",
        params![tag.as_str()],
      )
      .map_err(|e| eyre!("Failed to invalidate {}: {}", tag.as_str(), e))
  }

  fn clear(&self) -> Result<()> {
    let conn = self.conn.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute("DELETE FROM query_cache", [])
      .map_err(|e| eyre!("Failed to clear cache: {}", e))?;

    Ok(())
  }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| eyre!("Failed to parse datetime '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn exercise(storage: &dyn CacheStorage) {
    let owners = QueryKey::all(EntityTag::Owners);
    let owner = QueryKey::one(EntityTag::Owners, 1);
    let pets = QueryKey::all(EntityTag::Pets);

    assert!(storage.get(&owners).unwrap().is_none());

    storage.store(&owners, b"[1,2]").unwrap();
    storage.store(&owner, b"{}").unwrap();
    storage.store(&pets, b"[]").unwrap();
    assert_eq!(storage.get(&owners).unwrap().unwrap().data, b"[1,2]");

    assert_eq!(storage.invalidate(EntityTag::Owners).unwrap(), 2);
    assert!(storage.get(&owners).unwrap().is_none());
    assert!(storage.get(&pets).unwrap().is_some());

    storage.clear().unwrap();
    assert!(storage.get(&pets).unwrap().is_none());
  }

  #[test]
  fn test_memory_storage() {
    exercise(&MemoryStorage::new());
  }

  #[test]
  fn test_sqlite_storage() {
    let dir = tempfile::tempdir().unwrap();
    let storage = SqliteStorage::open(&dir.path().join("cache.db")).unwrap();
    exercise(&storage);
  }

  #[test]
  fn test_sqlite_storage_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("cache.db");
    let key = QueryKey::param(EntityTag::Breeds, 4);

    SqliteStorage::open(&path)
      .unwrap()
      .store(&key, b"[\"Tekir\"]")
      .unwrap();

    let reopened = SqliteStorage::open(&path).unwrap();
    let entry = reopened.get(&key).unwrap().unwrap();
    assert_eq!(entry.data, b"[\"Tekir\"]");
    assert!(Utc::now() - entry.cached_at < chrono::Duration::minutes(1));
  }
}
