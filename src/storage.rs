//! Local persistence for the client identity.
//!
//! The store is a plain string key/value map. `SledStore` keeps it on disk in
//! a sled tree; `MemoryStore` keeps it in process and can be told to fail,
//! which is how storage outages are exercised.

use crate::error::StorageError;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Key holding the locally generated client identity.
pub const CLIENT_ID_KEY: &str = "clientGeneratedUserId";

const LOCAL_TREE: &str = "local";

pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

// ============================================================================
// Sled
// ============================================================================

pub struct SledStore {
    tree: sled::Tree,
}

impl SledStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Self::from_db(&db)
    }

    pub fn from_db(db: &sled::Db) -> Result<Self, StorageError> {
        Ok(Self {
            tree: db.open_tree(LOCAL_TREE)?,
        })
    }
}

impl LocalStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.tree.get(key.as_bytes())? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|_| StorageError::Corrupt(key.to_string())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.tree.insert(key.as_bytes(), value.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }
}

// ============================================================================
// In-memory
// ============================================================================

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("reads disabled".to_string()));
        }
        let entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sled_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db");

        {
            let store = SledStore::open(&path).unwrap();
            assert_eq!(store.get(CLIENT_ID_KEY).unwrap(), None);
            store.set(CLIENT_ID_KEY, "client-1").unwrap();
        }

        let store = SledStore::open(&path).unwrap();
        assert_eq!(store.get(CLIENT_ID_KEY).unwrap().as_deref(), Some("client-1"));
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.writes(), 2);
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_memory_store_failures() {
        let store = MemoryStore::with_entry("a", "1");
        store.fail_reads(true);
        assert!(matches!(store.get("a"), Err(StorageError::Unavailable(_))));

        store.fail_writes(true);
        assert!(store.set("a", "2").is_err());
        assert_eq!(store.writes(), 0);
    }
}
