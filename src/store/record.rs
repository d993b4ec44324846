//! The ordered key-value contract and the in-memory backend.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use super::StoreError;

/// Ordered key-value persistence, partitioned by entity kind.
///
/// `scan` returns a full snapshot in key order — a fresh scan each call,
/// never resumable mid-iteration. Implementations synchronize internally;
/// callers needing read-modify-write atomicity serialize above this layer.
pub trait RecordStore: Send + Sync {
    fn get(&self, kind: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn put(&self, kind: &str, key: &str, value: &[u8]) -> Result<(), StoreError>;
    fn scan(&self, kind: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError>;
    fn count(&self, kind: &str) -> Result<u64, StoreError>;
}

/// In-memory backend: one `BTreeMap` per entity kind behind a mutex.
#[derive(Default)]
pub struct MemoryStore {
    kinds: Mutex<HashMap<String, BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn locked(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, BTreeMap<String, Vec<u8>>>>, StoreError>
    {
        self.kinds
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, kind: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let kinds = self.locked()?;
        Ok(kinds.get(kind).and_then(|m| m.get(key)).cloned())
    }

    fn put(&self, kind: &str, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut kinds = self.locked()?;
        kinds
            .entry(kind.to_string())
            .or_default()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn scan(&self, kind: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        let kinds = self.locked()?;
        Ok(kinds
            .get(kind)
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    fn count(&self, kind: &str) -> Result<u64, StoreError> {
        let kinds = self.locked()?;
        Ok(kinds.get(kind).map(|m| m.len() as u64).unwrap_or(0))
    }
}
