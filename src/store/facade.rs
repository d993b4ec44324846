//! Typed per-entity façades over the raw key-value contract.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{HealthAlert, HealthMetrics, HealthcareProvider, MaternalProfile, PrenatalVisit};

use super::record::RecordStore;
use super::StoreError;

/// Bundles one typed accessor per entity kind over a shared backend.
#[derive(Clone)]
pub struct StoreFacade {
    store: Arc<dyn RecordStore>,
}

impl StoreFacade {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        StoreFacade { store }
    }

    pub fn profiles(&self) -> EntityStore<MaternalProfile> {
        self.typed("profile")
    }

    pub fn providers(&self) -> EntityStore<HealthcareProvider> {
        self.typed("provider")
    }

    pub fn metrics(&self) -> EntityStore<HealthMetrics> {
        self.typed("metrics")
    }

    pub fn alerts(&self) -> EntityStore<HealthAlert> {
        self.typed("alert")
    }

    pub fn visits(&self) -> EntityStore<PrenatalVisit> {
        self.typed("visit")
    }

    fn typed<T>(&self, kind: &'static str) -> EntityStore<T> {
        EntityStore {
            store: Arc::clone(&self.store),
            kind,
            _marker: PhantomData,
        }
    }
}

/// Typed accessor for a single entity kind. Values are JSON-encoded.
pub struct EntityStore<T> {
    store: Arc<dyn RecordStore>,
    kind: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> EntityStore<T> {
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn get(&self, id: &Uuid) -> Result<Option<T>, StoreError> {
        let key = id.to_string();
        match self.store.get(self.kind, &key)? {
            Some(bytes) => Ok(Some(self.decode(&key, &bytes)?)),
            None => Ok(None),
        }
    }

    pub fn put(&self, id: &Uuid, value: &T) -> Result<(), StoreError> {
        let key = id.to_string();
        let bytes = serde_json::to_vec(value).map_err(|e| StoreError::Malformed {
            kind: self.kind,
            key: key.clone(),
            reason: e.to_string(),
        })?;
        self.store.put(self.kind, &key, &bytes)
    }

    /// Lazily decoded scan over a fresh key-ordered snapshot.
    pub fn scan(&self) -> Result<Scan<T>, StoreError> {
        let rows = self.store.scan(self.kind)?;
        Ok(Scan {
            rows: rows.into_iter(),
            kind: self.kind,
            _marker: PhantomData,
        })
    }

    /// Collect the whole kind into memory.
    pub fn all(&self) -> Result<Vec<T>, StoreError> {
        self.scan()?.collect()
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        self.store.count(self.kind)
    }

    fn decode(&self, key: &str, bytes: &[u8]) -> Result<T, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Malformed {
            kind: self.kind,
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Iterator over one scan snapshot, decoding records on demand.
pub struct Scan<T> {
    rows: std::vec::IntoIter<(String, Vec<u8>)>,
    kind: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Iterator for Scan<T> {
    type Item = Result<T, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (key, bytes) = self.rows.next()?;
        Some(
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Malformed {
                kind: self.kind,
                key,
                reason: e.to_string(),
            }),
        )
    }
}
