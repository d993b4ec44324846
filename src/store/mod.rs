//! Record store: ordered key-value persistence behind a trait, with typed
//! per-entity façades on top.
//!
//! The engine never talks to a storage backend directly — it receives an
//! `Arc<dyn RecordStore>` and goes through [`StoreFacade`]'s typed
//! accessors. Two backends ship: an in-memory map (tests, ephemeral runs)
//! and SQLite.

pub mod facade;
pub mod record;
pub mod sqlite;

pub use facade::{EntityStore, Scan, StoreFacade};
pub use record::{MemoryStore, RecordStore};
pub use sqlite::SqliteStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The underlying store is unreachable. The only fatal condition in
    /// the core; surfaced to callers as an unexpected failure.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be encoded or decoded.
    #[error("Malformed {kind} record {key}: {reason}")]
    Malformed {
        kind: &'static str,
        key: String,
        reason: String,
    },
}
