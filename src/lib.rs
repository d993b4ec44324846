//! Materna — maternal-health observation service.
//!
//! Records vital-sign snapshots against maternal profiles, classifies
//! each snapshot, and maintains alert and profile risk state so that no
//! abnormal snapshot is ever stored without a corresponding alert.
//!
//! Layering, leaves first: `models` (entities, enums, instants), `store`
//! (ordered key-value persistence behind a trait), the risk core
//! (`validation`, `risk`, `alerts`, `sync`), the `engine` command
//! surface, and the `api` HTTP shell.

pub mod alerts;
pub mod api;
pub mod config;
pub mod engine;
pub mod models;
pub mod risk;
pub mod store;
pub mod sync;
pub mod validation;
