//! HTTP API for the care engine.
//!
//! Exposes the engine's command surface as REST endpoints nested under
//! `/api/`, with a sliding-window rate limiter in front and free-text
//! sanitization before any payload reaches validation. The router is
//! composable — `api_router()` returns a `Router` that can be mounted
//! on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod sanitize;
pub mod server;
pub mod types;
pub mod views;

pub use router::api_router;
pub use server::{ApiServer, ApiSession};
pub use types::ApiContext;
