//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/` behind the rate-limiting middleware.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::engine::CareEngine;

/// Build the API router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost
/// layer). Endpoint handlers use `State<ApiContext>` (provided via
/// `with_state`).
pub fn api_router(engine: Arc<CareEngine>) -> Router {
    build_router(ApiContext::new(engine))
}

/// Build router from a pre-constructed `ApiContext`.
///
/// Used by tests that need access to the shared context (e.g. to swap
/// in a smaller rate-limit window).
#[cfg(test)]
pub(crate) fn api_router_with_ctx(ctx: ApiContext) -> Router {
    build_router(ctx)
}

fn build_router(ctx: ApiContext) -> Router {
    // Layers apply bottom (innermost) to top (outermost); the Extension
    // must be outermost so the rate limiter can extract ApiContext.
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/providers",
            post(endpoints::providers::create).get(endpoints::providers::list),
        )
        .route("/providers/:id", get(endpoints::providers::detail))
        .route(
            "/providers/:id/deactivate",
            post(endpoints::providers::deactivate),
        )
        .route(
            "/profiles",
            post(endpoints::profiles::create).get(endpoints::profiles::list),
        )
        .route("/profiles/:id", get(endpoints::profiles::detail))
        .route("/profiles/:id/sync", post(endpoints::profiles::sync))
        .route("/profiles/:id/metrics", get(endpoints::metrics::history))
        .route("/profiles/:id/alerts", get(endpoints::alerts::list))
        .route("/profiles/:id/visits", get(endpoints::visits::list))
        .route("/metrics", post(endpoints::metrics::record))
        .route("/alerts/:id/resolve", post(endpoints::alerts::resolve))
        .route("/visits", post(endpoints::visits::schedule))
        .route("/visits/:id/complete", post(endpoints::visits::complete))
        .route("/visits/:id/cancel", post(endpoints::visits::cancel))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::rate::limit))
        .layer(axum::Extension(ctx));

    Router::new().nest("/api", routes).layer(CorsLayer::permissive())
}
