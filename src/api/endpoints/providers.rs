//! Provider endpoints.
//!
//! - `POST /api/providers` — register a provider
//! - `GET  /api/providers` — all providers, sorted by name
//! - `GET  /api/providers/:id` — one provider
//! - `POST /api/providers/:id/deactivate` — retire a provider

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::sanitize;
use crate::api::types::ApiContext;
use crate::api::views::ProviderView;
use crate::models::NewProvider;

pub async fn create(
    State(ctx): State<ApiContext>,
    Json(mut draft): Json<NewProvider>,
) -> Result<Json<ProviderView>, ApiError> {
    draft.name = sanitize::clean(&draft.name);
    draft.specialty = sanitize::clean_opt(draft.specialty);

    let provider = ctx.engine.create_provider(draft)?;
    Ok(Json(provider.into()))
}

pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<ProviderView>>, ApiError> {
    let providers = ctx.engine.list_providers()?;
    Ok(Json(providers.into_iter().map(ProviderView::from).collect()))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProviderView>, ApiError> {
    let provider = ctx.engine.get_provider(id)?;
    Ok(Json(provider.into()))
}

pub async fn deactivate(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProviderView>, ApiError> {
    let provider = ctx.engine.deactivate_provider(id)?;
    Ok(Json(provider.into()))
}
