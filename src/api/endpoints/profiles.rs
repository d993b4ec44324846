//! Profile endpoints.
//!
//! - `POST /api/profiles` — create a maternal profile
//! - `GET  /api/profiles?page=&limit=` — paginated listing
//! - `GET  /api/profiles/:id` — one profile
//! - `POST /api/profiles/:id/sync` — reconcile trimester and risk level

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::sanitize;
use crate::api::types::ApiContext;
use crate::api::views::{ProfilePageView, ProfileView};
use crate::models::NewProfile;

pub async fn create(
    State(ctx): State<ApiContext>,
    Json(mut draft): Json<NewProfile>,
) -> Result<Json<ProfileView>, ApiError> {
    draft.name = sanitize::clean(&draft.name);
    draft.medical_history = sanitize::clean_all(draft.medical_history);
    draft.allergies = sanitize::clean_all(draft.allergies);

    let profile = ctx.engine.create_profile(draft)?;
    Ok(Json(profile.into()))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProfilePageView>, ApiError> {
    let page = ctx
        .engine
        .list_profiles(query.page.unwrap_or(1), query.limit.unwrap_or(20))?;
    Ok(Json(page.into()))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileView>, ApiError> {
    let profile = ctx.engine.get_profile(id)?;
    Ok(Json(profile.into()))
}

pub async fn sync(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileView>, ApiError> {
    let profile = ctx.engine.sync_profile(id)?;
    Ok(Json(profile.into()))
}
