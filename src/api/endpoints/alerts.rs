//! Alert endpoints.
//!
//! - `GET  /api/profiles/:id/alerts?open=` — alerts for a profile
//! - `POST /api/alerts/:id/resolve` — close an open alert

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::sanitize;
use crate::api::types::ApiContext;
use crate::api::views::AlertView;

#[derive(Deserialize)]
pub struct AlertQuery {
    /// When true, only unresolved alerts are returned.
    #[serde(default)]
    pub open: bool,
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Path(profile_id): Path<Uuid>,
    Query(query): Query<AlertQuery>,
) -> Result<Json<Vec<AlertView>>, ApiError> {
    let alerts = ctx.engine.list_alerts(profile_id, query.open)?;
    Ok(Json(alerts.into_iter().map(AlertView::from).collect()))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveBody {
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn resolve(
    State(ctx): State<ApiContext>,
    Path(alert_id): Path<Uuid>,
    Json(body): Json<ResolveBody>,
) -> Result<Json<AlertView>, ApiError> {
    let notes = sanitize::clean_opt(body.notes);
    let alert = ctx.engine.resolve_alert(alert_id, notes)?;
    Ok(Json(alert.into()))
}
