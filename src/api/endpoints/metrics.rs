//! Metrics endpoints.
//!
//! - `POST /api/metrics` — record a vital-sign snapshot (runs the
//!   classifier and the alert lifecycle)
//! - `GET  /api/profiles/:id/metrics` — snapshots, newest first

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::sanitize;
use crate::api::types::ApiContext;
use crate::api::views::MetricsView;
use crate::models::NewMetrics;

pub async fn record(
    State(ctx): State<ApiContext>,
    Json(mut draft): Json<NewMetrics>,
) -> Result<Json<MetricsView>, ApiError> {
    draft.notes = sanitize::clean_opt(draft.notes);

    let metrics = ctx.engine.record_metrics(draft)?;
    Ok(Json(metrics.into()))
}

pub async fn history(
    State(ctx): State<ApiContext>,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<Vec<MetricsView>>, ApiError> {
    let snapshots = ctx.engine.list_metrics(profile_id)?;
    Ok(Json(snapshots.into_iter().map(MetricsView::from).collect()))
}
