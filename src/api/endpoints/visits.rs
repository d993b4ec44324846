//! Prenatal visit endpoints.
//!
//! - `POST /api/visits` — schedule a visit
//! - `GET  /api/profiles/:id/visits` — visits, soonest first
//! - `POST /api/visits/:id/complete` — mark a scheduled visit done
//! - `POST /api/visits/:id/cancel` — cancel with a reason

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::sanitize;
use crate::api::types::ApiContext;
use crate::api::views::VisitView;
use crate::models::NewVisit;

pub async fn schedule(
    State(ctx): State<ApiContext>,
    Json(mut draft): Json<NewVisit>,
) -> Result<Json<VisitView>, ApiError> {
    draft.reason = sanitize::clean_opt(draft.reason);

    let visit = ctx.engine.schedule_visit(draft)?;
    Ok(Json(visit.into()))
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<Vec<VisitView>>, ApiError> {
    let visits = ctx.engine.list_visits(profile_id)?;
    Ok(Json(visits.into_iter().map(VisitView::from).collect()))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompleteBody {
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn complete(
    State(ctx): State<ApiContext>,
    Path(visit_id): Path<Uuid>,
    Json(body): Json<CompleteBody>,
) -> Result<Json<VisitView>, ApiError> {
    let notes = sanitize::clean_opt(body.notes);
    let visit = ctx.engine.complete_visit(visit_id, notes)?;
    Ok(Json(visit.into()))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CancelBody {
    pub reason: String,
}

pub async fn cancel(
    State(ctx): State<ApiContext>,
    Path(visit_id): Path<Uuid>,
    Json(body): Json<CancelBody>,
) -> Result<Json<VisitView>, ApiError> {
    let reason = sanitize::clean(&body.reason);
    let visit = ctx.engine.cancel_visit(visit_id, reason)?;
    Ok(Json(visit.into()))
}
