//! Wizard stage endpoints: views, navigation, edits, preview.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{parse_report_id, ApiContext};
use crate::models::StageId;
use crate::stages::preview::ReportPage;
use crate::stages::{self, StageEdit, StageView};
use crate::wizard::NavigationState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageResponse {
    pub navigation: NavigationState,
    pub view: StageView,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NavigationRequest {
    Next,
    Previous,
    SetActive { stage: StageId },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResponse {
    /// Id of the record an add edit created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Uuid>,
    pub view: StageView,
}

/// `GET /api/reports/:id/stage` — the active stage.
pub async fn active(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<StageResponse>, ApiError> {
    let id = parse_report_id(&id)?;
    let response = ctx.core.with_session(id, |s| StageResponse {
        navigation: s.navigator.state(),
        view: s.active_view(),
    })?;
    Ok(Json(response))
}

/// `GET /api/reports/:id/stages/:stage` — any stage, without moving.
pub async fn stage(
    State(ctx): State<ApiContext>,
    Path((id, stage)): Path<(String, String)>,
) -> Result<Json<StageView>, ApiError> {
    let id = parse_report_id(&id)?;
    let stage: StageId = stage.parse()?;
    let view = ctx.core.with_session(id, |s| s.view(stage))?;
    Ok(Json(view))
}

/// `POST /api/reports/:id/navigation`
pub async fn navigate(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(request): Json<NavigationRequest>,
) -> Result<Json<StageResponse>, ApiError> {
    let id = parse_report_id(&id)?;
    let response = ctx.core.with_session(id, |s| {
        let active = match request {
            NavigationRequest::Next => s.navigator.next(),
            NavigationRequest::Previous => s.navigator.previous(),
            NavigationRequest::SetActive { stage } => s.navigator.set_active(stage),
        };
        tracing::debug!(report_id = %id, stage = %active, "Stage changed");
        StageResponse {
            navigation: s.navigator.state(),
            view: s.view(active),
        }
    })?;
    Ok(Json(response))
}

/// `POST /api/reports/:id/edits` — apply one edit, return the edited
/// stage's fresh view.
pub async fn edit(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(edit): Json<StageEdit>,
) -> Result<Json<EditResponse>, ApiError> {
    let id = parse_report_id(&id)?;
    let stage = edit.stage();
    let response = ctx.core.with_session(id, |s| {
        s.apply(edit).map(|outcome| EditResponse {
            created: outcome.created,
            view: s.view(stage),
        })
    })??;
    Ok(Json(response))
}

/// `GET /api/reports/:id/preview` — the paginated report layout.
pub async fn preview(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ReportPage>>, ApiError> {
    let id = parse_report_id(&id)?;
    let pages = ctx
        .core
        .with_session(id, |s| stages::preview::layout(s.store.report()))?;
    Ok(Json(pages))
}
