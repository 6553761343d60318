//! Report session endpoints.
//!
//! - `POST /api/reports` — open a session over the seeded report
//! - `GET /api/reports/:id` — full report and navigation state
//! - `DELETE /api/reports/:id` — close the session

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{parse_report_id, ApiContext};
use crate::session::SessionSnapshot;
use crate::wizard::NavigationState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReport {
    pub report_id: String,
    pub navigation: NavigationState,
}

/// `POST /api/reports`
pub async fn create(
    State(ctx): State<ApiContext>,
) -> Result<(StatusCode, Json<CreatedReport>), ApiError> {
    let id = ctx.core.create_session()?;
    let navigation = ctx.core.with_session(id, |s| s.navigator.state())?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedReport {
            report_id: id.to_string(),
            navigation,
        }),
    ))
}

/// `GET /api/reports/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let id = parse_report_id(&id)?;
    let snapshot = ctx.core.with_session(id, |s| s.snapshot())?;
    Ok(Json(snapshot))
}

/// `DELETE /api/reports/:id`
pub async fn close(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_report_id(&id)?;
    ctx.core.close_session(id)?;
    Ok(StatusCode::NO_CONTENT)
}
