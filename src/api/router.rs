//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Page snapshots at export scale run to a few MB each.
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Build the report API router.
pub fn report_api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/reports", post(endpoints::reports::create))
        .route(
            "/reports/:id",
            get(endpoints::reports::detail).delete(endpoints::reports::close),
        )
        .route("/reports/:id/stage", get(endpoints::stages::active))
        .route("/reports/:id/stages/:stage", get(endpoints::stages::stage))
        .route("/reports/:id/navigation", post(endpoints::stages::navigate))
        .route("/reports/:id/edits", post(endpoints::stages::edit))
        .route("/reports/:id/preview", get(endpoints::stages::preview))
        .route("/reports/:id/export", post(endpoints::export::export_report))
        .route("/reports/:id/print", get(endpoints::export::print_report))
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
}
