//! Export and print endpoints.
//!
//! - `POST /api/reports/:id/export` — page snapshots in, report PDF out
//! - `GET /api/reports/:id/print` — text PDF of the preview layout

use axum::extract::{Path, State};
use axum::http::header::{self, HeaderName};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::Json;
use chrono::SecondsFormat;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{parse_report_id, ApiContext};
use crate::export::{self, export_file_name, export_pdf_to_file, print::print_pages};
use crate::stages::preview;

/// Number of sheets in the returned PDF.
pub const REPORT_PAGES_HEADER: HeaderName = HeaderName::from_static("x-report-pages");
/// RFC 3339 time the export was assembled.
pub const GENERATED_AT_HEADER: HeaderName = HeaderName::from_static("x-report-generated-at");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    /// One image data URL per rendered report page, in order.
    pub pages: Vec<String>,
    /// Also keep a copy in the exports directory.
    #[serde(default)]
    pub save_copy: bool,
}

fn pdf_response(
    file_name: &str,
    bytes: Vec<u8>,
    pages: usize,
    extra: Option<(HeaderName, String)>,
) -> Response {
    let mut headers = vec![
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
        (REPORT_PAGES_HEADER, pages.to_string()),
    ];
    headers.extend(extra);
    (AppendHeaders(headers), bytes).into_response()
}

/// `POST /api/reports/:id/export`
///
/// The session lock is only held to claim the export slot; rasterization
/// runs without it so the wizard stays responsive. The slot stays claimed
/// until the export task ends, even if the client has gone away.
pub async fn export_report(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, ApiError> {
    let id = parse_report_id(&id)?;
    let (guard, report_id) = ctx
        .core
        .with_session(id, |s| s.begin_export().map(|g| (g, s.report_id().to_string())))??;

    let ExportRequest { pages, save_copy } = request;
    let document = export::spawn_export(
        guard,
        report_id.clone(),
        pages,
        ctx.core.export_concurrency(),
    )
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    if save_copy {
        let dir = ctx.core.exports_dir().clone();
        let bytes = document.bytes.clone();
        let file_name = document.file_name.clone();
        let path = tokio::task::spawn_blocking(move || export_pdf_to_file(&bytes, &file_name, &dir))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))??;
        tracing::info!(report_id = %report_id, path = %path.display(), "Export copy saved");
    }

    let generated_at = document
        .generated_at
        .to_rfc3339_opts(SecondsFormat::Secs, true);
    Ok(pdf_response(
        &document.file_name,
        document.bytes,
        document.page_count,
        Some((GENERATED_AT_HEADER, generated_at)),
    ))
}

/// `GET /api/reports/:id/print`
pub async fn print_report(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_report_id(&id)?;
    let (report_id, pages) = ctx.core.with_session(id, |s| {
        (
            s.report_id().to_string(),
            preview::layout(s.store.report()),
        )
    })?;

    let title = format!("EEG Report {report_id}");
    let printed = tokio::task::spawn_blocking(move || print_pages(&title, &pages))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(pdf_response(
        &export_file_name(&report_id),
        printed.bytes,
        printed.sheets,
        None,
    ))
}
