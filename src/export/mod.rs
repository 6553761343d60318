//! Report export: page snapshots in, one multi-page A4 PDF out.
//!
//! The host renders every preview page and hands over one image data URL
//! per page, in reading order. Each page is rasterized to a fixed scale on
//! a blocking worker (bounded concurrency), results are collected through
//! an ordered buffer, and the bitmaps are placed one per sheet.
//!
//! Any page failing aborts the export; nothing partial is returned.

pub mod pdf;
pub mod print;
pub mod raster;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt, TryStreamExt};

pub use self::pdf::PagePlacement;
use crate::session::ExportGuard;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 10.0;
pub const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
pub const MM_PER_INCH: f32 = 25.4;
pub const CSS_DPI: f32 = 96.0;
pub const RASTER_SCALE: f32 = 2.0;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No report pages to export")]
    NoPages,
    #[error("Page {index} could not be rasterized: {reason}")]
    PageDecode { index: usize, reason: String },
    #[error("An export is already running for this report")]
    AlreadyRunning,
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("Export worker failed: {0}")]
    Worker(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A finished export.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub file_name: String,
    pub page_count: usize,
    pub placements: Vec<PagePlacement>,
    pub bytes: Vec<u8>,
    pub generated_at: DateTime<Utc>,
}

/// `EEG_Report_<reportId>.pdf`
pub fn export_file_name(report_id: &str) -> String {
    format!("EEG_Report_{report_id}.pdf")
}

/// Rasterize `pages` and assemble them into the report PDF.
///
/// `concurrency` bounds how many pages are rasterized at once; page order
/// in the output always matches `pages`.
pub async fn export_pages(
    report_id: &str,
    pages: Vec<String>,
    concurrency: usize,
) -> Result<ExportedDocument, ExportError> {
    if pages.is_empty() {
        return Err(ExportError::NoPages);
    }

    let page_count = pages.len();
    let width = raster::target_width_px();
    tracing::info!(report_id, pages = page_count, width, "Export started");

    let rasters: Vec<image::RgbImage> = stream::iter(pages.into_iter().enumerate())
        .map(|(index, page)| async move {
            tokio::task::spawn_blocking(move || raster::rasterize(index, &page, width))
                .await
                .map_err(|e| ExportError::Worker(e.to_string()))?
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
        .inspect_err(|e| tracing::warn!(report_id, error = %e, "Export aborted"))?;

    let title = format!("EEG Report {report_id}");
    let (bytes, placements) = tokio::task::spawn_blocking(move || pdf::assemble(&title, &rasters))
        .await
        .map_err(|e| ExportError::Worker(e.to_string()))??;

    tracing::info!(report_id, pages = page_count, size = bytes.len(), "Export finished");

    Ok(ExportedDocument {
        file_name: export_file_name(report_id),
        page_count,
        placements,
        bytes,
        generated_at: Utc::now(),
    })
}

/// Run [`export_pages`] on its own task. The task owns `guard`, so the
/// session's export slot stays claimed until the work ends, whether or not
/// anyone is still waiting on the handle.
pub fn spawn_export(
    guard: ExportGuard,
    report_id: String,
    pages: Vec<String>,
    concurrency: usize,
) -> tokio::task::JoinHandle<Result<ExportedDocument, ExportError>> {
    tokio::spawn(async move {
        let _guard = guard;
        export_pages(&report_id, pages, concurrency).await
    })
}

/// Saves PDF bytes into `dir`, creating it if needed.
pub fn export_pdf_to_file(
    pdf_bytes: &[u8],
    file_name: &str,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, pdf_bytes)?;
    tracing::debug!(path = %path.display(), "Export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::raster::test_pages::png_data_url;
    use super::*;

    #[test]
    fn file_name_uses_report_id() {
        assert_eq!(export_file_name("abc-1"), "EEG_Report_abc-1.pdf");
    }

    #[tokio::test]
    async fn three_pages_export_in_source_order() {
        // distinct aspect ratios identify each page after export
        let pages = vec![
            png_data_url(100, 100, [255, 255, 255, 255]),
            png_data_url(100, 50, [200, 200, 200, 255]),
            png_data_url(100, 140, [100, 100, 100, 255]),
        ];
        let doc = export_pages("rep-1", pages, 3).await.unwrap();

        assert_eq!(doc.file_name, "EEG_Report_rep-1.pdf");
        assert_eq!(doc.page_count, 3);
        assert!(doc.bytes.starts_with(b"%PDF"));
        let heights: Vec<u32> = doc.placements.iter().map(|p| p.height_px).collect();
        assert_eq!(heights, vec![1436, 718, 2010]);
        assert_eq!(
            doc.placements.iter().map(|p| p.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(doc.placements.iter().all(|p| p.width_mm == 190.0 && p.x_mm == 10.0));
    }

    #[tokio::test]
    async fn no_pages_is_an_error() {
        let err = export_pages("rep-1", Vec::new(), 2).await.unwrap_err();
        assert!(matches!(err, ExportError::NoPages));
    }

    #[tokio::test]
    async fn one_bad_page_aborts_the_export() {
        let pages = vec![
            png_data_url(10, 10, [0, 0, 0, 255]),
            "data:image/png;base64,bm90IGFuIGltYWdl".to_string(),
            png_data_url(10, 10, [0, 0, 0, 255]),
        ];
        let err = export_pages("rep-1", pages, 1).await.unwrap_err();
        assert!(matches!(err, ExportError::PageDecode { index: 1, .. }));
    }

    #[tokio::test]
    async fn abandoned_export_keeps_slot_until_done() {
        let session = crate::session::ReportSession::new("rep-1");
        let guard = session.begin_export().unwrap();
        let pages = vec![png_data_url(20, 20, [0, 0, 0, 255])];

        drop(spawn_export(guard, "rep-1".into(), pages, 1));
        assert!(session.is_exporting());
        assert!(matches!(
            session.begin_export(),
            Err(ExportError::AlreadyRunning)
        ));

        for _ in 0..500 {
            if !session.is_exporting() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(!session.is_exporting());
    }

    #[test]
    fn export_pdf_to_file_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("exports");
        let path = export_pdf_to_file(b"%PDF-1.3", "EEG_Report_x.pdf", &dir).unwrap();
        assert_eq!(path, dir.join("EEG_Report_x.pdf"));
        assert_eq!(std::fs::read(path).unwrap(), b"%PDF-1.3");
    }
}
