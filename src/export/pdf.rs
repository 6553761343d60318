//! Multi-page PDF assembly from rasterized pages.

use std::io::BufWriter;

use image::RgbImage;
use printpdf::image_crate::{DynamicImage, RgbImage as PdfRgbImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

use super::{ExportError, MARGIN_MM, MM_PER_INCH, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

/// Image density the bitmaps are embedded at before scaling to fit.
const EMBED_DPI: f32 = 192.0;

/// Where one rasterized page lands on its A4 sheet. `y_mm` is measured
/// from the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub index: usize,
    pub width_px: u32,
    pub height_px: u32,
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

pub fn placement(index: usize, width_px: u32, height_px: u32) -> PagePlacement {
    let width_mm = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    PagePlacement {
        index,
        width_px,
        height_px,
        x_mm: MARGIN_MM,
        y_mm: MARGIN_MM,
        width_mm,
        height_mm: height_px as f32 * width_mm / width_px as f32,
    }
}

fn pdf_error(context: &str, err: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(format!("{context}: {err}"))
}

/// Place each page bitmap on its own A4 portrait sheet, in order.
pub fn assemble(
    title: &str,
    pages: &[RgbImage],
) -> Result<(Vec<u8>, Vec<PagePlacement>), ExportError> {
    if pages.is_empty() {
        return Err(ExportError::NoPages);
    }

    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let mut placements = Vec::with_capacity(pages.len());

    for (index, page) in pages.iter().enumerate() {
        let (page_idx, layer_idx) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
        };
        let layer = doc.get_page(page_idx).get_layer(layer_idx);

        let (width_px, height_px) = page.dimensions();
        let place = placement(index, width_px, height_px);

        let buffer = PdfRgbImage::from_raw(width_px, height_px, page.as_raw().clone())
            .ok_or_else(|| pdf_error("page bitmap", format!("page {index} buffer size mismatch")))?;
        let image = Image::from_dynamic_image(&DynamicImage::ImageRgb8(buffer));

        let natural_width_mm = width_px as f32 * MM_PER_INCH / EMBED_DPI;
        let scale = place.width_mm / natural_width_mm;
        image.add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(place.x_mm)),
                translate_y: Some(Mm(PAGE_HEIGHT_MM - place.y_mm - place.height_mm)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(EMBED_DPI),
                ..Default::default()
            },
        );
        placements.push(place);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf).map_err(|e| pdf_error("PDF save error", e))?;
    let bytes = buf
        .into_inner()
        .map_err(|e| pdf_error("PDF buffer error", e))?;
    Ok((bytes, placements))
}
