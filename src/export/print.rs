//! Printable text rendition of the preview pages.
//!
//! Each preview page starts a new A4 sheet; a page whose content runs past
//! the bottom margin continues on an extra sheet.

use std::io::BufWriter;

use printpdf::image_crate::DynamicImage;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};

use super::{ExportError, MM_PER_INCH, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::imaging::EmbeddedImage;
use crate::stages::preview::{PageBlock, ReportPage};

const LEFT_MM: f32 = 20.0;
const TOP_MM: f32 = 280.0;
const BOTTOM_MM: f32 = 20.0;
const IMAGE_WIDTH_MM: f32 = 80.0;
const IMAGE_DPI: f32 = 150.0;

struct Cursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    sheets: usize,
}

impl Cursor {
    fn new_sheet(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = TOP_MM;
        self.sheets += 1;
    }

    fn reserve(&mut self, height: f32) {
        if self.y - height < BOTTOM_MM {
            self.new_sheet();
        }
    }

    fn line(&mut self, text: &str, size: f32, indent: f32, bold: bool, advance: f32) {
        self.reserve(advance);
        let font = if bold { &self.bold } else { &self.font };
        self.layer
            .use_text(text, size, Mm(LEFT_MM + indent), Mm(self.y), font);
        self.y -= advance;
    }

    fn wrapped(&mut self, text: &str, size: f32, indent: f32, max_chars: usize) {
        for line in wrap_text(text, max_chars) {
            self.line(&line, size, indent, false, 4.5);
        }
    }

    fn image(&mut self, caption: &str, image: &EmbeddedImage) {
        let decoded = image
            .bytes()
            .ok()
            .and_then(|bytes| printpdf::image_crate::load_from_memory(&bytes).ok());
        let Some(decoded) = decoded else {
            tracing::warn!(caption, "Embedded image could not be decoded, printing caption only");
            self.line(&format!("[{caption}]"), 9.0, 5.0, false, 4.5);
            return;
        };

        let rgb = decoded.to_rgb8();
        let (width_px, height_px) = rgb.dimensions();
        let natural_width_mm = width_px as f32 * MM_PER_INCH / IMAGE_DPI;
        let scale = IMAGE_WIDTH_MM / natural_width_mm;
        let height_mm = height_px as f32 * MM_PER_INCH / IMAGE_DPI * scale;

        self.reserve(height_mm + 6.0);
        Image::from_dynamic_image(&DynamicImage::ImageRgb8(rgb)).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(LEFT_MM + 5.0)),
                translate_y: Some(Mm(self.y - height_mm)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        self.y -= height_mm + 2.0;
        self.line(caption, 8.0, 5.0, false, 5.0);
    }
}

/// A printed report and how many sheets it took.
#[derive(Debug, Clone)]
pub struct PrintedDocument {
    pub bytes: Vec<u8>,
    pub sheets: usize,
}

fn pdf_error(context: &str, err: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(format!("{context}: {err}"))
}

/// Render the preview pages as a text PDF.
pub fn print_pages(title: &str, pages: &[ReportPage]) -> Result<PrintedDocument, ExportError> {
    if pages.is_empty() {
        return Err(ExportError::NoPages);
    }

    let (doc, page1, layer1) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| pdf_error("PDF font error", e))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| pdf_error("PDF font error", e))?;

    let mut cursor = Cursor {
        doc,
        layer,
        font,
        bold,
        y: TOP_MM,
        sheets: 1,
    };

    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            cursor.new_sheet();
        }
        cursor.line(&page.title, 16.0, 0.0, true, 7.0);
        for header in &page.header {
            cursor.line(header, 9.0, 0.0, false, 4.5);
        }
        cursor.y -= 4.0;

        for block in &page.blocks {
            match block {
                PageBlock::Heading { level, text } => {
                    let size = match level {
                        0..=2 => 12.0,
                        3 => 11.0,
                        _ => 10.0,
                    };
                    cursor.y -= 2.0;
                    cursor.line(text, size, 0.0, true, 6.0);
                }
                PageBlock::Field { label, value } => {
                    cursor.wrapped(&format!("{label}: {value}"), 9.0, 5.0, 90);
                }
                PageBlock::Bullet { text } => {
                    cursor.wrapped(&format!("- {text}"), 9.0, 5.0, 90);
                }
                PageBlock::Paragraph { text } | PageBlock::Placeholder { text } => {
                    cursor.wrapped(text, 9.0, 5.0, 90);
                }
                PageBlock::Image { caption, image } => cursor.image(caption, image),
            }
        }
    }

    tracing::debug!(pages = pages.len(), sheets = cursor.sheets, "Report printed");

    let sheets = cursor.sheets;
    let mut buf = BufWriter::new(Vec::new());
    cursor
        .doc
        .save(&mut buf)
        .map_err(|e| pdf_error("PDF save error", e))?;
    let bytes = buf
        .into_inner()
        .map_err(|e| pdf_error("PDF buffer error", e))?;
    Ok(PrintedDocument { bytes, sheets })
}

/// Simple word-wrap helper for PDF text rendering. Widths are counted in
/// chars; a word longer than a whole line is split across lines.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for piece in chars.chunks(max_chars) {
            if current_len > 0 && current_len + piece.len() + 1 > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(piece);
            current_len += piece.len();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
