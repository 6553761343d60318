//! Page rasterization: decode a host snapshot and resample it to the
//! fixed export scale.

use image::imageops::FilterType;
use image::{GenericImageView, Rgb, RgbImage, RgbaImage};

use super::{ExportError, CONTENT_WIDTH_MM, CSS_DPI, MM_PER_INCH, RASTER_SCALE};
use crate::imaging::decode_data_url;

/// Bitmap width every page is resampled to (content width at 96 dpi, x2).
pub fn target_width_px() -> u32 {
    (CONTENT_WIDTH_MM / MM_PER_INCH * CSS_DPI * RASTER_SCALE).round() as u32
}

/// Tallest page accepted, as a multiple of its width. An A4 page is about
/// 1.6; anything far beyond that is not a report page.
pub const MAX_PAGE_ASPECT: u32 = 8;

/// Height that keeps the source aspect ratio at `width`.
pub fn scaled_height(src_width: u32, src_height: u32, width: u32) -> u32 {
    let height = f64::from(src_height) * f64::from(width) / f64::from(src_width);
    height.round().clamp(1.0, f64::from(u32::MAX)) as u32
}

/// Rasterize page `index` from an image data URL (or bare base64).
///
/// CPU-bound; call from a blocking worker.
pub fn rasterize(index: usize, data_url: &str, width: u32) -> Result<RgbImage, ExportError> {
    let bytes = decode_data_url(data_url).map_err(|e| page_error(index, e))?;
    let decoded = image::load_from_memory(&bytes).map_err(|e| page_error(index, e))?;
    let (src_width, src_height) = decoded.dimensions();
    if src_width == 0 || src_height == 0 {
        return Err(page_error(index, "empty image"));
    }

    let height = scaled_height(src_width, src_height, width);
    if height > width.saturating_mul(MAX_PAGE_ASPECT) {
        return Err(page_error(
            index,
            format!("page is {src_width}x{src_height}, too tall to export"),
        ));
    }
    let resized = decoded.resize_exact(width, height, FilterType::Triangle);
    tracing::trace!(
        page = index,
        from = ?(src_width, src_height),
        to = ?(width, height),
        "Page rasterized"
    );
    Ok(flatten_on_white(&resized.to_rgba8()))
}

fn page_error(index: usize, err: impl std::fmt::Display) -> ExportError {
    ExportError::PageDecode {
        index,
        reason: err.to_string(),
    }
}

// Transparent regions print as paper white.
fn flatten_on_white(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(test)]
pub(crate) mod test_pages {
    use std::io::Cursor;

    use base64::Engine;
    use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};

    /// A solid-colour PNG snapshot as a data URL.
    pub fn png_data_url(width: u32, height: u32, color: [u8; 4]) -> String {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut bytes, ImageOutputFormat::Png)
            .unwrap();
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes.into_inner())
        )
    }
}
