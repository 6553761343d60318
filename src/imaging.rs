//! Embedded images for annotation strips and the signature.
//!
//! Uploads are kept inside the report as self-contained
//! `data:<mime>;base64,<payload>` strings. Only `image/*` types are
//! accepted; there is no size limit and no decoding of the pixels here.

use base64::Engine;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Not an image: {0}")]
    NotAnImage(String),
    #[error("Cannot determine image type for {0}")]
    UnknownType(String),
    #[error("Base64 decode failed: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// An image stored in the report as a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedImage {
    pub mime_type: String,
    pub data_url: String,
}

/// A file selection sent by the browser.
///
/// `data` is either a full data URL (what `FileReader.readAsDataURL`
/// produces) or bare base64.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpload {
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    pub data: String,
}

impl EmbeddedImage {
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self {
            mime_type: mime_type.to_string(),
            data_url: format!("data:{mime_type};base64,{payload}"),
        }
    }

    /// Validate an upload and re-encode it as a data URL.
    ///
    /// The MIME type comes from the declared content type, then the data
    /// URL header, then the file extension, then the magic bytes.
    pub fn from_upload(upload: &ImageUpload) -> Result<Self, ImageError> {
        let bytes = decode_data_url(&upload.data)?;

        let mime = upload
            .content_type
            .clone()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| data_url_mime(&upload.data).map(str::to_string))
            .or_else(|| {
                mime_guess::from_path(&upload.file_name)
                    .first()
                    .map(|m| m.essence_str().to_string())
            })
            .or_else(|| detect_image_mime(&bytes).map(str::to_string))
            .ok_or_else(|| ImageError::UnknownType(upload.file_name.clone()))?;

        if !mime.starts_with("image/") {
            return Err(ImageError::NotAnImage(mime));
        }

        Ok(Self::from_bytes(&mime, &bytes))
    }

    /// Raw image bytes.
    pub fn bytes(&self) -> Result<Vec<u8>, ImageError> {
        decode_data_url(&self.data_url)
    }
}

/// Decode a base64 data URL to raw bytes.
///
/// Handles both `data:image/png;base64,...` and raw base64 strings.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, ImageError> {
    let base64_data = match data_url.find(',') {
        Some(idx) => &data_url[idx + 1..],
        None => data_url,
    };

    Ok(base64::engine::general_purpose::STANDARD.decode(base64_data.trim())?)
}

/// MIME type from a `data:<mime>;base64,` header, if present.
fn data_url_mime(data: &str) -> Option<&str> {
    let rest = data.strip_prefix("data:")?;
    let end = rest.find([';', ','])?;
    let mime = &rest[..end];
    (!mime.is_empty()).then_some(mime)
}

/// Detect an image MIME type from magic bytes.
pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() >= 3 && bytes[0..3] == [0xFF, 0xD8, 0xFF] {
        Some("image/jpeg")
    } else if bytes.len() >= 8 && bytes[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]
    {
        Some("image/png")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else if bytes.len() >= 6 && (&bytes[0..6] == b"GIF87a" || &bytes[0..6] == b"GIF89a") {
        Some("image/gif")
    } else {
        None
    }
}
