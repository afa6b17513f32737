//! Image payloads and their `data:` URL form.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use thiserror::Error;

/// MIME type used when nothing better is known.
pub const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("not a base64 data URL")]
    InvalidDataUrl,

    #[error("invalid base64 image data: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// An image (or would-be image) selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(file_name: &str, mime: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            mime: mime.to_string(),
            bytes,
        }
    }

    /// Read a file, guessing its MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, PayloadError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| PayloadError::Read {
                path: path.display().to_string(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            mime: mime_for_path(path).to_string(),
            file_name,
            bytes,
        })
    }

    /// Parse a pasted `data:<mime>;base64,<data>` URL.
    pub fn from_data_url(url: &str) -> Result<Self, PayloadError> {
        let rest = url.strip_prefix("data:").ok_or(PayloadError::InvalidDataUrl)?;
        let (mime, data) = rest
            .split_once(";base64,")
            .ok_or(PayloadError::InvalidDataUrl)?;
        let bytes = STANDARD.decode(data.trim())?;
        let mime = if mime.is_empty() { OCTET_STREAM } else { mime };

        Ok(Self::new("pasted", mime, bytes))
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Encode as `data:<mime>;base64,<data>`.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Guess a MIME type from a path's extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => OCTET_STREAM,
    }
}
