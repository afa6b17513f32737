//! HTTP client for the four OCR endpoints and the response contract.

use crate::config::Config;
use crate::ocr::ImagePayload;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Substring the upstream model produces when it never saw the image.
pub const NO_IMAGE_SENTINEL: &str = "there's no image attached";

/// What the OCR API is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrMode {
    /// Extract all visible text
    Generic,
    /// Extract structured fields from an ID card, license, etc.
    Document,
}

/// How the image travels in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Multipart,
    Base64,
}

/// Path of the endpoint serving a mode/encoding pair.
pub fn endpoint_path(mode: OcrMode, encoding: Encoding) -> &'static str {
    match (mode, encoding) {
        (OcrMode::Generic, Encoding::Multipart) => "/api/ocr/process",
        (OcrMode::Document, Encoding::Multipart) => "/api/ocr/document",
        (OcrMode::Generic, Encoding::Base64) => "/api/ocr/process-base64",
        (OcrMode::Document, Encoding::Base64) => "/api/ocr/document-base64",
    }
}

#[derive(Debug, Serialize)]
struct Base64Request<'a> {
    image: &'a str,
}

/// A response the API produced, good or bad.
#[derive(Debug, Clone, PartialEq)]
pub enum OcrOutcome {
    /// JSON body with the extracted text or fields
    Success(Value),
    /// The body carried an `error` field
    Rejected(String),
    /// The model reported that no image reached it
    NoImageAttached,
}

impl OcrOutcome {
    /// `extracted_text` of a generic-mode success.
    pub fn extracted_text(&self) -> Option<&str> {
        match self {
            OcrOutcome::Success(body) => body.get("extracted_text").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// Failures that never produced a usable response.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("HTTP error! Status: {status}")]
    Status { status: StatusCode, body: String },

    #[error("request to OCR API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse OCR response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for the four OCR endpoints.
#[derive(Debug, Clone)]
pub struct OcrClient {
    http: reqwest::Client,
    base_url: String,
}

impl OcrClient {
    pub fn new(config: &Config) -> Result<Self, OcrError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.ocr_api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send `payload` to the endpoint for `mode` and `encoding`.
    pub async fn process(
        &self,
        payload: &ImagePayload,
        mode: OcrMode,
        encoding: Encoding,
    ) -> Result<OcrOutcome, OcrError> {
        let url = format!("{}{}", self.base_url, endpoint_path(mode, encoding));
        info!(
            "Processing {} ({} bytes, {}) via {}",
            payload.file_name,
            payload.len(),
            payload.mime,
            url
        );

        let request = match encoding {
            Encoding::Multipart => {
                let part = Part::bytes(payload.bytes.clone())
                    .file_name(payload.file_name.clone())
                    .mime_str(&payload.mime)?;
                self.http
                    .post(&url)
                    .multipart(Form::new().part("image", part))
            }
            Encoding::Base64 => {
                let data_url = payload.to_data_url();
                debug!("Sending base64 image, length: {}", data_url.len());
                self.http.post(&url).json(&Base64Request { image: &data_url })
            }
        };

        let response = request.send().await?;
        let status = response.status();
        debug!("Received response with status: {}", status);
        let body = response.text().await?;

        interpret_response(status, &body)
    }
}

/// Apply the response contract to a status and raw body.
pub fn interpret_response(status: StatusCode, body: &str) -> Result<OcrOutcome, OcrError> {
    if !status.is_success() {
        if body.contains(NO_IMAGE_SENTINEL) {
            return Ok(OcrOutcome::NoImageAttached);
        }
        warn!("OCR API returned {}", status);
        return Err(OcrError::Status {
            status,
            body: body.to_string(),
        });
    }

    let json: Value = serde_json::from_str(body)?;

    if let Some(error) = json.get("error").filter(|e| is_truthy(e)) {
        let message = match error {
            Value::String(message) => message.clone(),
            other => other.to_string(),
        };
        return Ok(OcrOutcome::Rejected(message));
    }

    let no_image = json
        .get("extracted_text")
        .and_then(Value::as_str)
        .is_some_and(|text| text.contains(NO_IMAGE_SENTINEL));
    if no_image {
        return Ok(OcrOutcome::NoImageAttached);
    }

    Ok(OcrOutcome::Success(json))
}

/// `null`, `false`, `0` and `""` do not count as an error.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
