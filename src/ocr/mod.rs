//! Client for the remote Easy OCR API.
//!
//! - `payload`: image bytes, MIME detection and `data:` URL encoding
//! - `client`: the four endpoints and the response contract

mod client;
mod payload;

pub use client::{
    endpoint_path, interpret_response, Encoding, OcrClient, OcrError, OcrMode, OcrOutcome,
    NO_IMAGE_SENTINEL,
};
pub use payload::{mime_for_path, ImagePayload, PayloadError, OCTET_STREAM};
