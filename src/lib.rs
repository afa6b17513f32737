//! Easy OCR client: a localized world clock and image upload widgets that
//! forward files to a remote OCR API and render the returned JSON.

pub mod clock;
pub mod config;
pub mod i18n;
pub mod ocr;
pub mod upload;
