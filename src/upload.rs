//! Upload widget controller.
//!
//! Tracks the selected image, guards against overlapping requests and
//! discards responses that arrive after the selection changed. Every
//! selection change and every request bumps a generation counter; a
//! response is only displayed if its ticket still carries the current
//! generation.

use crate::i18n::Localizer;
use crate::ocr::{Encoding, ImagePayload, OcrClient, OcrError, OcrMode, OcrOutcome};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Requesting { generation: u64 },
    Error(String),
}

/// Where the current image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Chosen or dropped file
    File,
    /// Pasted from the clipboard as a data URL
    Pasted,
}

impl Source {
    /// Files go up as multipart forms, pasted images as base64 JSON.
    pub fn encoding(self) -> Encoding {
        match self {
            Source::File => Encoding::Multipart,
            Source::Pasted => Encoding::Base64,
        }
    }
}

/// What the result area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    Hidden,
    Json(String),
    Error(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("a request is already in flight")]
    Busy,

    #[error("no image selected")]
    NothingSelected,

    #[error("{0}")]
    NotAnImage(String),
}

/// Whether a completed request reached the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Discarded,
}

/// Proof of a started request.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    generation: u64,
    pub payload: ImagePayload,
    pub encoding: Encoding,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct UploadController {
    localizer: Arc<Localizer>,
    mode: OcrMode,
    selected: Option<(ImagePayload, Source)>,
    state: UploadState,
    view: ResultView,
    generation: u64,
}

impl UploadController {
    pub fn new(localizer: Arc<Localizer>, mode: OcrMode) -> Self {
        Self {
            localizer,
            mode,
            selected: None,
            state: UploadState::Idle,
            view: ResultView::Hidden,
            generation: 0,
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    pub fn mode(&self) -> OcrMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: OcrMode) {
        self.mode = mode;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selected(&self) -> Option<&ImagePayload> {
        self.selected.as_ref().map(|(payload, _)| payload)
    }

    /// The action button is enabled only with an image and nothing in flight.
    pub fn can_process(&self) -> bool {
        self.selected.is_some() && !matches!(self.state, UploadState::Requesting { .. })
    }

    /// Select a chosen or dropped file. Non-images are rejected inline.
    pub fn select_file(&mut self, payload: ImagePayload) -> Result<(), UploadError> {
        self.generation += 1;

        if !payload.is_image() {
            let message = self.localizer.translate("error_not_image");
            warn!("Rejected {} ({})", payload.file_name, payload.mime);
            self.selected = None;
            self.show_error(message.clone());
            return Err(UploadError::NotAnImage(message));
        }

        info!(
            "Selected file: {} Size: {} Type: {}",
            payload.file_name,
            payload.len(),
            payload.mime
        );
        self.selected = Some((payload, Source::File));
        self.state = UploadState::Idle;
        self.view = ResultView::Hidden;
        Ok(())
    }

    /// Handle a paste. Anything that is not an image data URL is ignored.
    pub fn paste(&mut self, data_url: &str) -> bool {
        match ImagePayload::from_data_url(data_url) {
            Ok(payload) if payload.is_image() => {
                self.generation += 1;
                debug!("Pasted image, {} bytes", payload.len());
                self.selected = Some((payload, Source::Pasted));
                self.state = UploadState::Idle;
                self.view = ResultView::Hidden;
                true
            }
            Ok(_) => false,
            Err(e) => {
                debug!("Ignoring paste: {}", e);
                false
            }
        }
    }

    /// Remove the image and reset the widget.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.selected = None;
        self.state = UploadState::Idle;
        self.view = ResultView::Hidden;
    }

    /// Start a request, using the encoding that fits the image's source.
    pub fn begin(&mut self) -> Result<RequestTicket, UploadError> {
        let encoding = match &self.selected {
            Some((_, source)) => source.encoding(),
            None => return Err(UploadError::NothingSelected),
        };
        self.begin_with(encoding)
    }

    pub fn begin_with(&mut self, encoding: Encoding) -> Result<RequestTicket, UploadError> {
        if matches!(self.state, UploadState::Requesting { .. }) {
            return Err(UploadError::Busy);
        }
        let payload = match &self.selected {
            Some((payload, _)) => payload.clone(),
            None => return Err(UploadError::NothingSelected),
        };

        self.generation += 1;
        self.state = UploadState::Requesting {
            generation: self.generation,
        };
        self.view = ResultView::Hidden;
        info!("Processing image: {}", payload.file_name);

        Ok(RequestTicket {
            generation: self.generation,
            payload,
            encoding,
        })
    }

    /// Display a response, unless the widget moved on since `ticket` was issued.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        result: Result<OcrOutcome, OcrError>,
    ) -> Completion {
        if ticket.generation != self.generation {
            debug!(
                "Discarding stale response (generation {}, current {})",
                ticket.generation, self.generation
            );
            return Completion::Discarded;
        }

        match result {
            Ok(OcrOutcome::Success(body)) => match serde_json::to_string_pretty(&body) {
                Ok(json) => {
                    self.state = UploadState::Idle;
                    self.view = ResultView::Json(json);
                }
                Err(e) => self.show_error(format!("Error formatting result: {}", e)),
            },
            Ok(OcrOutcome::Rejected(message)) => self.show_error(message),
            Ok(OcrOutcome::NoImageAttached) => {
                let message = self.localizer.translate("error_no_image_attached");
                self.show_error(message);
            }
            Err(e) => {
                warn!("Error during processing: {}", e);
                let prefix = self.localizer.translate("error_processing");
                self.show_error(format!("{}: {}", prefix, e));
            }
        }
        Completion::Applied
    }

    /// Begin, call the API and complete in one step.
    pub async fn submit(&mut self, client: &OcrClient) -> Result<Completion, UploadError> {
        let ticket = self.begin()?;
        let result = client
            .process(&ticket.payload, self.mode, ticket.encoding)
            .await;
        Ok(self.complete(ticket, result))
    }

    fn show_error(&mut self, message: String) {
        self.state = UploadState::Error(message.clone());
        self.view = ResultView::Error(message);
    }
}
