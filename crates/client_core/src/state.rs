//! Submission state machine.
//!
//! | from                      | event            | to       |
//! |---------------------------|------------------|----------|
//! | any but Loading           | select(image)    | Selected |
//! | Selected/Failure/Success  | begin (image)    | Loading  |
//! | any but Loading           | begin (no image) | Failure  |
//! | Loading                   | finish(Ok)       | Success  |
//! | Loading                   | finish(Err)      | Failure  |
//! | any                       | reset            | Idle     |
//!
//! Fields are private so the data invariants of each phase can only change
//! through these transitions.

use std::{fmt, sync::Arc};

use shared::domain::SubmissionId;

use crate::{
    error::SubmissionError, preview::PreviewReference, selection::SelectedImage,
    RecognitionResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Selected,
    Loading,
    Success,
    Failure,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Selected => "selected",
            Phase::Loading => "loading",
            Phase::Success => "success",
            Phase::Failure => "failure",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct SubmissionState {
    phase: Phase,
    selected_image: Option<SelectedImage>,
    preview: Option<PreviewReference>,
    result: Option<Arc<RecognitionResult>>,
    error: Option<SubmissionError>,
    in_flight: Option<SubmissionId>,
    last_submission: SubmissionId,
}

impl Default for SubmissionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            selected_image: None,
            preview: None,
            result: None,
            error: None,
            in_flight: None,
            last_submission: SubmissionId(0),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected_image(&self) -> Option<&SelectedImage> {
        self.selected_image.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewReference> {
        self.preview.as_ref()
    }

    pub fn result(&self) -> Option<&RecognitionResult> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&SubmissionError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(SubmissionError::message)
    }

    pub fn in_flight(&self) -> Option<SubmissionId> {
        self.in_flight
    }

    pub fn snapshot(&self) -> SubmissionSnapshot {
        SubmissionSnapshot {
            phase: self.phase,
            file_name: self
                .selected_image
                .as_ref()
                .map(|image| image.file_name().to_string()),
            preview_url: self.preview.as_ref().map(PreviewReference::url),
            error_message: self.error_message(),
            result: self.result.clone(),
        }
    }

    pub fn check_invariants(&self) -> Result<(), String> {
        let has_image = self.selected_image.is_some();
        if has_image != self.preview.is_some() {
            return Err(format!(
                "{}: image and preview must be set together",
                self.phase
            ));
        }
        if self.result.is_some() != (self.phase == Phase::Success) {
            return Err(format!("{}: result present outside success", self.phase));
        }
        let has_message = self
            .error_message()
            .is_some_and(|message| !message.is_empty());
        if has_message != (self.phase == Phase::Failure) {
            return Err(format!("{}: error message present outside failure", self.phase));
        }
        if self.in_flight.is_some() != (self.phase == Phase::Loading) {
            return Err(format!("{}: in-flight marker mismatch", self.phase));
        }
        let image_required = match self.phase {
            Phase::Idle => false,
            Phase::Failure => self.error != Some(SubmissionError::NoImageSelected),
            Phase::Selected | Phase::Loading | Phase::Success => true,
        };
        if image_required && !has_image {
            return Err(format!("{}: selected image missing", self.phase));
        }
        if self.phase == Phase::Idle && has_image {
            return Err("idle: stale selected image".to_string());
        }
        Ok(())
    }

    pub(crate) fn select(&mut self, image: SelectedImage, preview: PreviewReference) {
        // Replacing the old reference drops it, which releases it.
        self.preview = Some(preview);
        self.selected_image = Some(image);
        self.result = None;
        self.error = None;
        self.transition(Phase::Selected);
    }

    /// Enters Loading and hands out the image to upload. With no image selected
    /// the state moves to Failure instead.
    pub(crate) fn begin(&mut self) -> Result<(SubmissionId, SelectedImage), SubmissionError> {
        let Some(image) = self.selected_image.clone() else {
            self.fail(SubmissionError::NoImageSelected);
            return Err(SubmissionError::NoImageSelected);
        };
        let id = self.last_submission.next();
        self.last_submission = id;
        self.in_flight = Some(id);
        self.result = None;
        self.error = None;
        self.transition(Phase::Loading);
        Ok((id, image))
    }

    /// Applies the outcome of submission `id`. Returns `false` when `id` is not
    /// the submission currently in flight; the outcome is then dropped.
    pub(crate) fn finish(
        &mut self,
        id: SubmissionId,
        outcome: Result<RecognitionResult, SubmissionError>,
    ) -> bool {
        if self.phase != Phase::Loading || self.in_flight != Some(id) {
            return false;
        }
        self.in_flight = None;
        match outcome {
            Ok(result) => {
                self.result = Some(Arc::new(result));
                self.error = None;
                self.transition(Phase::Success);
            }
            Err(err) => self.fail(err),
        }
        true
    }

    pub fn reset(&mut self) {
        if let Some(preview) = self.preview.take() {
            preview.release();
        }
        self.selected_image = None;
        self.result = None;
        self.error = None;
        self.in_flight = None;
        self.transition(Phase::Idle);
    }

    fn fail(&mut self, err: SubmissionError) {
        self.result = None;
        self.in_flight = None;
        self.error = Some(err);
        self.transition(Phase::Failure);
    }

    fn transition(&mut self, next: Phase) {
        if self.phase != next {
            tracing::debug!(from = %self.phase, to = %next, "submission phase changed");
        }
        self.phase = next;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionSnapshot {
    pub phase: Phase,
    pub file_name: Option<String>,
    pub preview_url: Option<Arc<str>>,
    pub error_message: Option<String>,
    pub result: Option<Arc<RecognitionResult>>,
}

impl SubmissionSnapshot {
    pub fn can_submit(&self) -> bool {
        self.file_name.is_some() && self.phase != Phase::Loading
    }

    /// Reset is only offered once an attempt has finished.
    pub fn can_reset(&self) -> bool {
        matches!(self.phase, Phase::Success | Phase::Failure)
    }
}
