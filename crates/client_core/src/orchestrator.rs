use std::{any::Any, panic::AssertUnwindSafe};

use futures::FutureExt;
use shared::domain::SubmissionId;
use tracing::{info, warn};

use crate::{
    error::SubmissionError,
    selection::SelectedImage,
    state::{Phase, SubmissionState},
    transport::RecognitionTransport,
    RecognitionResult,
};

/// Proof that a submission entered Loading. Carries the image to upload.
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    id: SubmissionId,
    image: SelectedImage,
}

impl SubmissionTicket {
    pub fn id(&self) -> SubmissionId {
        self.id
    }

    pub fn image(&self) -> &SelectedImage {
        &self.image
    }
}

#[derive(Debug)]
pub enum BeginOutcome {
    Started(SubmissionTicket),
    /// No image was selected; the state is already in Failure.
    Rejected(SubmissionError),
    /// Another submission is in flight; nothing changed.
    AlreadyLoading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Succeeded,
    Failed(SubmissionError),
    /// Reentrant call or stale completion; state untouched.
    Ignored,
}

pub struct RecognitionOrchestrator<T> {
    transport: T,
}

impl<T: RecognitionTransport> RecognitionOrchestrator<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn submit(&self, state: &mut SubmissionState) -> SubmitOutcome {
        let ticket = match self.begin(state) {
            BeginOutcome::Started(ticket) => ticket,
            BeginOutcome::Rejected(err) => return SubmitOutcome::Failed(err),
            BeginOutcome::AlreadyLoading => return SubmitOutcome::Ignored,
        };
        let outcome = self.dispatch(&ticket).await;
        self.complete(state, ticket, outcome)
    }

    pub fn begin(&self, state: &mut SubmissionState) -> BeginOutcome {
        if state.phase() == Phase::Loading {
            warn!(in_flight = ?state.in_flight(), "submit ignored: request already in flight");
            return BeginOutcome::AlreadyLoading;
        }
        match state.begin() {
            Ok((id, image)) => {
                info!(
                    submission = %id,
                    file = image.file_name(),
                    size_bytes = image.size_bytes(),
                    "recognition request started"
                );
                BeginOutcome::Started(SubmissionTicket { id, image })
            }
            Err(err) => {
                warn!(error = %err, "submit rejected");
                BeginOutcome::Rejected(err)
            }
        }
    }

    /// Performs the network exchange for `ticket`. A panic inside the transport
    /// is turned into a decode failure so the caller can always complete.
    pub async fn dispatch(
        &self,
        ticket: &SubmissionTicket,
    ) -> Result<RecognitionResult, SubmissionError> {
        AssertUnwindSafe(self.transport.recognize(&ticket.image))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(SubmissionError::decode(format!(
                    "recognition aborted: {}",
                    panic_message(panic.as_ref())
                )))
            })
    }

    pub fn complete(
        &self,
        state: &mut SubmissionState,
        ticket: SubmissionTicket,
        outcome: Result<RecognitionResult, SubmissionError>,
    ) -> SubmitOutcome {
        let reported = match &outcome {
            Ok(_) => SubmitOutcome::Succeeded,
            Err(err) => SubmitOutcome::Failed(err.clone()),
        };
        if !state.finish(ticket.id, outcome) {
            warn!(submission = %ticket.id, "discarding completion of stale submission");
            return SubmitOutcome::Ignored;
        }
        match &reported {
            SubmitOutcome::Succeeded => {
                info!(submission = %ticket.id, "recognition request succeeded");
            }
            SubmitOutcome::Failed(err) => {
                warn!(submission = %ticket.id, kind = err.kind(), error = %err, "recognition request failed");
            }
            SubmitOutcome::Ignored => {}
        }
        reported
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        String::new()
    }
}
