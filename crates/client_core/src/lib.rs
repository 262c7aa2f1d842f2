pub mod error;
pub mod orchestrator;
pub mod preview;
pub mod selection;
pub mod state;
pub mod transport;
pub mod view;

pub use error::SubmissionError;
pub use orchestrator::{BeginOutcome, RecognitionOrchestrator, SubmissionTicket, SubmitOutcome};
pub use preview::{PreviewReference, PreviewStats, PreviewTracker};
pub use selection::{SelectOutcome, SelectedImage, SelectionController};
pub use state::{Phase, SubmissionSnapshot, SubmissionState};
pub use transport::{HttpRecognitionTransport, RecognitionTransport};
pub use view::{compose, ResultView};

pub type RecognitionResult = shared::protocol::RecognitionResponse;

pub struct RecognitionSession<T> {
    state: SubmissionState,
    selection: SelectionController,
    orchestrator: RecognitionOrchestrator<T>,
}

impl<T: RecognitionTransport> RecognitionSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            state: SubmissionState::new(),
            selection: SelectionController::new(),
            orchestrator: RecognitionOrchestrator::new(transport),
        }
    }

    pub fn select_file(&mut self, file: Option<SelectedImage>) -> SelectOutcome {
        self.selection.select_file(&mut self.state, file)
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        self.orchestrator.submit(&mut self.state).await
    }

    /// First half of [`Self::submit`] for callers that run the request
    /// elsewhere and report back through [`Self::complete_submit`].
    pub fn begin_submit(&mut self) -> BeginOutcome {
        self.orchestrator.begin(&mut self.state)
    }

    pub fn complete_submit(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<RecognitionResult, SubmissionError>,
    ) -> SubmitOutcome {
        self.orchestrator.complete(&mut self.state, ticket, outcome)
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn snapshot(&self) -> SubmissionSnapshot {
        self.state.snapshot()
    }

    /// The composed result, only while in Success.
    pub fn view(&self) -> Option<ResultView> {
        self.state.result().map(compose)
    }

    pub fn previews(&self) -> PreviewStats {
        self.selection.preview_stats()
    }

    pub fn transport(&self) -> &T {
        self.orchestrator.transport()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
