use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};

use crate::{
    preview::{PreviewStats, PreviewTracker},
    state::{Phase, SubmissionState},
};

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Image chosen by the user. Cloning shares the underlying bytes.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    file_name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl SelectedImage {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_raw()
            .unwrap_or(FALLBACK_MIME_TYPE)
            .to_string();
        Self {
            file_name,
            mime_type,
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read image '{}'", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected,
    /// Nothing was chosen; state untouched.
    Empty,
    /// A submission is in flight; its image cannot be swapped.
    Busy,
}

#[derive(Debug, Default)]
pub struct SelectionController {
    previews: PreviewTracker,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_file(
        &self,
        state: &mut SubmissionState,
        file: Option<SelectedImage>,
    ) -> SelectOutcome {
        let Some(file) = file else {
            return SelectOutcome::Empty;
        };
        if state.phase() == Phase::Loading {
            tracing::debug!(file = file.file_name(), "selection ignored while loading");
            return SelectOutcome::Busy;
        }

        let preview = self.previews.acquire(&file);
        tracing::info!(
            file = file.file_name(),
            mime = file.mime_type(),
            size_bytes = file.size_bytes(),
            "image selected"
        );
        state.select(file, preview);
        SelectOutcome::Selected
    }

    pub fn preview_stats(&self) -> PreviewStats {
        self.previews.stats()
    }
}
