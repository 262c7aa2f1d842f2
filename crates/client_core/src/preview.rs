//! Preview handles are released exactly once, on `release` or on drop.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use uuid::Uuid;

use crate::selection::SelectedImage;

#[derive(Debug, Default)]
struct PreviewCounters {
    created: AtomicUsize,
    released: AtomicUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreviewStats {
    pub created: usize,
    pub released: usize,
}

impl PreviewStats {
    pub fn live(&self) -> usize {
        self.created.saturating_sub(self.released)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PreviewTracker {
    counters: Arc<PreviewCounters>,
}

impl PreviewTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, image: &SelectedImage) -> PreviewReference {
        self.counters.created.fetch_add(1, Ordering::SeqCst);
        let url: Arc<str> = Arc::from(format!(
            "data:{};base64,{}",
            image.mime_type(),
            STANDARD.encode(image.bytes())
        ));
        let preview = PreviewReference {
            id: Uuid::new_v4(),
            url,
            counters: Arc::clone(&self.counters),
        };
        tracing::debug!(preview_id = %preview.id, file = image.file_name(), "preview acquired");
        preview
    }

    pub fn stats(&self) -> PreviewStats {
        PreviewStats {
            created: self.counters.created.load(Ordering::SeqCst),
            released: self.counters.released.load(Ordering::SeqCst),
        }
    }
}

#[derive(Debug)]
pub struct PreviewReference {
    id: Uuid,
    url: Arc<str>,
    counters: Arc<PreviewCounters>,
}

impl PreviewReference {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// `data:` URL any renderer can display without touching the network.
    pub fn url(&self) -> Arc<str> {
        Arc::clone(&self.url)
    }

    pub fn release(self) {
        drop(self);
    }
}

impl Drop for PreviewReference {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(preview_id = %self.id, "preview released");
    }
}
