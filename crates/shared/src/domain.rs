use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

id_newtype!(SubmissionId);

impl SubmissionId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Multipart field name the recognition endpoint reads the image from.
pub const DEFAULT_UPLOAD_FIELD: &str = "file";

/// Endpoint used when nothing else is configured.
pub const DEFAULT_RECOGNIZE_URL: &str = "http://127.0.0.1:8000/recognize";
