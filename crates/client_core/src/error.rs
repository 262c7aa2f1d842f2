use thiserror::Error;

pub const NO_IMAGE_SELECTED_MESSAGE: &str = "Please select a file first.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("no image selected")]
    NoImageSelected,
    #[error("recognition service returned HTTP {status}")]
    Http { status: u16, detail: Option<String> },
    #[error("transport failure: {cause}")]
    Transport { cause: String },
    #[error("decode failure: {cause}")]
    Decode { cause: String },
}

impl SubmissionError {
    pub fn http(status: u16, detail: Option<String>) -> Self {
        Self::Http { status, detail }
    }

    pub fn transport(cause: impl ToString) -> Self {
        Self::Transport {
            cause: cause.to_string(),
        }
    }

    pub fn decode(cause: impl ToString) -> Self {
        Self::Decode {
            cause: cause.to_string(),
        }
    }

    /// Message rendered in the Failure phase. Never empty.
    pub fn message(&self) -> String {
        match self {
            Self::NoImageSelected => NO_IMAGE_SELECTED_MESSAGE.to_string(),
            Self::Http {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            Self::Http { status, .. } => format!("HTTP error! Status: {status}"),
            Self::Transport { cause } => with_cause("Could not reach the recognition service", cause),
            Self::Decode { cause } => {
                with_cause("Unexpected response from the recognition service", cause)
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoImageSelected => "no_image_selected",
            Self::Http { .. } => "http",
            Self::Transport { .. } => "transport",
            Self::Decode { .. } => "decode",
        }
    }
}

fn with_cause(prefix: &str, cause: &str) -> String {
    let cause = cause.trim();
    if cause.is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        format!("{prefix}: {cause}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_detail_is_rendered_verbatim() {
        let err = SubmissionError::http(422, Some("unsupported file type".into()));
        assert_eq!(err.message(), "unsupported file type");
    }

    #[test]
    fn http_without_detail_falls_back_to_status() {
        assert_eq!(
            SubmissionError::http(503, None).message(),
            "HTTP error! Status: 503"
        );
        assert_eq!(
            SubmissionError::http(500, Some(" ".into())).message(),
            "HTTP error! Status: 500"
        );
    }

    #[test]
    fn empty_causes_use_generic_fallback() {
        assert_eq!(SubmissionError::transport("").message(), UNKNOWN_ERROR_MESSAGE);
        assert_eq!(SubmissionError::decode("  ").message(), UNKNOWN_ERROR_MESSAGE);
    }

    #[test]
    fn every_variant_renders_a_non_empty_message() {
        let errors = [
            SubmissionError::NoImageSelected,
            SubmissionError::http(404, None),
            SubmissionError::transport("connection refused"),
            SubmissionError::decode("expected value at line 1 column 1"),
        ];
        for err in errors {
            assert!(!err.message().is_empty(), "{err:?}");
        }
    }

    #[test]
    fn no_image_message_matches_prompt() {
        assert_eq!(
            SubmissionError::NoImageSelected.message(),
            "Please select a file first."
        );
    }
}
