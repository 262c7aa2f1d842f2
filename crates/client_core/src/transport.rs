use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, StatusCode,
};
use shared::{domain::DEFAULT_UPLOAD_FIELD, error::ErrorDetail};
use url::Url;

use crate::{error::SubmissionError, selection::SelectedImage, RecognitionResult};

/// One request/response exchange with the recognition service. Implementations
/// classify every failure instead of returning opaque errors.
#[async_trait]
pub trait RecognitionTransport: Send + Sync {
    async fn recognize(&self, image: &SelectedImage) -> Result<RecognitionResult, SubmissionError>;
}

#[async_trait]
impl<T: RecognitionTransport + ?Sized> RecognitionTransport for Arc<T> {
    async fn recognize(&self, image: &SelectedImage) -> Result<RecognitionResult, SubmissionError> {
        (**self).recognize(image).await
    }
}

pub struct HttpRecognitionTransport {
    http: Client,
    endpoint: Url,
    upload_field: String,
}

impl HttpRecognitionTransport {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self {
            http,
            endpoint,
            upload_field: DEFAULT_UPLOAD_FIELD.to_string(),
        }
    }

    pub fn with_upload_field(mut self, field: impl Into<String>) -> Self {
        self.upload_field = field.into();
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn form(&self, image: &SelectedImage) -> Result<Form, SubmissionError> {
        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.mime_type())
            .map_err(|e| SubmissionError::transport(format!("invalid image content type: {e}")))?;
        Ok(Form::new().part(self.upload_field.clone(), part))
    }
}

#[async_trait]
impl RecognitionTransport for HttpRecognitionTransport {
    async fn recognize(&self, image: &SelectedImage) -> Result<RecognitionResult, SubmissionError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(self.form(image)?)
            .send()
            .await
            .map_err(|e| SubmissionError::transport(describe_reqwest_error(&e)))?;

        let status = response.status();
        let body = response.bytes().await;
        if !status.is_success() {
            // An unreadable error body still has a status worth reporting.
            let detail = body.ok().and_then(|bytes| error_detail(&bytes));
            return Err(SubmissionError::http(status.as_u16(), detail));
        }

        let body = body.map_err(|e| SubmissionError::transport(describe_reqwest_error(&e)))?;
        decode_success(status, &body)
    }
}

fn decode_success(status: StatusCode, body: &[u8]) -> Result<RecognitionResult, SubmissionError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(status = status.as_u16(), error = %e, "malformed recognition payload");
        SubmissionError::decode(e)
    })
}

fn error_detail(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorDetail>(body)
        .ok()
        .and_then(|detail| detail.message())
}

fn describe_reqwest_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
