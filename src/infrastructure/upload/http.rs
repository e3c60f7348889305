//! HTTP multipart upload adapter

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use uuid::Uuid;

use crate::application::ports::{UploadClient, UploadError, UploadResult};
use crate::domain::recording::Recording;

/// Header carrying the per-upload correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Multipart field holding the video bytes
const VIDEO_FIELD: &str = "video";

/// Multipart field holding the instructions text
const INSTRUCTIONS_FIELD: &str = "instructions";

/// Uploads recordings as `multipart/form-data` POST requests
pub struct HttpUploadClient {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl HttpUploadClient {
    /// Create a client posting to `endpoint`
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client with no endpoint; every upload fails with `MissingEndpoint`
    pub fn unconfigured() -> Self {
        Self {
            endpoint: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Build the multipart body
    fn build_form(recording: &Recording, instructions: &str) -> Result<Form, UploadError> {
        let file_name = format!("video.{}", recording.mime_type().extension());
        let video = Part::bytes(recording.data().to_vec())
            .file_name(file_name)
            .mime_str(recording.mime_type().as_str())
            .map_err(|e| UploadError::RequestFailed(e.to_string()))?;

        Ok(Form::new()
            .part(VIDEO_FIELD, video)
            .text(INSTRUCTIONS_FIELD, instructions.to_string()))
    }

    /// Parse the response body as JSON, keeping plain text as a string value
    fn parse_body(text: String) -> serde_json::Value {
        match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(_) => serde_json::Value::String(text),
        }
    }
}

#[async_trait]
impl UploadClient for HttpUploadClient {
    async fn upload(
        &self,
        recording: &Recording,
        instructions: &str,
    ) -> Result<UploadResult, UploadError> {
        let url = self.endpoint.as_deref().ok_or(UploadError::MissingEndpoint)?;
        let form = Self::build_form(recording, instructions)?;
        let correlation_id = Uuid::new_v4().to_string();

        tracing::info!(
            %url,
            request_id = %correlation_id,
            size = recording.size_bytes(),
            "uploading recording"
        );

        let response = self
            .client
            .post(url)
            .header(REQUEST_ID_HEADER, &correlation_id)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| UploadError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(request_id = %correlation_id, %status, "upload rejected");
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(UploadResult {
            correlation_id,
            status: status.as_u16(),
            body: Self::parse_body(text),
        })
    }
}
