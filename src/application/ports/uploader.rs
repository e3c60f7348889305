//! Upload port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::Recording;

/// Upload errors
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    #[error("No upload endpoint configured. Set CAMCLIP_UPLOAD_URL or run 'camclip config set upload_url <url>'")]
    MissingEndpoint,

    #[error("Upload request failed: {0}")]
    RequestFailed(String),

    #[error("Upload rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Response of a successful upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    /// Correlation id sent with the request
    pub correlation_id: String,
    pub status: u16,
    /// JSON response body, or the raw text wrapped as a JSON string
    pub body: serde_json::Value,
}

/// Port for handing a finished recording to a remote service
#[async_trait]
pub trait UploadClient: Send + Sync {
    /// Upload the recording with processing instructions.
    ///
    /// Every request carries a fresh correlation id.
    async fn upload(
        &self,
        recording: &Recording,
        instructions: &str,
    ) -> Result<UploadResult, UploadError>;
}
