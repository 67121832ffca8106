//! Client for the external transcription collaborator.
//!
//! Voice alerts are transcribed out of process: the engine dispatches a
//! job (fire-and-forget) and the service later calls back on
//! `POST /api/v1/alerts/{id}/transcription` to store the result. The
//! request path never waits on this service.

use std::time::Duration;

use guardia_core::types::DbId;
use serde::Deserialize;

/// HTTP request timeout for a single dispatch attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for transcription dispatch failures.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Transcription service returned HTTP {0}")]
    HttpStatus(u16),
}

/// Body of the callback the transcription service posts when a job
/// finishes.
#[derive(Debug, Deserialize)]
pub struct TranscriptionCallback {
    /// Transcribed text; absent when the job failed.
    pub transcription: Option<String>,
    /// Comma-separated extracted keywords.
    pub keywords: Option<String>,
    /// `true` when the service could not transcribe the media.
    #[serde(default)]
    pub failed: bool,
}

/// Dispatches transcription jobs to the external service.
pub struct TranscriptionClient {
    client: reqwest::Client,
    base_url: String,
}

impl TranscriptionClient {
    /// Create a new client targeting `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Submit a transcription job for an alert's media reference.
    ///
    /// The service acknowledges with 2xx and performs the work
    /// asynchronously; results arrive via the callback endpoint.
    pub async fn dispatch(
        &self,
        alert_id: DbId,
        media_ref: &str,
    ) -> Result<(), TranscriptionError> {
        let url = format!("{}/jobs", self.base_url.trim_end_matches('/'));
        let payload = serde_json::json!({
            "alert_id": alert_id,
            "media_ref": media_ref,
        });

        let response = self.client.post(&url).json(&payload).send().await?;

        if !response.status().is_success() {
            return Err(TranscriptionError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}
