use async_trait::async_trait;
use serde::Deserialize;
use shared::{CardSubmission, Result, ServiceError, StoredRecord};

/// Delivers an assembled submission to the submit endpoint.
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn submit(&self, submission: &CardSubmission) -> Result<StoredRecord>;
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    record: Option<StoredRecord>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

#[derive(Clone)]
pub struct HttpSubmitClient {
    http: reqwest::Client,
    submit_url: String,
}

impl HttpSubmitClient {
    pub fn new(submit_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ServiceError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            submit_url: submit_url.into(),
        })
    }

    pub fn submit_url(&self) -> &str {
        &self.submit_url
    }
}

#[async_trait]
impl SubmissionTransport for HttpSubmitClient {
    async fn submit(&self, submission: &CardSubmission) -> Result<StoredRecord> {
        let response = self
            .http
            .post(&self.submit_url)
            .json(&submission.to_fields())
            .send()
            .await?;

        let status = response.status();
        let body: SubmitResponse = response.json().await.map_err(|e| {
            ServiceError::Http(format!("Unreadable reply (HTTP {}): {}", status.as_u16(), e))
        })?;

        match body {
            SubmitResponse {
                success: true,
                record: Some(record),
                ..
            } => Ok(record),
            SubmitResponse { error, details, .. } => {
                let message = error.unwrap_or_else(|| "Submission failed".to_string());
                tracing::warn!(
                    status = status.as_u16(),
                    error = %message,
                    details = ?details,
                    "Submission rejected"
                );
                Err(ServiceError::Store {
                    status: Some(status.as_u16()),
                    message,
                    explanation: details,
                })
            }
        }
    }
}
