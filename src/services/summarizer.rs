use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::SummarizerConfig;

/// Stored when the upstream answers 2xx but without any usable text
pub const NO_SUMMARY_PLACEHOLDER: &str = "No summary returned.";

#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Server returned error status {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

impl SummarizerError {
    /// Detail safe to hand back to the caller alongside a 500
    pub fn detail(&self) -> String {
        match self {
            SummarizerError::ServerError { body, .. } if !body.is_empty() => body.clone(),
            other => other.to_string(),
        }
    }
}

/// Remote capability that condenses text
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, SummarizerError>;
}

#[derive(Debug, Serialize)]
struct SummarizationRequest<'a> {
    text: &'a str,
}

/// The API answers with either field depending on the model
#[derive(Debug, Default, Deserialize)]
pub struct SummarizationResponse {
    pub summary_text: Option<String>,
    pub summary: Option<String>,
}

impl SummarizationResponse {
    /// First non-blank of `summary_text`, `summary`, else the placeholder. Never empty.
    pub fn into_summary(self) -> String {
        [self.summary_text, self.summary]
            .into_iter()
            .flatten()
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| NO_SUMMARY_PLACEHOLDER.to_string())
    }
}

/// Client for the NLP Cloud summarization endpoint
pub struct NlpCloudClient {
    http: Client,
    endpoint: String,
    api_token: String,
    timeout: Duration,
}

impl NlpCloudClient {
    pub fn new(config: &SummarizerConfig) -> Result<Self, SummarizerError> {
        let timeout = config.timeout();
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/summarization", config.base_url.trim_end_matches('/')),
            api_token: config.api_token.clone(),
            timeout,
        })
    }
}

#[async_trait]
impl Summarizer for NlpCloudClient {
    #[tracing::instrument(skip_all, fields(endpoint = %self.endpoint, chars = text.len()))]
    async fn summarize(&self, text: &str) -> Result<String, SummarizerError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("Token {}", self.api_token))
            .json(&SummarizationRequest { text })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SummarizerError::Timeout(self.timeout)
                } else {
                    SummarizerError::RequestFailed(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SummarizerError::ServerError {
                status: status.as_u16(),
                body,
            });
        }

        let res: SummarizationResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                SummarizerError::Timeout(self.timeout)
            } else {
                SummarizerError::RequestFailed(e)
            }
        })?;

        Ok(res.into_summary())
    }
}
