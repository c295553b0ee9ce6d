//! HTTP client for the upstream analysis API.

use log::debug;
use serde::Deserialize;

use crate::assembler::MessagesRequest;
use crate::config::ClientConfig;
use crate::error::AnalysisError;

/// Fixed protocol-version marker sent with every request.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Provider response, tolerant of both the content shape and the error
/// envelope `{error:{message}}` a relay may synthesize on transport failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ResponseBlock>,
    #[serde(default)]
    pub error: Option<ErrorEnvelope>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseBlock {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub message: String,
}

impl MessagesResponse {
    /// Concatenates all text-bearing fragments in order.
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| block.text.as_deref())
            .collect()
    }
}

pub struct AnalysisClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl AnalysisClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issues one analysis request. A single suspending operation with no
    /// internal concurrency, no retry, and no timeout of its own.
    ///
    /// The credential travels only in the `x-api-key` header. An error
    /// envelope in the response body is surfaced as
    /// [`AnalysisError::Upstream`] with the provider's message verbatim.
    pub async fn send(
        &self,
        request: &MessagesRequest,
        api_key: &str,
    ) -> Result<MessagesResponse, AnalysisError> {
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));
        debug!("Sending analysis request to {}", url);

        let response = self
            .http
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await?;

        let body = response.json::<MessagesResponse>().await?;
        if let Some(envelope) = &body.error {
            return Err(AnalysisError::Upstream(envelope.message.clone()));
        }

        Ok(body)
    }
}
