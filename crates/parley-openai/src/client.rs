// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI Chat Completions API.
//!
//! Provides [`OpenAiClient`] which handles request construction,
//! authentication, and transient error retry.

use std::time::Duration;

use parley_core::ParleyError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

/// HTTP client for OpenAI API communication.
///
/// Manages authentication headers, connection pooling, and retry logic
/// for transient errors (429, 500, 503).
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    default_model: String,
    max_retries: u32,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a new OpenAI API client.
    pub fn new(api_key: String, api_base: String, model: String) -> Result<Self, ParleyError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| ParleyError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| ParleyError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                transient: false,
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            default_model: model,
            max_retries: 1,
            base_url: format!("{}/chat/completions", api_base.trim_end_matches('/')),
        })
    }

    /// Returns the default model identifier.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Overrides the full completions URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Sends a chat completion request and returns the full response.
    ///
    /// On transient errors (429, 500, 503), retries once after a 1-second delay.
    pub async fn complete_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ParleyError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&self.base_url)
                .json(request)
                .send()
                .await
                .map_err(|e| ParleyError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    transient: true,
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| ParleyError::Provider {
                    message: format!("failed to read response body: {e}"),
                    transient: true,
                    source: Some(Box::new(e)),
                })?;
                let chat: ChatResponse =
                    serde_json::from_str(&body).map_err(|e| ParleyError::Provider {
                        message: format!("failed to parse API response: {e}"),
                        transient: false,
                        source: Some(Box::new(e)),
                    })?;
                return Ok(chat);
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(ParleyError::Provider {
                    message: format!("API returned {status}: {body}"),
                    transient: true,
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let transient = is_transient_error(status);
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "OpenAI API error ({}): {}",
                    api_err.error.type_, api_err.error.message
                )
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(ParleyError::Provider {
                message,
                transient,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| ParleyError::Provider {
            message: "completion request failed after retries".into(),
            transient: true,
            source: None,
        }))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503 | 529)
}
