// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.
//!
//! `MockProvider` implements `CompletionProvider` with pre-configured
//! responses, enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use parley_core::ParleyError;
use parley_core::traits::{CompletionProvider, PluginAdapter};
use parley_core::types::{
    AdapterType, CompletionReply, CompletionRequest, HealthStatus, TokenUsage,
};

/// A mock completion provider that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned. Requests are recorded
/// so tests can assert on the prompts the orchestrator built.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(text.into());
    }

    /// All requests seen so far, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    /// How many completion calls have been made.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    async fn next_response(&self) -> String {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ParleyError> {
        Ok(())
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply, ParleyError> {
        let model = request.model.clone();
        self.requests.lock().await.push(request);
        let text = self.next_response().await;
        Ok(CompletionReply {
            id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
            content: text,
            model,
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 20,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::types::ChatTurn;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "mock".into(),
            system: None,
            messages: vec![ChatTurn::user("hi")],
            max_tokens: 64,
        }
    }

    #[tokio::test]
    async fn responses_pop_in_fifo_order() {
        let provider = MockProvider::with_responses(vec!["first".into(), "second".into()]);
        assert_eq!(provider.complete(request()).await.unwrap().content, "first");
        assert_eq!(provider.complete(request()).await.unwrap().content, "second");
        assert_eq!(
            provider.complete(request()).await.unwrap().content,
            "mock response"
        );
        assert_eq!(provider.call_count().await, 3);
    }
}
