// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI chat completion provider adapter for the Parley platform.
//!
//! This crate implements [`CompletionProvider`] for the OpenAI Chat
//! Completions API, used by the orchestrator for every model call.

pub mod client;
pub mod types;

use async_trait::async_trait;
use parley_config::ParleyConfig;
use parley_core::error::ParleyError;
use parley_core::traits::{CompletionProvider, PluginAdapter};
use parley_core::types::{
    AdapterType, CompletionReply, CompletionRequest, HealthStatus, TokenUsage,
};
use tracing::debug;

use crate::client::OpenAiClient;
use crate::types::{ApiMessage, ChatRequest};

/// OpenAI provider implementing [`CompletionProvider`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    /// Creates a new OpenAI provider from the given configuration.
    pub fn new(config: &ParleyConfig) -> Result<Self, ParleyError> {
        let api_key = match &config.openai.api_key {
            Some(key) if !key.is_empty() => key.clone(),
            _ => std::env::var("OPENAI_API_KEY").map_err(|_| {
                ParleyError::Config(
                    "no OpenAI API key: set openai.api_key or OPENAI_API_KEY".into(),
                )
            })?,
        };

        let client = OpenAiClient::new(
            api_key,
            config.openai.api_base.clone(),
            config.openai.model.clone(),
        )?;
        debug!(model = %config.openai.model, "OpenAI provider ready");
        Ok(Self { client })
    }

    #[cfg(test)]
    fn with_client(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        // No cheap ping endpoint; a constructed client is considered healthy.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ParleyError> {
        Ok(())
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply, ParleyError> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(ApiMessage {
                role: "system".into(),
                content: system.clone(),
            });
        }
        for turn in &request.messages {
            messages.push(ApiMessage {
                role: turn.role.to_string(),
                content: turn.content.clone(),
            });
        }

        let model = if request.model.is_empty() {
            self.client.default_model().to_string()
        } else {
            request.model
        };

        let response = self
            .client
            .complete_chat(&ChatRequest {
                model,
                messages,
                max_tokens: request.max_tokens,
            })
            .await?;

        let content = response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| ParleyError::Provider {
                message: "API response contained no choices".into(),
                transient: false,
                source: None,
            })?;

        Ok(CompletionReply {
            id: response.id,
            content,
            model: response.model,
            usage: TokenUsage {
                prompt_tokens: response.usage.prompt_tokens,
                completion_tokens: response.usage.completion_tokens,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::types::ChatTurn;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn provider_for(server: &MockServer) -> OpenAiProvider {
        let client = OpenAiClient::new(
            "test-key".into(),
            "https://api.openai.com/v1".into(),
            "gpt-4o-mini".into(),
        )
        .unwrap()
        .with_base_url(format!("{}/chat/completions", server.uri()));
        OpenAiProvider::with_client(client)
    }

    #[tokio::test]
    async fn complete_prepends_system_turn_and_maps_reply() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "messages": [
                    {"role": "system", "content": "Be terse"},
                    {"role": "user", "content": "Hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "c-sys",
                "model": "gpt-4o-mini",
                "choices": [{"message": {"role": "assistant", "content": "Hi"}}],
                "usage": {"prompt_tokens": 7, "completion_tokens": 2}
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let reply = provider
            .complete(CompletionRequest {
                model: "gpt-4o-mini".into(),
                system: Some("Be terse".into()),
                messages: vec![ChatTurn::user("Hello")],
                max_tokens: 128,
            })
            .await
            .unwrap();

        assert_eq!(reply.content, "Hi");
        assert_eq!(reply.usage.completion_tokens, 2);
    }

    #[tokio::test]
    async fn empty_choices_is_a_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "c-empty",
                "model": "gpt-4o-mini",
                "choices": []
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let err = provider
            .complete(CompletionRequest {
                model: String::new(),
                system: None,
                messages: vec![ChatTurn::user("Hello")],
                max_tokens: 128,
            })
            .await
            .unwrap_err();
        assert!(!err.is_transient());
    }
}
