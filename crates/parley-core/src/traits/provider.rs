// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion provider trait for language-model integrations.

use async_trait::async_trait;

use crate::error::ParleyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionReply, CompletionRequest};

/// Adapter for call-and-response completion services.
///
/// The orchestrator makes at most one completion call per inbound message.
/// The reply's text is the whole contract: control tokens and embedded URLs
/// are scanned by the orchestrator, never interpreted by the provider.
#[async_trait]
pub trait CompletionProvider: PluginAdapter {
    /// Sends a completion request and returns the first choice's message.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply, ParleyError>;
}
