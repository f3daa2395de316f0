// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Parley platform.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter in the platform.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
    Mailer,
    Realtime,
    Channel,
}

/// The author of a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of conversation history as passed to the orchestrator and provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// The orchestrator's reply descriptor, consumed by the chat surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BotReply {
    /// First contact from a new email address; greets by the email local part.
    Welcome { content: String },
    /// The room is (now) live with a human operator.
    ///
    /// `content` carries the assistant's handoff sentence when the escalation
    /// was triggered by a completion reply, and is `None` when the room was
    /// already live.
    LiveHandoff {
        chat_room_id: String,
        content: Option<String>,
    },
    /// The completion reply embedded a booking/payment link.
    Link { content: String, link: String },
    /// A plain assistant reply.
    Plain { content: String },
}

// --- Completion provider types ---

/// A request to a completion provider.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier (e.g., "gpt-4o-mini").
    pub model: String,
    /// System prompt prepended to the conversation.
    pub system: Option<String>,
    /// Ordered conversation history, ending with the latest user turn.
    pub messages: Vec<ChatTurn>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

/// A response from a completion provider.
#[derive(Debug, Clone)]
pub struct CompletionReply {
    /// Provider-assigned response id.
    pub id: String,
    /// First choice's message content.
    pub content: String,
    /// Model that produced the response.
    pub model: String,
    /// Token usage for cost accounting.
    pub usage: TokenUsage,
}

/// Token usage reported by a completion provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

// --- Realtime types ---

/// An event published to a live chat room's subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomEvent {
    pub chat_room_id: String,
    pub content: String,
    pub role: ChatRole,
    pub author: String,
}

// --- Storage entity types ---

/// A domain owner account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
}

/// A tenant's configured chatbot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub welcome_message: String,
    pub icon: Option<String>,
    pub text_color: Option<String>,
    pub background: Option<String>,
    pub helpdesk: bool,
}

/// A titled free-text knowledge-base entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBaseEntry {
    pub id: String,
    pub domain_id: String,
    pub title: String,
    pub content: String,
}

/// A customer identified by email, unique within a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: String,
    pub domain_id: String,
    pub email: String,
}

/// A qualification question instantiated for one customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerResponse {
    pub id: String,
    pub customer_id: String,
    pub question: String,
    pub answered: Option<String>,
}

/// A customer's conversation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRoom {
    pub id: String,
    pub customer_id: String,
    /// True once escalated to a human operator.
    pub live: bool,
    /// True once the owning user has been notified of the escalation.
    /// Never reset to false.
    pub mailed: bool,
}

/// One turn in a chat room's persisted transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub chat_room_id: String,
    pub role: ChatRole,
    pub content: String,
    pub created_at: String,
}

/// A marketing campaign owned by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// Serialized email template body, if one has been saved.
    pub template: Option<String>,
    pub created_at: String,
}

/// The slice of domain configuration the orchestrator reads per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainProfile {
    pub id: String,
    pub name: String,
    /// Questions with no recorded answer, in seeding order.
    pub unanswered_questions: Vec<String>,
    pub knowledge_base: Vec<KnowledgeBaseEntry>,
}

/// A customer joined with their chat room, as resolved per inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRecord {
    pub customer: Customer,
    pub chat_room: ChatRoom,
}
