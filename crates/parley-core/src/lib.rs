// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Parley chatbot platform.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Parley workspace. All adapters implement
//! traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ParleyError;
pub use types::{AdapterType, BotReply, ChatRole, ChatTurn, HealthStatus};

// Re-export all adapter traits at crate root.
pub use traits::{CompletionProvider, Notifier, PluginAdapter, RealtimePublisher, StorageAdapter};
