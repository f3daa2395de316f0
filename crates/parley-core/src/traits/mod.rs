// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Parley platform.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod mailer;
pub mod provider;
pub mod realtime;
pub mod storage;

// Re-export all traits at the traits module level for convenience.
pub use adapter::PluginAdapter;
pub use mailer::Notifier;
pub use provider::CompletionProvider;
pub use realtime::RealtimePublisher;
pub use storage::StorageAdapter;
