// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The assistant orchestrator for the Parley chatbot platform.
//!
//! Per inbound message, [`BotEngine::respond`] decides between gatekeeping
//! for an email, welcoming a new customer, relaying a live room to human
//! operators, or one qualification completion call whose reply is scanned
//! for control tokens and links.

pub mod conversation;
pub mod engine;
pub mod extract;
pub mod prompt;
pub mod session;

pub use conversation::ConversationLog;
pub use engine::{BotEngine, EngineSettings};
pub use session::ChatSession;
