// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation session state.

/// State carried across one visitor's conversation.
///
/// Each conversation owns its session; concurrent conversations never share
/// identity. The gateway keeps one per connection, CLI callers one per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSession {
    customer_email: Option<String>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The captured customer email, normalized to lower case.
    pub fn customer_email(&self) -> Option<&str> {
        self.customer_email.as_deref()
    }

    /// Captures an email address; later captures overwrite earlier ones.
    pub fn set_customer_email(&mut self, email: &str) {
        self.customer_email = Some(email.trim().to_lowercase());
    }
}
