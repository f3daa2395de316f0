// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Parley chatbot platform.

use thiserror::Error;

/// The primary error type used across all Parley adapter traits and core operations.
///
/// Callers can distinguish lookup misses (`NotFound`), transient provider
/// outages (`Provider { transient: true }`), and everything else, instead of
/// receiving a single opaque "no result".
#[derive(Debug, Error)]
pub enum ParleyError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Completion provider errors (API failure, malformed response, rate limiting).
    ///
    /// `transient` is true for errors worth retrying (429/5xx); callers may
    /// surface these as "assistant temporarily unavailable".
    #[error("provider error: {message}")]
    Provider {
        message: String,
        transient: bool,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Mail delivery errors (SMTP connection, envelope construction).
    #[error("mailer error: {message}")]
    Mailer {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Realtime channel errors (room publish, subscriber delivery).
    #[error("realtime error: {0}")]
    Realtime(String),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ParleyError {
    /// True when the error is a transient provider failure worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, ParleyError::Provider { transient: true, .. })
    }

    /// True when the error is a lookup miss rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ParleyError::NotFound { .. })
    }
}
