// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Parley integration tests.
//!
//! Provides mock adapters and a storage fixture for fast, deterministic,
//! CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock completion provider with pre-configured responses
//! - [`MockNotifier`] - Notifier that records sends instead of emailing
//! - [`StorageFixture`] - Migrated temp SQLite database with a seeded tenant

pub mod harness;
pub mod mock_notifier;
pub mod mock_provider;

pub use harness::StorageFixture;
pub use mock_notifier::{MockNotifier, SentMail};
pub use mock_provider::MockProvider;
