// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier trait for outbound email side effects.

use async_trait::async_trait;

use crate::error::ParleyError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for outbound email delivery.
#[async_trait]
pub trait Notifier: PluginAdapter {
    /// Notifies a domain owner that a customer has requested live support.
    ///
    /// Sent at most once per chat room, guarded by the storage layer's
    /// `claim_notification` compare-and-set.
    async fn escalation_notice(&self, to: &str) -> Result<(), ParleyError>;

    /// Sends a marketing campaign email to every recipient.
    ///
    /// Returns the number of successful deliveries; individual failures are
    /// logged and skipped so one bad address does not abort the batch.
    async fn campaign_blast(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
    ) -> Result<usize, ParleyError>;
}
