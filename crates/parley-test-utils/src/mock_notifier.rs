// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock notifier that records outbound email instead of sending it.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use parley_core::traits::{Notifier, PluginAdapter};
use parley_core::types::{AdapterType, HealthStatus};
use parley_core::ParleyError;

/// One recorded send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
}

/// Records every send for later assertion. Never fails.
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<SentMail>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All recorded sends, in order.
    pub async fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().await.clone()
    }

    /// Recipients of escalation notices, in order.
    pub async fn escalation_recipients(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.subject == "Realtime Support")
            .map(|m| m.to.clone())
            .collect()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockNotifier {
    fn name(&self) -> &str {
        "mock-notifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Mailer
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ParleyError> {
        Ok(())
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn escalation_notice(&self, to: &str) -> Result<(), ParleyError> {
        self.sent.lock().await.push(SentMail {
            to: to.to_string(),
            subject: "Realtime Support".to_string(),
        });
        Ok(())
    }

    async fn campaign_blast(
        &self,
        recipients: &[String],
        subject: &str,
        _body: &str,
    ) -> Result<usize, ParleyError> {
        let mut sent = self.sent.lock().await;
        for to in recipients {
            sent.push(SentMail {
                to: to.clone(),
                subject: subject.to_string(),
            });
        }
        Ok(recipients.len())
    }
}
