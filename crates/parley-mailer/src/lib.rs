// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP notification adapter for the Parley platform.
//!
//! Implements [`Notifier`] over lettre's async SMTP transport. When the
//! mailer is disabled by configuration, sends are logged and dropped so the
//! rest of the platform behaves identically in development.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, warn};

use parley_config::model::MailerConfig;
use parley_core::{AdapterType, HealthStatus, Notifier, ParleyError, PluginAdapter};

const ESCALATION_SUBJECT: &str = "Realtime Support";
const ESCALATION_BODY: &str = "One of your customers just switched to realtime mode";

/// SMTP-backed notifier.
pub struct SmtpMailer {
    config: MailerConfig,
    /// `None` when the mailer is disabled.
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpMailer {
    /// Builds the transport from configuration. A disabled mailer still
    /// constructs successfully and drops all sends.
    pub fn new(config: MailerConfig) -> Result<Self, ParleyError> {
        let transport = if config.enabled {
            let mut builder =
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                    .map_err(|e| ParleyError::Mailer {
                        message: format!("invalid SMTP relay {}: {e}", config.smtp_host),
                        source: Some(Box::new(e)),
                    })?
                    .port(config.smtp_port);
            if let (Some(user), Some(pass)) = (&config.smtp_username, &config.smtp_password) {
                builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
            }
            Some(builder.build())
        } else {
            None
        };
        Ok(Self { config, transport })
    }

    fn from_mailbox(&self) -> Result<Mailbox, ParleyError> {
        self.config
            .from_address
            .parse()
            .map_err(|e| ParleyError::Mailer {
                message: format!("invalid from address {}: {e}", self.config.from_address),
                source: None,
            })
    }

    async fn send_one(&self, to: &str, subject: &str, body: &str) -> Result<(), ParleyError> {
        let Some(transport) = &self.transport else {
            info!(to, subject, "mailer disabled, dropping email");
            return Ok(());
        };

        let to_mailbox: Mailbox = to.parse().map_err(|_| ParleyError::Mailer {
            message: format!("invalid recipient address: {to}"),
            source: None,
        })?;
        let message = Message::builder()
            .from(self.from_mailbox()?)
            .to(to_mailbox)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| ParleyError::Mailer {
                message: format!("failed to build email: {e}"),
                source: Some(Box::new(e)),
            })?;

        transport
            .send(message)
            .await
            .map_err(|e| ParleyError::Mailer {
                message: format!("SMTP send failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        debug!(to, subject, "email sent");
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SmtpMailer {
    fn name(&self) -> &str {
        "smtp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Mailer
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        match &self.transport {
            None => Ok(HealthStatus::Degraded("mailer disabled".into())),
            Some(transport) => {
                if transport.test_connection().await.unwrap_or(false) {
                    Ok(HealthStatus::Healthy)
                } else {
                    Ok(HealthStatus::Unhealthy(format!(
                        "SMTP relay {} unreachable",
                        self.config.smtp_host
                    )))
                }
            }
        }
    }

    async fn shutdown(&self) -> Result<(), ParleyError> {
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpMailer {
    async fn escalation_notice(&self, to: &str) -> Result<(), ParleyError> {
        self.send_one(to, ESCALATION_SUBJECT, ESCALATION_BODY).await
    }

    async fn campaign_blast(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
    ) -> Result<usize, ParleyError> {
        let mut delivered = 0;
        for to in recipients {
            match self.send_one(to, subject, body).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!(to, error = %e, "campaign send failed, skipping recipient"),
            }
        }
        Ok(delivered)
    }
}
