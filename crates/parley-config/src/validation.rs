// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty paths, well-formed addresses, and sane
//! token budgets.

use crate::diagnostic::ConfigError;
use crate::model::ParleyConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ParleyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate database_path is not empty
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Validate gateway host looks like a valid IP or hostname
    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    // Validate max_tokens is non-zero
    if config.openai.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "openai.max_tokens must be greater than zero".to_string(),
        });
    }

    // Validate api_base has a scheme
    if !config.openai.api_base.starts_with("http://")
        && !config.openai.api_base.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "openai.api_base `{}` must start with http:// or https://",
                config.openai.api_base
            ),
        });
    }

    // Validate portal base_url has a scheme and no trailing slash
    if !config.portal.base_url.starts_with("http://")
        && !config.portal.base_url.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "portal.base_url `{}` must start with http:// or https://",
                config.portal.base_url
            ),
        });
    }
    if config.portal.base_url.ends_with('/') {
        errors.push(ConfigError::Validation {
            message: "portal.base_url must not end with a trailing slash".to_string(),
        });
    }

    // An enabled mailer needs a from address and relay host
    if config.mailer.enabled {
        if config.mailer.from_address.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "mailer.from_address must not be empty when mailer.enabled".to_string(),
            });
        }
        if config.mailer.smtp_host.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "mailer.smtp_host must not be empty when mailer.enabled".to_string(),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
