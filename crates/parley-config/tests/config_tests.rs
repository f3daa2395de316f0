// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Parley configuration system.

use parley_config::diagnostic::suggest_key;
use parley_config::model::ParleyConfig;
use parley_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_parley_config() {
    let toml = r#"
[agent]
name = "acme-bot"
log_level = "debug"

[openai]
api_key = "sk-123"
model = "gpt-4o"
max_tokens = 512

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[mailer]
enabled = true
smtp_host = "smtp.example.test"
smtp_port = 465
smtp_username = "mailer"
smtp_password = "secret"
from_address = "bot@example.test"

[portal]
base_url = "https://app.example.test"

[gateway]
host = "0.0.0.0"
port = 9090
bearer_token = "token-123"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "acme-bot");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-123"));
    assert_eq!(config.openai.model, "gpt-4o");
    assert_eq!(config.openai.max_tokens, 512);
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert!(config.mailer.enabled);
    assert_eq!(config.mailer.smtp_host, "smtp.example.test");
    assert_eq!(config.mailer.smtp_port, 465);
    assert_eq!(config.portal.base_url, "https://app.example.test");
    assert_eq!(config.gateway.host, "0.0.0.0");
    assert_eq!(config.gateway.port, 9090);
    assert_eq!(config.gateway.bearer_token.as_deref(), Some("token-123"));
}

/// Unknown field in [agent] section produces an error.
#[test]
fn unknown_field_in_agent_produces_error() {
    let toml = r#"
[agent]
naem = "test"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    // Figment wraps serde's deny_unknown_fields error
    assert!(
        err_str.contains("unknown field") || err_str.contains("naem"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown field in [mailer] section produces an error.
#[test]
fn unknown_field_in_mailer_produces_error() {
    let toml = r#"
[mailer]
smtp_hots = "smtp.example.test"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("smtp_hots"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let toml = "";
    let config = load_config_from_str(toml).expect("empty TOML should use defaults");

    assert_eq!(config.agent.name, "parley");
    assert_eq!(config.agent.log_level, "info");
    assert!(config.openai.api_key.is_none());
    assert_eq!(config.openai.model, "gpt-4o-mini");
    assert_eq!(config.openai.max_tokens, 1024);
    assert_eq!(config.openai.api_base, "https://api.openai.com/v1");
    assert!(config.storage.database_path.ends_with("parley.db"));
    assert!(config.storage.wal_mode);
    assert!(!config.mailer.enabled);
    assert_eq!(config.portal.base_url, "http://localhost:3000");
    assert_eq!(config.gateway.host, "127.0.0.1");
    assert_eq!(config.gateway.port, 8080);
    assert!(config.gateway.bearer_token.is_none());
}

/// Env-style override via dot notation maps onto nested fields.
#[test]
fn override_maps_to_nested_field() {
    use figment::{Figment, providers::Serialized};

    let config: ParleyConfig = Figment::new()
        .merge(Serialized::defaults(ParleyConfig::default()))
        .merge(("openai.api_key", "sk-from-env"))
        .merge(("mailer.smtp_host", "relay.example.test"))
        .extract()
        .expect("should merge overrides");

    assert_eq!(config.openai.api_key.as_deref(), Some("sk-from-env"));
    // smtp_host must stay one key, never smtp.host
    assert_eq!(config.mailer.smtp_host, "relay.example.test");
}

/// Validation catches semantic errors that deserialize fine.
#[test]
fn validation_rejects_trailing_slash_base_url() {
    let toml = r#"
[portal]
base_url = "https://app.example.test/"
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(!errors.is_empty());
}

/// The typo suggester proposes the nearest valid key.
#[test]
fn typo_suggestions_cover_section_keys() {
    assert_eq!(
        suggest_key("api_kye", &["api_key", "model", "max_tokens", "api_base"]),
        Some("api_key".to_string())
    );
    assert_eq!(
        suggest_key("base_ulr", &["base_url"]),
        Some("base_url".to_string())
    );
}
