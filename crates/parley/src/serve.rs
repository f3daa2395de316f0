// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parley serve` command implementation.
//!
//! Wires the SQLite storage, OpenAI provider, SMTP notifier, realtime hub,
//! and orchestrator together, then runs the gateway until interrupted.

use std::sync::Arc;

use tracing::info;

use parley_bot::{BotEngine, EngineSettings};
use parley_config::ParleyConfig;
use parley_core::error::ParleyError;
use parley_core::{PluginAdapter, StorageAdapter};
use parley_gateway::{AuthConfig, GatewayState, ServerConfig, SessionStore};
use parley_mailer::SmtpMailer;
use parley_openai::OpenAiProvider;
use parley_realtime::RealtimeHub;
use parley_storage::SqliteStorage;

/// Runs the `parley serve` command.
///
/// Initializes all adapters and serves the gateway. Supports graceful
/// shutdown on ctrl-c.
pub async fn run_serve(config: ParleyConfig) -> Result<(), ParleyError> {
    init_tracing(&config.agent.log_level);

    info!("starting parley serve");

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage ready");

    let provider = Arc::new(OpenAiProvider::new(&config)?);
    let notifier = Arc::new(SmtpMailer::new(config.mailer.clone())?);
    let hub = Arc::new(RealtimeHub::new());

    let engine = Arc::new(BotEngine::new(
        storage.clone() as Arc<dyn StorageAdapter>,
        provider,
        notifier.clone(),
        hub.clone(),
        EngineSettings {
            model: config.openai.model.clone(),
            max_tokens: config.openai.max_tokens,
            portal_base_url: config.portal.base_url.clone(),
        },
    ));

    let state = GatewayState {
        engine,
        storage: storage.clone(),
        hub,
        notifier: notifier.clone(),
        sessions: Arc::new(SessionStore::new()),
        auth: AuthConfig {
            bearer_token: config.gateway.bearer_token.clone(),
        },
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
        bearer_token: config.gateway.bearer_token.clone(),
    };

    tokio::select! {
        result = parley_gateway::start_server(&server_config, state) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    notifier.shutdown().await?;
    storage.shutdown().await?;
    info!("parley stopped");
    Ok(())
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("parley={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
