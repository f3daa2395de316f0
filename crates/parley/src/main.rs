// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parley - a multi-tenant chatbot assistant platform.
//!
//! This is the binary entry point for the Parley server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use clap::{Parser, Subcommand};

/// Parley - a multi-tenant chatbot assistant platform.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Parley gateway server.
    Serve,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match parley_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            parley_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("parley serve: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            // Secrets stay out of terminal output.
            let mut config = config;
            config.openai.api_key = config.openai.api_key.map(|_| "[redacted]".to_string());
            config.mailer.smtp_password =
                config.mailer.smtp_password.map(|_| "[redacted]".to_string());
            config.gateway.bearer_token =
                config.gateway.bearer_token.map(|_| "[redacted]".to_string());
            match toml::to_string_pretty(&config) {
                Ok(rendered) => print!("{rendered}"),
                Err(e) => {
                    eprintln!("parley config: failed to render: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("parley: use --help for available commands");
        }
    }
}
