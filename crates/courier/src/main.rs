// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Courier - multi-tenant messaging integration gateway.
//!
//! Binary entry point: configuration loading, tracing, and subcommand dispatch.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use courier_config::model::CourierConfig;

/// Courier - multi-tenant messaging integration gateway.
#[derive(Parser, Debug)]
#[command(name = "courier", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the webhook gateway, outbound API, and token rotation scheduler.
    Serve,
    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Report access token health for stored integrations.
    Tokens {
        /// Only report integrations owned by this tenant.
        #[arg(long)]
        tenant_id: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Load and validate configuration, then exit.
    Validate,
    /// Print the effective configuration with secrets masked.
    Print,
}

fn load_config(path: Option<&std::path::Path>) -> CourierConfig {
    let loaded = match path {
        Some(path) => courier_config::load_and_validate_path(path),
        None => courier_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            courier_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Config {
            action: ConfigAction::Validate,
        }) => {
            println!("courier: configuration is valid");
            Ok(())
        }
        Some(Commands::Config {
            action: ConfigAction::Print,
        }) => commands::render_config(&config).map(|rendered| print!("{rendered}")),
        Some(Commands::Tokens { tenant_id }) => {
            commands::print_token_report(&config, tenant_id.as_deref()).await
        }
        None => {
            println!("courier: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("courier: {e}");
        std::process::exit(1);
    }
}
