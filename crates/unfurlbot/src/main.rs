// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unfurlbot - a Slack bot that unfurls issue-tracker identifiers.
//!
//! This is the binary entry point for the unfurl service.

use clap::{Parser, Subcommand};

mod ingest;
mod serve;
mod shutdown;

/// Unfurlbot - a Slack bot that unfurls issue-tracker identifiers.
#[derive(Parser, Debug)]
#[command(name = "unfurlbot", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the unfurl service.
    Serve,
    /// Load and validate configuration, then exit.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match unfurlbot_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            unfurlbot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("unfurlbot: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::CheckConfig) => {
            println!(
                "unfurlbot: config ok (app.name={}, jira.projects={})",
                config.app.name,
                config.jira.projects.join(",")
            );
        }
        None => {
            println!("unfurlbot: use --help for available commands");
        }
    }
}
