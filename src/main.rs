//! freshrss-mcp: MCP server and CLI for FreshRSS
//!
//! Dual-mode application:
//! - MCP Server Mode (default): Model Context Protocol server using stdio
//! - CLI Mode: Command-line utility for direct tool execution
//!
//! Both modes load configuration from the environment, build one HTTP
//! session against the Google Reader compatible API, and authenticate
//! exactly once at startup; every tool call reuses that session.

mod cli;
mod config;
mod error;
mod http;
mod mcp;
mod reader;
mod tools;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use config::Config;
use http::HttpTransport;
use reader::client::ReaderClient;
use reader::session::Session;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    // Detect mode: CLI if args present, MCP server otherwise
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        run_cli_mode().await
    } else {
        run_mcp_mode().await
    }
}

/// Build the single shared client and perform the one startup
/// authentication
async fn build_client() -> Result<ReaderClient<HttpTransport>> {
    let config = Config::from_env()?;
    let transport = HttpTransport::new(REQUEST_TIMEOUT);
    let session = Session::new(
        transport,
        config.api_url(),
        config.username.clone(),
        config.password.clone(),
    );
    let client = ReaderClient::new(session);
    client
        .authenticate()
        .await
        .map_err(|e| anyhow!("FreshRSS authentication failed: {}", e))?;
    Ok(client)
}

/// Run in CLI mode
async fn run_cli_mode() -> Result<()> {
    let cli = Cli::parse();

    // Log to stderr to keep stdout clean for the tool output
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let command = match cli.command {
        Some(command) => command,
        None => {
            eprintln!("Error: No command specified. Use --help for usage information.");
            std::process::exit(1);
        }
    };

    let client = build_client().await?;

    let output = match command {
        Commands::Unread(args) => tools::articles::execute_get_unread(args, &client).await,
        Commands::Articles(args) => tools::articles::execute_by_feed(args, &client).await,
        Commands::Search(args) => tools::articles::execute_search(args, &client).await,
        Commands::Feeds => tools::feeds::execute_list_feeds(&client).await,
        Commands::FeedInfo(args) => tools::feeds::execute_feed_info(args, &client).await,
        Commands::FeedStats => tools::feeds::execute_feed_stats(&client).await,
        Commands::MarkRead(args) => tools::marks::execute_mark_as_read(args, &client).await,
        Commands::MarkUnread(args) => tools::marks::execute_mark_as_unread(args, &client).await,
        Commands::Star(args) => tools::marks::execute_star(args, &client).await,
        Commands::Unstar(args) => tools::marks::execute_unstar(args, &client).await,
    };

    client.close();

    if let Some(message) = output.strip_prefix("Error: ") {
        eprintln!("Error: {}", message);
        std::process::exit(exit_code_for(message));
    }

    println!("{}", output);
    Ok(())
}

/// Map an error message to an exit code
fn exit_code_for(message: &str) -> i32 {
    let message = message.to_lowercase();

    if message.contains("invalid") || message.contains("usage") {
        1 // Invalid arguments or usage error
    } else if message.contains("network") || message.contains("connection") {
        2 // Network or API error
    } else if message.contains("not found") {
        3 // Not found error
    } else if message.contains("timeout") {
        4 // Timeout error
    } else {
        5 // Other application errors
    }
}

/// Run in MCP server mode
async fn run_mcp_mode() -> Result<()> {
    // stdout carries the protocol; all logging goes to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting freshrss-mcp server");

    let client = Arc::new(
        build_client()
            .await
            .context("Failed to start freshrss-mcp server")?,
    );

    tokio::select! {
        result = mcp::handle_stdio(client.as_ref()) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, closing session");
            client.close();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for("Invalid arguments: missing feed_id"), 1);
        assert_eq!(exit_code_for("connection lost"), 2);
        assert_eq!(exit_code_for("Feed 9 not found"), 3);
        assert_eq!(exit_code_for("request timeout elapsed"), 4);
        assert_eq!(exit_code_for("something else entirely"), 5);
    }
}
