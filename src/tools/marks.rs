//! State mutation tools: mark_as_read, mark_as_unread, star_article,
//! unstar_article
//!
//! Success is the literal string "OK". An empty id list short-circuits
//! without touching the network.

use serde_json::Value;
use tracing::error;

use crate::cli::{MarkArgs, StarArgs};
use crate::error::AppError;
use crate::mcp::McpResponse;
use crate::reader::client::ReaderClient;
use crate::reader::transport::Transport;
use crate::tools::{parse_args, text_response};

pub async fn handle_mark_as_read<T: Transport>(
    id: Option<Value>,
    args: Value,
    client: &ReaderClient<T>,
) -> McpResponse {
    match parse_args::<MarkArgs>(args) {
        Ok(args) => text_response(id, execute_mark_as_read(args, client).await),
        Err(e) => McpResponse::error(id, e.error_code(), &e.to_string()),
    }
}

pub async fn handle_mark_as_unread<T: Transport>(
    id: Option<Value>,
    args: Value,
    client: &ReaderClient<T>,
) -> McpResponse {
    match parse_args::<MarkArgs>(args) {
        Ok(args) => text_response(id, execute_mark_as_unread(args, client).await),
        Err(e) => McpResponse::error(id, e.error_code(), &e.to_string()),
    }
}

pub async fn handle_star<T: Transport>(
    id: Option<Value>,
    args: Value,
    client: &ReaderClient<T>,
) -> McpResponse {
    match parse_args::<StarArgs>(args) {
        Ok(args) => text_response(id, execute_star(args, client).await),
        Err(e) => McpResponse::error(id, e.error_code(), &e.to_string()),
    }
}

pub async fn handle_unstar<T: Transport>(
    id: Option<Value>,
    args: Value,
    client: &ReaderClient<T>,
) -> McpResponse {
    match parse_args::<StarArgs>(args) {
        Ok(args) => text_response(id, execute_unstar(args, client).await),
        Err(e) => McpResponse::error(id, e.error_code(), &e.to_string()),
    }
}

/// Execute mark_as_read (shared by MCP and CLI)
pub async fn execute_mark_as_read<T: Transport>(
    args: MarkArgs,
    client: &ReaderClient<T>,
) -> String {
    if args.article_ids.is_empty() {
        return "OK".to_string();
    }
    ok_or_error("mark_as_read", client.mark_as_read(&args.article_ids).await)
}

/// Execute mark_as_unread (shared by MCP and CLI)
pub async fn execute_mark_as_unread<T: Transport>(
    args: MarkArgs,
    client: &ReaderClient<T>,
) -> String {
    if args.article_ids.is_empty() {
        return "OK".to_string();
    }
    ok_or_error(
        "mark_as_unread",
        client.mark_as_unread(&args.article_ids).await,
    )
}

/// Execute star_article (shared by MCP and CLI)
pub async fn execute_star<T: Transport>(args: StarArgs, client: &ReaderClient<T>) -> String {
    ok_or_error("star_article", client.star_article(args.article_id).await)
}

/// Execute unstar_article (shared by MCP and CLI)
pub async fn execute_unstar<T: Transport>(args: StarArgs, client: &ReaderClient<T>) -> String {
    ok_or_error(
        "unstar_article",
        client.unstar_article(args.article_id).await,
    )
}

fn ok_or_error(tool: &str, result: Result<(), AppError>) -> String {
    match result {
        Ok(()) => "OK".to_string(),
        Err(e) => {
            error!("{} failed: {}", tool, e);
            format!("Error: {}", e)
        }
    }
}
