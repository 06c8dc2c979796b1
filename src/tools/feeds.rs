//! Feed tools: list_feeds, get_feed_info, get_feed_stats
//!
//! The subscription listing carries no counts, so each of these performs
//! two upstream calls and merges the unread counts by feed id.

use serde_json::{json, Value};
use tracing::{error, info};

use crate::cli::FeedInfoArgs;
use crate::error::AppError;
use crate::mcp::McpResponse;
use crate::reader::client::ReaderClient;
use crate::reader::transport::Transport;
use crate::tools::{parse_args, text_response};

pub async fn handle_list_feeds<T: Transport>(
    id: Option<Value>,
    _args: Value,
    client: &ReaderClient<T>,
) -> McpResponse {
    text_response(id, execute_list_feeds(client).await)
}

pub async fn handle_feed_info<T: Transport>(
    id: Option<Value>,
    args: Value,
    client: &ReaderClient<T>,
) -> McpResponse {
    match parse_args::<FeedInfoArgs>(args) {
        Ok(args) => text_response(id, execute_feed_info(args, client).await),
        Err(e) => McpResponse::error(id, e.error_code(), &e.to_string()),
    }
}

pub async fn handle_feed_stats<T: Transport>(
    id: Option<Value>,
    _args: Value,
    client: &ReaderClient<T>,
) -> McpResponse {
    text_response(id, execute_feed_stats(client).await)
}

/// Execute list_feeds (shared by MCP and CLI)
pub async fn execute_list_feeds<T: Transport>(client: &ReaderClient<T>) -> String {
    match list_feeds(client).await {
        Ok(payload) => payload,
        Err(e) => {
            error!("list_feeds failed: {}", e);
            format!("Error: {}", e)
        }
    }
}

async fn list_feeds<T: Transport>(client: &ReaderClient<T>) -> Result<String, AppError> {
    let mut feeds = client.list_feeds().await?;
    let counts = client.unread_counts().await?;
    for feed in &mut feeds {
        feed.unread_count = counts.get(&feed.id).copied().unwrap_or(0);
    }
    info!("list_feeds returning {} feeds", feeds.len());
    Ok(serde_json::to_string(&feeds)?)
}

/// Execute get_feed_info (shared by MCP and CLI)
pub async fn execute_feed_info<T: Transport>(
    args: FeedInfoArgs,
    client: &ReaderClient<T>,
) -> String {
    match feed_info(args.feed_id, client).await {
        Ok(payload) => payload,
        Err(e) => {
            error!("get_feed_info failed: {}", e);
            format!("Error: {}", e)
        }
    }
}

async fn feed_info<T: Transport>(
    feed_id: u64,
    client: &ReaderClient<T>,
) -> Result<String, AppError> {
    let feeds = client.list_feeds().await?;
    let counts = client.unread_counts().await?;
    let mut feed = feeds
        .into_iter()
        .find(|f| f.id == feed_id)
        .ok_or_else(|| AppError::NotFound(format!("Feed {} not found", feed_id)))?;
    feed.unread_count = counts.get(&feed.id).copied().unwrap_or(0);
    Ok(serde_json::to_string(&feed)?)
}

/// Execute get_feed_stats (shared by MCP and CLI)
pub async fn execute_feed_stats<T: Transport>(client: &ReaderClient<T>) -> String {
    match feed_stats(client).await {
        Ok(payload) => payload,
        Err(e) => {
            error!("get_feed_stats failed: {}", e);
            format!("Error: {}", e)
        }
    }
}

async fn feed_stats<T: Transport>(client: &ReaderClient<T>) -> Result<String, AppError> {
    let feeds = client.list_feeds().await?;
    let counts = client.unread_counts().await?;
    let stats: Vec<Value> = feeds
        .iter()
        .map(|feed| {
            json!({
                "feed_id": feed.id,
                "feed_name": feed.name,
                "unread_count": counts.get(&feed.id).copied().unwrap_or(0),
            })
        })
        .collect();
    Ok(serde_json::to_string(&stats)?)
}
