//! CLI mode implementation
//!
//! The argument structs double as the MCP tool input schemas: clap derives
//! the command line, schemars derives the JSON schema advertised over MCP,
//! and serde deserializes tool-call arguments into the same types.

use clap::{Parser, Subcommand};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// FreshRSS MCP CLI
#[derive(Parser)]
#[command(name = "freshrss-mcp")]
#[command(about = "FreshRSS feed and article utility", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch unread articles, optionally restricted to specific feeds
    Unread(UnreadArgs),
    /// Fetch articles from one feed
    Articles(FeedArticlesArgs),
    /// Search articles by keyword in title or summary
    Search(SearchArgs),
    /// List subscribed feeds with unread counts
    Feeds,
    /// Show one feed with its unread count
    FeedInfo(FeedInfoArgs),
    /// Per-feed unread statistics
    FeedStats,
    /// Mark articles as read
    MarkRead(MarkArgs),
    /// Mark articles as unread
    MarkUnread(MarkArgs),
    /// Star an article
    Star(StarArgs),
    /// Remove the star from an article
    Unstar(StarArgs),
}

fn default_article_limit() -> usize {
    20
}

fn default_search_limit() -> usize {
    10
}

fn default_summary_length() -> usize {
    500
}

/// get_unread_articles tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct UnreadArgs {
    /// Maximum number of articles to return
    #[arg(short = 'l', long, default_value_t = 20)]
    #[serde(default = "default_article_limit")]
    #[schemars(description = "Maximum number of articles to return (default 20)")]
    pub limit: usize,

    /// Restrict to these feed IDs (comma separated on the command line)
    #[arg(long, value_delimiter = ',')]
    #[serde(default)]
    #[schemars(description = "Optional list of feed IDs to filter by")]
    pub feed_ids: Option<Vec<u64>>,

    /// Only articles published after this Unix timestamp
    #[arg(long)]
    #[serde(default)]
    #[schemars(description = "Only return articles published after this Unix timestamp")]
    pub since_timestamp: Option<i64>,

    /// Maximum characters per article summary
    #[arg(long, default_value_t = 500)]
    #[serde(default = "default_summary_length")]
    #[schemars(description = "Maximum characters for article summaries (default 500)")]
    pub max_summary_length: usize,
}

/// get_articles_by_feed tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct FeedArticlesArgs {
    /// Feed ID to fetch articles from
    #[arg(short = 'f', long)]
    #[schemars(description = "ID of the feed to fetch articles from")]
    pub feed_id: u64,

    /// Maximum number of articles to return
    #[arg(short = 'l', long, default_value_t = 20)]
    #[serde(default = "default_article_limit")]
    #[schemars(description = "Maximum number of articles to return (default 20)")]
    pub limit: usize,

    /// Include already-read articles
    #[arg(long)]
    #[serde(default)]
    #[schemars(description = "Whether to include already-read articles (default false)")]
    pub include_read: bool,
}

/// search_articles tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct SearchArgs {
    /// Search terms (case-insensitive)
    #[arg(short = 'q', long)]
    #[schemars(description = "Search query matched against title and summary, case-insensitive")]
    pub query: String,

    /// Maximum number of matching articles to return
    #[arg(short = 'l', long, default_value_t = 10)]
    #[serde(default = "default_search_limit")]
    #[schemars(description = "Maximum number of matching articles to return (default 10)")]
    pub limit: usize,

    /// Restrict the search to these feed IDs
    #[arg(long, value_delimiter = ',')]
    #[serde(default)]
    #[schemars(description = "Optional list of feed IDs to search within")]
    pub feed_ids: Option<Vec<u64>>,
}

/// get_feed_info tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct FeedInfoArgs {
    /// Feed ID
    #[arg(short = 'f', long)]
    #[schemars(description = "ID of the feed")]
    pub feed_id: u64,
}

/// mark_as_read / mark_as_unread tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct MarkArgs {
    /// Article IDs (comma separated on the command line)
    #[arg(long, value_delimiter = ',')]
    #[serde(default)]
    #[schemars(description = "List of article IDs")]
    pub article_ids: Vec<u64>,
}

/// star_article / unstar_article tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct StarArgs {
    /// Article ID
    #[arg(short = 'a', long)]
    #[schemars(description = "ID of the article")]
    pub article_id: u64,
}
