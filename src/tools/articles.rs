//! Article tools: get_unread_articles, get_articles_by_feed, search_articles

use serde_json::Value;
use tracing::{error, info};

use crate::cli::{FeedArticlesArgs, SearchArgs, UnreadArgs};
use crate::error::AppError;
use crate::mcp::McpResponse;
use crate::reader::article::Article;
use crate::reader::client::{ArticleQuery, ReaderClient};
use crate::reader::transport::Transport;
use crate::tools::util::{normalize_text, truncate_summary};
use crate::tools::{parse_args, text_response};

pub async fn handle_get_unread<T: Transport>(
    id: Option<Value>,
    args: Value,
    client: &ReaderClient<T>,
) -> McpResponse {
    match parse_args::<UnreadArgs>(args) {
        Ok(args) => text_response(id, execute_get_unread(args, client).await),
        Err(e) => McpResponse::error(id, e.error_code(), &e.to_string()),
    }
}

pub async fn handle_by_feed<T: Transport>(
    id: Option<Value>,
    args: Value,
    client: &ReaderClient<T>,
) -> McpResponse {
    match parse_args::<FeedArticlesArgs>(args) {
        Ok(args) => text_response(id, execute_by_feed(args, client).await),
        Err(e) => McpResponse::error(id, e.error_code(), &e.to_string()),
    }
}

pub async fn handle_search<T: Transport>(
    id: Option<Value>,
    args: Value,
    client: &ReaderClient<T>,
) -> McpResponse {
    match parse_args::<SearchArgs>(args) {
        Ok(args) => text_response(id, execute_search(args, client).await),
        Err(e) => McpResponse::error(id, e.error_code(), &e.to_string()),
    }
}

/// Execute get_unread_articles (shared by MCP and CLI)
pub async fn execute_get_unread<T: Transport>(
    args: UnreadArgs,
    client: &ReaderClient<T>,
) -> String {
    match get_unread(args, client).await {
        Ok(payload) => payload,
        Err(e) => {
            error!("get_unread_articles failed: {}", e);
            format!("Error: {}", e)
        }
    }
}

async fn get_unread<T: Transport>(
    args: UnreadArgs,
    client: &ReaderClient<T>,
) -> Result<String, AppError> {
    let mut articles = match &args.feed_ids {
        Some(feed_ids) if !feed_ids.is_empty() => {
            // One fetch per feed; the merged result is re-sorted by
            // published time, so ordering can differ from a single
            // reading-list fetch of the same items
            let mut merged = Vec::new();
            for feed_id in feed_ids {
                let batch = client
                    .articles(&ArticleQuery {
                        feed_id: Some(*feed_id),
                        limit: args.limit,
                        include_read: false,
                        since: args.since_timestamp,
                    })
                    .await?;
                merged.extend(batch);
            }
            merged.sort_by(|a, b| b.published.cmp(&a.published));
            merged.truncate(args.limit);
            merged
        }
        _ => {
            client
                .articles(&ArticleQuery {
                    feed_id: None,
                    limit: args.limit,
                    include_read: false,
                    since: args.since_timestamp,
                })
                .await?
        }
    };

    for article in &mut articles {
        article.summary = truncate_summary(&article.summary, args.max_summary_length);
    }

    info!("get_unread_articles returning {} articles", articles.len());
    Ok(serde_json::to_string(&articles)?)
}

/// Execute get_articles_by_feed (shared by MCP and CLI)
pub async fn execute_by_feed<T: Transport>(
    args: FeedArticlesArgs,
    client: &ReaderClient<T>,
) -> String {
    let result = client
        .articles(&ArticleQuery {
            feed_id: Some(args.feed_id),
            limit: args.limit,
            include_read: args.include_read,
            since: None,
        })
        .await
        .and_then(|articles| Ok(serde_json::to_string(&articles)?));

    match result {
        Ok(payload) => payload,
        Err(e) => {
            error!("get_articles_by_feed failed: {}", e);
            format!("Error: {}", e)
        }
    }
}

/// Execute search_articles (shared by MCP and CLI)
pub async fn execute_search<T: Transport>(args: SearchArgs, client: &ReaderClient<T>) -> String {
    match search(args, client).await {
        Ok(payload) => payload,
        Err(e) => {
            error!("search_articles failed: {}", e);
            format!("Error: {}", e)
        }
    }
}

/// Client-side search: the upstream API has no server-side search, so this
/// over-fetches `limit * 3` recent items and filters locally. An
/// approximation by design, not an exhaustive search.
async fn search<T: Transport>(
    args: SearchArgs,
    client: &ReaderClient<T>,
) -> Result<String, AppError> {
    let fetch_limit = args.limit.saturating_mul(3);

    let candidates = match &args.feed_ids {
        Some(feed_ids) if !feed_ids.is_empty() => {
            let mut merged = Vec::new();
            for feed_id in feed_ids {
                let batch = client
                    .articles(&ArticleQuery {
                        feed_id: Some(*feed_id),
                        limit: fetch_limit,
                        include_read: true,
                        since: None,
                    })
                    .await?;
                merged.extend(batch);
            }
            merged
        }
        _ => {
            client
                .articles(&ArticleQuery {
                    feed_id: None,
                    limit: fetch_limit,
                    include_read: true,
                    since: None,
                })
                .await?
        }
    };

    let needle = normalize_text(&args.query).to_lowercase();
    let matches: Vec<Article> = candidates
        .into_iter()
        .filter(|a| {
            normalize_text(&a.title).to_lowercase().contains(&needle)
                || normalize_text(&a.summary).to_lowercase().contains(&needle)
        })
        .take(args.limit)
        .collect();

    info!(
        "search_articles matched {} articles for {:?}",
        matches.len(),
        args.query
    );
    Ok(serde_json::to_string(&matches)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::testing::{authenticated_client, MockTransport};
    use serde_json::json;

    fn unread_args(value: Value) -> UnreadArgs {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_by_feed_end_to_end() {
        let transport = MockTransport::new();
        let client = authenticated_client(&transport).await;
        transport.push_ok(
            r#"{"items":[{
                "id":"tag:google.com,2005:reader/item/1234567890",
                "title":"Read article",
                "categories":["user/-/state/com.google/read"]
            }]}"#,
        );

        let args: FeedArticlesArgs =
            serde_json::from_value(json!({"feed_id": 3, "include_read": true})).unwrap();
        let payload = execute_by_feed(args, &client).await;

        let articles: Vec<Value> = serde_json::from_str(&payload).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0]["id"], 1234567890u64);
        assert_eq!(articles[0]["is_read"], true);
        assert_eq!(articles[0]["is_starred"], false);
    }

    #[tokio::test]
    async fn test_transport_error_becomes_error_string() {
        let transport = MockTransport::new();
        let client = authenticated_client(&transport).await;
        transport.push_err(AppError::Network("connection lost".to_string()));

        let args = unread_args(json!({}));
        let result = execute_get_unread(args, &client).await;
        assert_eq!(result, "Error: connection lost");
    }

    #[tokio::test]
    async fn test_unread_fan_out_sorts_and_limits() {
        let transport = MockTransport::new();
        let client = authenticated_client(&transport).await;
        transport.push_ok(
            r#"{"items":[
                {"id":"tag:google.com,2005:reader/item/1","title":"old","published":100},
                {"id":"tag:google.com,2005:reader/item/2","title":"newest","published":300}
            ]}"#,
        );
        transport.push_ok(
            r#"{"items":[
                {"id":"tag:google.com,2005:reader/item/3","title":"middle","published":200}
            ]}"#,
        );

        let args = unread_args(json!({"feed_ids": [10, 11], "limit": 2}));
        let payload = execute_get_unread(args, &client).await;
        let articles: Vec<Value> = serde_json::from_str(&payload).unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0]["title"], "newest");
        assert_eq!(articles[1]["title"], "middle");
        // one auth call plus one fetch per feed
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn test_unread_truncates_summaries() {
        let transport = MockTransport::new();
        let client = authenticated_client(&transport).await;
        transport.push_ok(
            r#"{"items":[{
                "id":"tag:google.com,2005:reader/item/1",
                "summary":{"content":"one two three four five six"}
            }]}"#,
        );

        let args = unread_args(json!({"max_summary_length": 12}));
        let payload = execute_get_unread(args, &client).await;
        let articles: Vec<Value> = serde_json::from_str(&payload).unwrap();
        assert_eq!(articles[0]["summary"], "one two...");
    }

    #[tokio::test]
    async fn test_empty_feed_ids_uses_reading_list() {
        let transport = MockTransport::new();
        let client = authenticated_client(&transport).await;
        transport.push_ok(r#"{"items":[]}"#);

        let args = unread_args(json!({"feed_ids": []}));
        execute_get_unread(args, &client).await;

        let recorded = transport.recorded();
        assert_eq!(recorded.len(), 2);
        assert!(recorded[1].url.contains("reading-list"));
    }

    #[tokio::test]
    async fn test_search_filters_case_insensitively() {
        let transport = MockTransport::new();
        let client = authenticated_client(&transport).await;
        transport.push_ok(
            r#"{"items":[
                {"id":"tag:google.com,2005:reader/item/1","title":"Rust 1.80 released"},
                {"id":"tag:google.com,2005:reader/item/2","title":"Gardening tips",
                 "summary":{"content":"nothing to see"}},
                {"id":"tag:google.com,2005:reader/item/3","title":"Other",
                 "summary":{"content":"all about RUST programming"}}
            ]}"#,
        );

        let args: SearchArgs = serde_json::from_value(json!({"query": "rust"})).unwrap();
        let payload = execute_search(args, &client).await;
        let articles: Vec<Value> = serde_json::from_str(&payload).unwrap();

        assert_eq!(articles.len(), 2);

        // over-fetch: n = limit * 3, read articles included
        let fetch = &transport.recorded()[1];
        assert!(fetch.query.contains(&("n".to_string(), "30".to_string())));
        assert!(!fetch.query.iter().any(|(k, _)| k == "xt"));
    }

    #[tokio::test]
    async fn test_search_respects_limit() {
        let transport = MockTransport::new();
        let client = authenticated_client(&transport).await;
        transport.push_ok(
            r#"{"items":[
                {"id":"tag:google.com,2005:reader/item/1","title":"match a"},
                {"id":"tag:google.com,2005:reader/item/2","title":"match b"},
                {"id":"tag:google.com,2005:reader/item/3","title":"match c"}
            ]}"#,
        );

        let args: SearchArgs =
            serde_json::from_value(json!({"query": "match", "limit": 2})).unwrap();
        let payload = execute_search(args, &client).await;
        let articles: Vec<Value> = serde_json::from_str(&payload).unwrap();
        assert_eq!(articles.len(), 2);
    }
}
