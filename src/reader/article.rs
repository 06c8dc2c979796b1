//! Article and feed models, and the defensive wire-item parser
//!
//! The stream-contents payload has no fixed schema, so parsing is a total
//! function over an untyped JSON tree: every field access has an explicit
//! default and a malformed item degrades to defaults instead of failing
//! the batch it arrived in.

use serde::Serialize;
use serde_json::Value;

use crate::reader::ids;
use crate::reader::{READ_TAG, STARRED_TAG};

/// One article, minimal fields for token efficiency
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub summary: String,
    pub url: String,
    /// Unix seconds, 0 when the item carries no timestamp
    pub published: i64,
    pub feed_name: String,
    pub is_read: bool,
    pub is_starred: bool,
}

/// One subscribed feed
#[derive(Debug, Clone, Serialize)]
pub struct Feed {
    pub id: u64,
    pub name: String,
    pub url: String,
    /// 0 at construction; populated in place from the unread-count lookup
    pub unread_count: u64,
}

/// Parse one raw stream item into an Article, substituting defaults for
/// anything missing or malformed
pub fn parse_article(item: &Value) -> Article {
    let raw_id = item.get("id").and_then(Value::as_str).unwrap_or("");

    let categories = item.get("categories").and_then(Value::as_array);
    let has_tag =
        |tag: &str| categories.is_some_and(|c| c.iter().any(|v| v.as_str() == Some(tag)));

    Article {
        id: ids::article_id(raw_id),
        title: item
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Untitled")
            .to_string(),
        summary: item
            .pointer("/summary/content")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        url: item
            .pointer("/alternate/0/href")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        published: item.get("published").and_then(Value::as_i64).unwrap_or(0),
        feed_name: item
            .pointer("/origin/title")
            .and_then(Value::as_str)
            .unwrap_or("Unknown Feed")
            .to_string(),
        is_read: has_tag(READ_TAG),
        is_starred: has_tag(STARRED_TAG),
    }
}
