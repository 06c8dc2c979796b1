//! Feed client: the Google Reader operation set
//!
//! Built on the authenticated session. Transport and authentication
//! failures propagate unmodified; the tool layer owns the user-visible
//! error contract. No retries happen here.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::AppError;
use crate::reader::article::{parse_article, Article, Feed};
use crate::reader::session::Session;
use crate::reader::transport::Transport;
use crate::reader::{ids, READING_LIST_STREAM, READ_TAG, STARRED_TAG};

/// Parameters for a stream-contents fetch
#[derive(Debug, Clone)]
pub struct ArticleQuery {
    /// One feed, or `None` for the reading-list aggregate
    pub feed_id: Option<u64>,
    pub limit: usize,
    pub include_read: bool,
    /// Lower bound on published time, Unix seconds
    pub since: Option<i64>,
}

pub struct ReaderClient<T: Transport> {
    session: Session<T>,
}

impl<T: Transport> ReaderClient<T> {
    pub fn new(session: Session<T>) -> Self {
        Self { session }
    }

    pub async fn authenticate(&self) -> Result<(), AppError> {
        self.session.authenticate().await
    }

    pub fn close(&self) {
        self.session.close();
    }

    /// List subscribed feeds, in source order
    pub async fn list_feeds(&self) -> Result<Vec<Feed>, AppError> {
        let body = self
            .session
            .get("/reader/api/0/subscription/list", &json_output())
            .await?;
        let data: Value = serde_json::from_str(&body)?;

        let feeds: Vec<Feed> = data
            .get("subscriptions")
            .and_then(Value::as_array)
            .map(|subs| {
                subs.iter()
                    .map(|sub| Feed {
                        id: ids::feed_id(sub.get("id").and_then(Value::as_str).unwrap_or("")),
                        name: sub
                            .get("title")
                            .and_then(Value::as_str)
                            .unwrap_or("Unknown")
                            .to_string(),
                        url: sub
                            .get("url")
                            .and_then(Value::as_str)
                            .unwrap_or("")
                            .to_string(),
                        unread_count: 0,
                    })
                    .collect()
            })
            .unwrap_or_default();

        info!("Retrieved {} feeds", feeds.len());
        Ok(feeds)
    }

    /// Unread article counts keyed by normalized feed id
    ///
    /// Entries whose identifier normalizes to 0 carry no usable key and
    /// are dropped.
    pub async fn unread_counts(&self) -> Result<HashMap<u64, u64>, AppError> {
        let body = self
            .session
            .get("/reader/api/0/unread-count", &json_output())
            .await?;
        let data: Value = serde_json::from_str(&body)?;

        let mut counts = HashMap::new();
        if let Some(entries) = data.get("unreadcounts").and_then(Value::as_array) {
            for entry in entries {
                let feed_id =
                    ids::feed_id(entry.get("id").and_then(Value::as_str).unwrap_or(""));
                if feed_id == 0 {
                    continue;
                }
                let count = entry.get("count").and_then(Value::as_u64).unwrap_or(0);
                counts.insert(feed_id, count);
            }
        }
        Ok(counts)
    }

    /// Fetch articles from one feed or the reading-list aggregate
    pub async fn articles(&self, query: &ArticleQuery) -> Result<Vec<Article>, AppError> {
        let stream = match query.feed_id {
            Some(id) => format!("feed/{}", id),
            None => READING_LIST_STREAM.to_string(),
        };
        let path = format!(
            "/reader/api/0/stream/contents/{}",
            urlencoding::encode(&stream)
        );

        let mut params = vec![
            ("output".to_string(), "json".to_string()),
            ("n".to_string(), query.limit.to_string()),
        ];
        if !query.include_read {
            params.push(("xt".to_string(), READ_TAG.to_string()));
        }
        if let Some(since) = query.since {
            params.push(("ot".to_string(), since.to_string()));
        }

        let body = self.session.get(&path, &params).await?;
        let data: Value = serde_json::from_str(&body)?;

        let articles: Vec<Article> = data
            .get("items")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(parse_article).collect())
            .unwrap_or_default();

        info!("Retrieved {} articles from {}", articles.len(), stream);
        Ok(articles)
    }

    pub async fn mark_as_read(&self, article_ids: &[u64]) -> Result<(), AppError> {
        self.edit_tags(article_ids, &[READ_TAG], &[]).await
    }

    pub async fn mark_as_unread(&self, article_ids: &[u64]) -> Result<(), AppError> {
        self.edit_tags(article_ids, &[], &[READ_TAG]).await
    }

    pub async fn star_article(&self, article_id: u64) -> Result<(), AppError> {
        self.edit_tags(&[article_id], &[STARRED_TAG], &[]).await
    }

    pub async fn unstar_article(&self, article_id: u64) -> Result<(), AppError> {
        self.edit_tags(&[article_id], &[], &[STARRED_TAG]).await
    }

    /// The one tag-edit primitive behind all state mutations. All-or-nothing
    /// per call; the upstream API reports no per-item status.
    async fn edit_tags(
        &self,
        article_ids: &[u64],
        add: &[&str],
        remove: &[&str],
    ) -> Result<(), AppError> {
        let mut form: Vec<(String, String)> = article_ids
            .iter()
            .map(|id| ("i".to_string(), ids::item_ref(*id)))
            .collect();
        for tag in add {
            form.push(("a".to_string(), tag.to_string()));
        }
        for tag in remove {
            form.push(("r".to_string(), tag.to_string()));
        }

        debug!("Editing tags on {} articles", article_ids.len());
        self.session
            .post_form("/reader/api/0/edit-tag", &form)
            .await?;
        info!("Updated tags for {} articles", article_ids.len());
        Ok(())
    }
}

fn json_output() -> [(String, String); 1] {
    [("output".to_string(), "json".to_string())]
}
