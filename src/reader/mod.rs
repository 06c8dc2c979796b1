//! Google Reader protocol core
//!
//! Everything that speaks FreshRSS's Google Reader compatible API lives
//! here: identifier normalization, defensive item parsing, the
//! authenticated session, and the feed client operations built on top.

pub mod article;
pub mod client;
pub mod ids;
pub mod session;
pub mod transport;

#[cfg(test)]
pub mod testing;

/// Sentinel category marking an item as read
pub const READ_TAG: &str = "user/-/state/com.google/read";
/// Sentinel category marking an item as starred
pub const STARRED_TAG: &str = "user/-/state/com.google/starred";
/// The aggregate stream containing items from all subscribed feeds
pub const READING_LIST_STREAM: &str = "user/-/state/com.google/reading-list";
