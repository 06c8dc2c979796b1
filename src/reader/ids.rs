//! Identifier normalization
//!
//! FreshRSS (speaking the Google Reader dialect) uses composite string
//! identifiers: `feed/<id-or-url>` for feeds and
//! `tag:google.com,2005:reader/item/<decimal-or-hex>` for articles. Tools
//! take and return plain integers, so both formats are reduced to a single
//! integer domain here.
//!
//! Non-numeric identifiers fall back to a stable hash reduced into a
//! bounded range. That mapping is deterministic within a run but not
//! collision-free; callers must treat derived IDs as lookup keys for the
//! current session, never as durable identifiers.

use sha2::{Digest, Sha256};

const FEED_ID_SPACE: u64 = 1_000_000;
const ARTICLE_ID_SPACE: u64 = 1_000_000_000;

/// Normalize a feed identifier such as `feed/12` or `feed/https://...`
///
/// Returns 0 for an empty identifier; unread-count merging drops those.
pub fn feed_id(raw: &str) -> u64 {
    let rest = raw.strip_prefix("feed/").unwrap_or(raw);
    if rest.is_empty() {
        return 0;
    }
    rest.parse()
        .unwrap_or_else(|_| stable_hash(rest) % FEED_ID_SPACE)
}

/// Normalize an article identifier such as
/// `tag:google.com,2005:reader/item/1234567890`
///
/// The suffix after `reader/item/` may be decimal or hex; FreshRSS has
/// been observed emitting hex suffixes for some item sources.
pub fn article_id(raw: &str) -> u64 {
    if raw.contains("reader/item/") {
        let tail = raw.rsplit('/').next().unwrap_or(raw);
        if let Ok(id) = tail.parse::<u64>() {
            return id;
        }
        if let Ok(id) = u64::from_str_radix(tail, 16) {
            return id;
        }
    }
    stable_hash(raw) % ARTICLE_ID_SPACE
}

/// Render an article id back into its fully-qualified wire form
pub fn item_ref(id: u64) -> String {
    format!("tag:google.com,2005:reader/item/{}", id)
}

fn stable_hash(input: &str) -> u64 {
    let digest = Sha256::digest(input.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}
