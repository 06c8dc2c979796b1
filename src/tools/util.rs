//! Shaping helpers shared across tools

use unicode_normalization::UnicodeNormalization;

/// Truncate a summary at a word boundary, appending an ellipsis marker
///
/// Counts characters, not bytes. When the text has no space within the
/// first `max_length` characters, the cut is at `max_length` exactly.
pub fn truncate_summary(summary: &str, max_length: usize) -> String {
    if summary.chars().count() <= max_length {
        return summary.to_string();
    }
    let cut: String = summary.chars().take(max_length).collect();
    let boundary = match cut.rfind(' ') {
        Some(pos) => &cut[..pos],
        None => cut.as_str(),
    };
    format!("{}...", boundary)
}

/// Unicode NFKC normalization for search comparisons
pub fn normalize_text(text: &str) -> String {
    text.nfkc().collect::<String>().trim().to_string()
}
