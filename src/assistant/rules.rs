//! User rules mined from free-text feedback.

use std::collections::HashSet;

use crate::domain::FeedbackEntry;

pub const DEFAULT_MAX_RULES: usize = 10;
pub const DEFAULT_MIN_RULE_LEN: usize = 6;

/// Lower-case, strip punctuation, collapse whitespace.
pub fn normalize_rule(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Distinct reasons from `history` (most-recent-first), in that order.
///
/// Duplicates are detected on the normalized text and the most recent
/// phrasing is kept verbatim (trimmed). Reasons whose normalized form is
/// shorter than `min_len` are dropped.
pub fn extract_user_rules(history: &[FeedbackEntry], max_rules: usize, min_len: usize) -> Vec<String> {
    let mut seen = HashSet::new();

    history
        .iter()
        .filter_map(FeedbackEntry::reason)
        .filter(|reason| {
            let key = normalize_rule(reason);
            key.chars().count() >= min_len && seen.insert(key)
        })
        .take(max_rules)
        .map(str::to_string)
        .collect()
}
