//! Repository reference normalization.
//!
//! Tickets carry a repository override as free text: either a full URL or a
//! GitHub `owner/name` shorthand. The agent API wants a URL, so the
//! shorthand is rewritten and anything unrecognizable is discarded.

use regex::Regex;
use std::sync::LazyLock;

/// Matches a GitHub `owner/name` shorthand. Both segments are restricted to
/// the characters GitHub allows in organisation and repository names.
static REPO_SHORTHAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$").expect("repo shorthand pattern is valid")
});

/// Normalize a repository reference to a full URL.
///
/// `http://` and `https://` values pass through unchanged, an `owner/name`
/// shorthand becomes `https://github.com/owner/name`, and anything else
/// (including an empty or whitespace-only value) is `None`.
///
/// # Examples
///
/// ```
/// use ticket_relay_core::repo::normalize_repo_url;
///
/// assert_eq!(
///     normalize_repo_url("acme/widgets").as_deref(),
///     Some("https://github.com/acme/widgets")
/// );
/// assert_eq!(
///     normalize_repo_url("https://example.com/x").as_deref(),
///     Some("https://example.com/x")
/// );
/// assert_eq!(normalize_repo_url("not a repo!!"), None);
/// ```
pub fn normalize_repo_url(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Some(trimmed.to_string());
    }

    if REPO_SHORTHAND.is_match(trimmed) {
        return Some(format!("https://github.com/{}", trimmed));
    }

    None
}

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;
