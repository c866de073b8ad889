//! Status-transition detection for Jira issue-update events.
//!
//! Jira reports field changes in a `changelog.items` list on every
//! `jira:issue_updated` delivery. The pipeline only cares about one of them:
//! the status field moving from To Do to In Progress. Status display names
//! arrive inconsistently across sites and locales ("To Do", "TODO",
//! "to_do", trailing whitespace), so matching normalizes both sides and
//! accepts a small alias set.

use serde_json::Value;

const ISSUE_UPDATED_EVENT: &str = "jira:issue_updated";

const TODO_ALIASES: [&str; 3] = ["to do", "todo", "to_do"];
const IN_PROGRESS_ALIASES: [&str; 3] = ["in progress", "inprogress", "in_progress"];

/// Outcome of inspecting one issue-update payload.
///
/// `from` and `to` carry the original display strings from the changelog,
/// not the normalized forms used for comparison.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransitionResult {
    pub detected: bool,
    pub issue_key: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl TransitionResult {
    fn not_detected(issue_key: Option<String>) -> Self {
        Self {
            detected: false,
            issue_key,
            ..Default::default()
        }
    }
}

/// Inspect a webhook payload for a To Do → In Progress status change.
///
/// Only `jira:issue_updated` events are considered. The first changelog
/// entry whose `field` is `"status"` wins; later status entries in the same
/// payload are ignored. Display strings (`fromString`/`toString`) are
/// preferred over the raw `from`/`to` status codes.
pub fn detect_todo_to_in_progress(payload: &Value) -> TransitionResult {
    if payload.get("webhookEvent").and_then(Value::as_str) != Some(ISSUE_UPDATED_EVENT) {
        return TransitionResult::not_detected(None);
    }

    let issue_key = payload
        .pointer("/issue/key")
        .and_then(Value::as_str)
        .map(str::to_string);

    let status_change = payload
        .pointer("/changelog/items")
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .find(|item| item.get("field").and_then(Value::as_str) == Some("status"))
        });

    let Some(change) = status_change else {
        return TransitionResult::not_detected(issue_key);
    };

    let from = display_string(change, "fromString", "from");
    let to = display_string(change, "toString", "to");

    match (&from, &to) {
        (Some(from_name), Some(to_name))
            if matches_any(from_name, &TODO_ALIASES)
                && matches_any(to_name, &IN_PROGRESS_ALIASES) =>
        {
            TransitionResult {
                detected: true,
                issue_key,
                from,
                to,
            }
        }
        _ => TransitionResult::not_detected(issue_key),
    }
}

/// Prefer the human-readable `*String` variant over the raw status code.
fn display_string(change: &Value, string_field: &str, raw_field: &str) -> Option<String> {
    change
        .get(string_field)
        .and_then(Value::as_str)
        .or_else(|| change.get(raw_field).and_then(Value::as_str))
        .map(str::to_string)
}

/// Trim, lower-case, and collapse internal whitespace runs to single spaces.
fn normalize_status(status: &str) -> String {
    status
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Match a status name against an alias set, either directly or with
/// spaces and underscores stripped from both sides. A hyphenated variant
/// like "To-Do" is deliberately not matched.
fn matches_any(status: &str, aliases: &[&str]) -> bool {
    let normalized = normalize_status(status);
    aliases.iter().any(|alias| {
        normalized == *alias || strip_separators(&normalized) == strip_separators(alias)
    })
}

fn strip_separators(status: &str) -> String {
    status
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect()
}

#[cfg(test)]
#[path = "transition_tests.rs"]
mod tests;
