//! Plain-text extraction from Atlassian Document Format (ADF) trees.
//!
//! Jira delivers rich-text fields — most importantly the issue description —
//! as an ADF tree: tagged nodes with an optional `text` value and optional
//! `content` children. The agent prompt only needs flattened text, so
//! extraction walks the tree and applies minimal formatting to block-level
//! nodes.
//!
//! Extraction is total: any input shape, including `null` and trees that do
//! not resemble ADF at all, degrades to an empty string rather than an error.

use serde_json::Value;

/// Recursively extract plain text from an ADF node.
///
/// - `text` nodes yield their `text` value, or `""` when it is absent
/// - `paragraph` and `heading` nodes yield their children's text, trimmed,
///   with a trailing newline
/// - `listItem` nodes are prefixed with `"- "`, trimmed, with a trailing
///   newline
/// - any other node with `content` children concatenates them unchanged
/// - anything else yields `""`
fn node_to_plain_text(node: &Value) -> String {
    let Some(object) = node.as_object() else {
        return String::new();
    };

    if object.get("type").and_then(Value::as_str) == Some("text") {
        return object
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
    }

    if let Some(children) = object.get("content").and_then(Value::as_array) {
        let joined: String = children.iter().map(node_to_plain_text).collect();
        return match object.get("type").and_then(Value::as_str) {
            Some("paragraph") | Some("heading") => format!("{}\n", joined.trim()),
            Some("listItem") => format!("- {}\n", joined.trim()),
            _ => joined,
        };
    }

    String::new()
}

/// Convert a Jira description field to plain text.
///
/// Handles the shapes Jira sends: a plain string, an ADF document
/// (`{"type": "doc", ...}`), or nothing at all. Scalar values render with
/// their JSON display form; objects and arrays that are not ADF documents
/// extract to `""`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use ticket_relay_core::adf::to_plain_text;
///
/// let doc = json!({
///     "type": "doc",
///     "content": [
///         { "type": "paragraph", "content": [
///             { "type": "text", "text": "Fix the login flow" }
///         ] }
///     ]
/// });
/// assert_eq!(to_plain_text(&doc), "Fix the login flow");
/// assert_eq!(to_plain_text(&json!("  already plain  ")), "already plain");
/// assert_eq!(to_plain_text(&json!(null)), "");
/// ```
pub fn to_plain_text(description: &Value) -> String {
    match description {
        Value::Null => String::new(),
        Value::String(text) => text.trim().to_string(),
        Value::Object(object) if object.get("type").and_then(Value::as_str) == Some("doc") => {
            node_to_plain_text(description).trim().to_string()
        }
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
#[path = "adf_tests.rs"]
mod tests;
