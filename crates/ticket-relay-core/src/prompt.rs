//! Prompt construction from a Jira issue-update payload.
//!
//! A detected transition turns into one instruction string for the agent:
//! a fixed sentence naming the issue key, the summary and description blocks
//! that are actually present, and optionally an instruction to link the
//! ticket from the pull request description. The repository override is read
//! from a configurable issue field and normalized to a URL.

use crate::adf::to_plain_text;
use crate::repo::normalize_repo_url;
use serde_json::Value;

/// Issue field carrying the repository override when none is configured.
pub const DEFAULT_REPO_FIELD: &str = "gh_repo";

/// Instruction text plus metadata for one agent launch.
///
/// `text` is non-empty by construction: when the issue carries no usable
/// content, no `Prompt` is produced at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub issue_key: String,
    pub repo: Option<String>,
}

/// Knobs for prompt construction.
#[derive(Debug, Clone)]
pub struct PromptOptions {
    /// Jira site base URL. When set, the prompt instructs the agent to link
    /// the ticket from the pull request description.
    pub jira_base_url: Option<String>,
    /// Issue field carrying the repository override — a named property like
    /// `gh_repo` or a `customfield_XXXXX` key.
    pub repo_field: String,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            jira_base_url: None,
            repo_field: DEFAULT_REPO_FIELD.to_string(),
        }
    }
}

/// Build the agent prompt from a webhook payload.
///
/// Returns `None` when the payload has no issue key or when neither a
/// summary nor a description survives extraction — there is nothing to ask
/// an agent to do.
pub fn build_prompt(payload: &Value, options: &PromptOptions) -> Option<Prompt> {
    let issue = payload.get("issue")?;
    let issue_key = issue.get("key").and_then(Value::as_str)?;
    let fields = issue.get("fields");

    let summary = fields
        .and_then(|fields| fields.get("summary"))
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    let description = fields
        .and_then(|fields| fields.get("description"))
        .map(to_plain_text)
        .unwrap_or_default();

    let mut parts = Vec::new();
    if !summary.is_empty() {
        parts.push(format!("**Summary:** {}", summary));
    }
    if !description.is_empty() {
        parts.push(format!("**Description:**\n{}", description));
    }
    if parts.is_empty() {
        return None;
    }

    let mut text = format!(
        "Implement the following from Jira {}:\n\n{}",
        issue_key,
        parts.join("\n\n")
    );

    if let Some(base_url) = options
        .jira_base_url
        .as_deref()
        .filter(|base_url| !base_url.is_empty())
    {
        let ticket_url = format!("{}/browse/{}", base_url.trim_end_matches('/'), issue_key);
        text.push_str(&format!(
            "\n\nIn the pull request description, include a link to the Jira ticket: {}",
            ticket_url
        ));
    }

    let repo = fields
        .and_then(|fields| fields.get(options.repo_field.as_str()))
        .map(unwrap_field_value)
        .and_then(Value::as_str)
        .and_then(normalize_repo_url);

    let text = text.trim().to_string();
    if text.is_empty() {
        return None;
    }

    Some(Prompt {
        text,
        issue_key: issue_key.to_string(),
        repo,
    })
}

/// Unwrap the `{"value": ...}` shape Jira uses for select-style custom
/// fields; plain values pass through.
fn unwrap_field_value(field: &Value) -> &Value {
    match field.get("value") {
        Some(inner) => inner,
        None => field,
    }
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
