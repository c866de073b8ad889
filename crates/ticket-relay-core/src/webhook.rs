//! Webhook orchestration for Jira issue-update deliveries.
//!
//! [`JiraWebhookHandler`] runs one delivery through the pipeline:
//!
//! 1. Signature verification, when a secret is configured — the only step
//!    that can change the HTTP response (401 instead of 200)
//! 2. Dedupe check on the delivery identifier; a known identifier is
//!    acknowledged without reprocessing
//! 3. Dedupe record, before any further processing
//! 4. Body parsing and transition detection
//! 5. Prompt construction and a detached agent launch on detection
//!
//! Every path ends in an acknowledgement so the upstream ticket system
//! never sees a reason to retry a delivery that was received intact.

use crate::agent::{AgentLauncher, LaunchRequest};
use crate::dedupe::DedupeStore;
use crate::prompt::{build_prompt, PromptOptions};
use crate::signature::verify_signature;
use crate::transition::detect_todo_to_in_progress;
use bytes::Bytes;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Header carrying Jira's delivery identifier, used for dedupe.
pub const WEBHOOK_ID_HEADER: &str = "x-atlassian-webhook-identifier";

/// Header carrying the HMAC-SHA256 payload signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature";

// ============================================================================
// Request / outcome types
// ============================================================================

/// One webhook delivery as handed over by the HTTP layer.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    /// Value of [`WEBHOOK_ID_HEADER`], when present.
    pub delivery_id: Option<String>,
    /// Value of [`SIGNATURE_HEADER`], when present.
    pub signature: Option<String>,
    /// Exact body bytes as received on the wire, captured before parsing.
    pub body: Bytes,
}

impl WebhookRequest {
    pub fn new(delivery_id: Option<String>, signature: Option<String>, body: Bytes) -> Self {
        Self {
            delivery_id,
            signature,
            body,
        }
    }

    /// Build a request from a lower-cased header map and the raw body.
    pub fn from_http_headers(headers: &HashMap<String, String>, body: Bytes) -> Self {
        Self {
            delivery_id: headers.get(WEBHOOK_ID_HEADER).cloned(),
            signature: headers.get(SIGNATURE_HEADER).cloned(),
            body,
        }
    }
}

/// HTTP-level outcome of one delivery. Every handler path produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Signature verification is configured and failed. Respond 401.
    Unauthorized,
    /// Delivery accepted. Respond 200 so the sender does not retry;
    /// `duplicate` marks a deduplicated redelivery.
    Acknowledged { duplicate: bool },
}

// ============================================================================
// JiraWebhookHandler
// ============================================================================

/// Orchestrates signature verification, deduplication, transition
/// detection, prompt construction, and the agent launch.
///
/// Constructed once at startup with its collaborators injected, then shared
/// across request handlers.
pub struct JiraWebhookHandler {
    secret: Option<String>,
    dedupe: DedupeStore,
    launcher: AgentLauncher,
    prompt_options: PromptOptions,
}

impl JiraWebhookHandler {
    /// Create a handler.
    ///
    /// `secret` enables signature verification; `None` or an empty string
    /// disables it.
    pub fn new(
        secret: Option<String>,
        dedupe: DedupeStore,
        launcher: AgentLauncher,
        prompt_options: PromptOptions,
    ) -> Self {
        Self {
            secret: secret.filter(|secret| !secret.is_empty()),
            dedupe,
            launcher,
            prompt_options,
        }
    }

    /// Process one webhook delivery.
    pub async fn handle(&self, request: WebhookRequest) -> WebhookOutcome {
        if let Some(secret) = self.secret.as_deref() {
            let signature = request.signature.as_deref().unwrap_or_default();
            if request.body.is_empty() || !verify_signature(secret, &request.body, signature) {
                warn!("jira webhook signature missing or invalid");
                return WebhookOutcome::Unauthorized;
            }
        }

        let delivery_id = request.delivery_id.as_deref().unwrap_or_default();
        if self.dedupe.has(delivery_id) {
            info!(webhook_id = delivery_id, "jira webhook duplicate (deduplicated)");
            return WebhookOutcome::Acknowledged { duplicate: true };
        }

        // Record before processing: a crash from here on loses at most this
        // one delivery, instead of double-launching an agent when Jira
        // retries it.
        self.dedupe.add(delivery_id);

        let payload: Value = match serde_json::from_slice(&request.body) {
            Ok(payload) => payload,
            Err(error) => {
                // Not an auth problem; acknowledge so the sender does not
                // keep retrying a body that will never parse.
                debug!(error = %error, "jira webhook body is not valid JSON");
                Value::Object(Default::default())
            }
        };

        let transition = detect_todo_to_in_progress(&payload);
        if transition.detected {
            info!(
                issue_key = transition.issue_key.as_deref().unwrap_or_default(),
                from = transition.from.as_deref().unwrap_or_default(),
                to = transition.to.as_deref().unwrap_or_default(),
                "DO IT!"
            );

            match build_prompt(&payload, &self.prompt_options) {
                Some(prompt) => {
                    self.launcher.launch(LaunchRequest {
                        prompt_text: prompt.text,
                        issue_key: Some(prompt.issue_key),
                        repo: prompt.repo,
                    });
                }
                None => {
                    info!(
                        issue_key = transition.issue_key.as_deref().unwrap_or_default(),
                        "cursor agent skipped: no summary or description in payload"
                    );
                }
            }
        }

        WebhookOutcome::Acknowledged { duplicate: false }
    }
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
