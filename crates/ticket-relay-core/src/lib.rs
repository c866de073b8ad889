//! # Ticket-Relay Core
//!
//! Core pipeline for the ticket-relay webhook bridge: receives Jira Cloud
//! issue-update deliveries, detects a To Do → In Progress status transition,
//! extracts an instruction prompt from the issue, and fires a one-shot launch
//! request at the Cursor Cloud Agents API.
//!
//! ## Architecture
//!
//! The pipeline is HTTP-framework agnostic. The hosting shell hands over a
//! [`webhook::WebhookRequest`] carrying the recognized headers and the exact
//! raw body bytes, and maps the returned [`webhook::WebhookOutcome`] onto an
//! HTTP response. Everything in between — signature verification, delivery
//! deduplication, transition detection, prompt construction, and the
//! fire-and-forget agent launch — lives in this crate.
//!
//! Modules, leaf-first:
//!
//! - [`adf`] — plain-text extraction from Atlassian Document Format trees
//! - [`repo`] — repository reference normalization
//! - [`dedupe`] — bounded FIFO store of recently seen delivery identifiers
//! - [`signature`] — HMAC-SHA256 verification over raw wire bytes
//! - [`transition`] — status-transition detection with tolerant matching
//! - [`prompt`] — prompt composition from issue summary and description
//! - [`agent`] — detached outbound launch call with swallowed errors
//! - [`webhook`] — orchestration of all of the above
//!
//! ## Error policy
//!
//! Only a failed signature check changes the HTTP response. Every other
//! internal failure — malformed documents, unusable repository references,
//! launch errors — degrades to "delivery acknowledged, nothing launched" so
//! the upstream ticket system never sees a reason to retry.

pub mod adf;
pub mod agent;
pub mod dedupe;
pub mod prompt;
pub mod repo;
pub mod signature;
pub mod transition;
pub mod webhook;

// Re-export the types the hosting shell wires together.
pub use agent::{AgentConfig, AgentLauncher, LaunchRequest};
pub use dedupe::DedupeStore;
pub use prompt::{build_prompt, Prompt, PromptOptions};
pub use transition::{detect_todo_to_in_progress, TransitionResult};
pub use webhook::{JiraWebhookHandler, WebhookOutcome, WebhookRequest};
