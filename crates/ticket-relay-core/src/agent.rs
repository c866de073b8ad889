//! Fire-and-forget launch of Cursor cloud agents.
//!
//! The launch call is a best-effort side effect decoupled from the webhook
//! response path: [`AgentLauncher::launch`] spawns the outbound request onto
//! the runtime and returns immediately. Every completion path — success,
//! non-success HTTP status, transport error — is logged with distinguishing
//! detail and swallowed; nothing propagates to the caller.
//!
//! Exactly one request is sent per launch. There are no retries: a lost
//! launch is visible on the board and recoverable by moving the ticket
//! again, while an accidental second agent is not.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Default endpoint of the Cursor Cloud Agents API.
pub const DEFAULT_AGENTS_URL: &str = "https://api.cursor.com/v0/agents";

/// Default git ref agents start from.
pub const DEFAULT_GIT_REF: &str = "main";

/// Suffix of the working branch created for a launch, after the issue key.
const BRANCH_SUFFIX: &str = "cursor";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the agent launcher.
#[derive(Clone)]
pub struct AgentConfig {
    /// API key for the agent API. Launches are skipped when absent.
    pub api_key: Option<String>,
    /// Fallback repository used when the ticket does not carry one.
    pub repository: Option<String>,
    /// Git ref the agent starts from.
    pub git_ref: String,
    /// Launch endpoint. Overridable for tests.
    pub agents_url: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            repository: None,
            git_ref: DEFAULT_GIT_REF.to_string(),
            agents_url: DEFAULT_AGENTS_URL.to_string(),
        }
    }
}

// Don't expose the API key in debug output.
impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<REDACTED>"))
            .field("repository", &self.repository)
            .field("git_ref", &self.git_ref)
            .field("agents_url", &self.agents_url)
            .finish()
    }
}

/// One launch request, assembled from a detected transition.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub prompt_text: String,
    pub issue_key: Option<String>,
    /// Repository from the ticket; overrides the configured default.
    pub repo: Option<String>,
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
struct LaunchBody {
    prompt: LaunchPrompt,
    source: LaunchSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<LaunchTarget>,
}

#[derive(Debug, Clone, Serialize)]
struct LaunchPrompt {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
struct LaunchSource {
    repository: String,
    #[serde(rename = "ref")]
    git_ref: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct LaunchTarget {
    branch_name: String,
    auto_create_pr: bool,
}

/// Launch response body. Informational only; all fields are optional
/// because a launch counts as successful even when the body cannot be
/// parsed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LaunchReceipt {
    id: Option<String>,
    target: Option<ReceiptTarget>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ReceiptTarget {
    branch_name: Option<String>,
}

#[derive(Debug, Error)]
enum LaunchError {
    #[error("agent API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("agent API request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

// ============================================================================
// AgentLauncher
// ============================================================================

/// Dispatches launch requests to the agent API without blocking the caller.
#[derive(Debug, Clone)]
pub struct AgentLauncher {
    client: reqwest::Client,
    config: AgentConfig,
}

impl AgentLauncher {
    /// Create a launcher with its own HTTP client.
    pub fn new(config: AgentConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("default reqwest client configuration is valid");
        Self { client, config }
    }

    /// Launch an agent for the given request.
    ///
    /// Returns immediately; the outbound call runs as a detached task whose
    /// result is only observed by logging. When the API key or a resolved
    /// repository is missing, a skip notice is logged and no task is
    /// spawned.
    ///
    /// Must be called from within a tokio runtime.
    pub fn launch(&self, request: LaunchRequest) {
        let api_key = self.config.api_key.clone().filter(|key| !key.is_empty());
        let repository = request
            .repo
            .clone()
            .or_else(|| self.config.repository.clone())
            .filter(|repo| !repo.is_empty());

        let has_key = api_key.is_some();
        let has_repo = repository.is_some();
        let (Some(api_key), Some(repository)) = (api_key, repository) else {
            info!(
                has_key,
                has_repo,
                "cursor agent skipped: api key and repository (ticket field or configured default) are required"
            );
            return;
        };

        let branch_name = request
            .issue_key
            .as_deref()
            .map(|key| format!("{}/{}", key, BRANCH_SUFFIX));

        let body = LaunchBody {
            prompt: LaunchPrompt {
                text: request.prompt_text,
            },
            source: LaunchSource {
                repository,
                git_ref: self.config.git_ref.clone(),
            },
            target: branch_name.map(|branch_name| LaunchTarget {
                branch_name,
                auto_create_pr: true,
            }),
        };

        let client = self.client.clone();
        let agents_url = self.config.agents_url.clone();
        let issue_key = request.issue_key;

        // Detached on purpose: the webhook response must not wait for the
        // agent API, and a failed launch must not fail the delivery that
        // triggered it.
        tokio::spawn(async move {
            let issue_key = issue_key.as_deref().unwrap_or_default();
            match send_launch(&client, &agents_url, &api_key, &body).await {
                Ok(receipt) => {
                    info!(
                        agent_id = receipt.id.as_deref().unwrap_or_default(),
                        issue_key,
                        branch_name = receipt
                            .target
                            .as_ref()
                            .and_then(|target| target.branch_name.as_deref())
                            .unwrap_or_default(),
                        "cursor agent launched"
                    );
                }
                Err(LaunchError::Status { status, body }) => {
                    warn!(status, body = %body, issue_key, "cursor agent launch failed");
                }
                Err(LaunchError::Transport(error)) => {
                    warn!(error = %error, issue_key, "cursor agent request error");
                }
            }
        });
    }
}

/// Send the launch request. One attempt, no retries.
async fn send_launch(
    client: &reqwest::Client,
    agents_url: &str,
    api_key: &str,
    body: &LaunchBody,
) -> Result<LaunchReceipt, LaunchError> {
    let response = client
        .post(agents_url)
        .basic_auth(api_key, Some(""))
        .json(body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LaunchError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json::<LaunchReceipt>().await.unwrap_or_default())
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
