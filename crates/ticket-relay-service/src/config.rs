//! Configuration types for the HTTP service.
//!
//! Every field carries a serde default, so an entirely unconfigured
//! environment produces a valid config that binds port 3000 and runs the
//! pipeline with signature verification and agent launches disabled (no
//! secret, no API key). Validation only rejects values that indicate
//! deliberate-but-broken operator configuration.

use serde::{Deserialize, Serialize};
use ticket_relay_core::agent::{DEFAULT_AGENTS_URL, DEFAULT_GIT_REF};
use ticket_relay_core::prompt::DEFAULT_REPO_FIELD;

use crate::ServiceError;

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Jira webhook settings
    pub jira: JiraConfig,

    /// Agent launch settings
    pub agent: AgentSettings,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Jira-side settings: inbound verification and prompt construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraConfig {
    /// Shared webhook secret; enables signature verification when set
    pub webhook_secret: Option<String>,

    /// Jira site base URL; enables ticket links in prompts when set
    pub base_url: Option<String>,

    /// Issue field carrying the repository override
    pub repo_field: String,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            webhook_secret: None,
            base_url: None,
            repo_field: DEFAULT_REPO_FIELD.to_string(),
        }
    }
}

/// Agent-side settings for the outbound launch call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// API key for the agent API; launches are skipped when absent
    pub api_key: Option<String>,

    /// Default repository when the ticket does not carry one
    pub repository: Option<String>,

    /// Git ref agents start from
    pub git_ref: String,

    /// Launch endpoint
    pub agents_url: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            repository: None,
            git_ref: DEFAULT_GIT_REF.to_string(),
            agents_url: DEFAULT_AGENTS_URL.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.server.port == 0 {
            return Err(ServiceError::InvalidConfiguration {
                message: "server.port must be non-zero".to_string(),
            });
        }

        if !self.agent.agents_url.starts_with("http://")
            && !self.agent.agents_url.starts_with("https://")
        {
            return Err(ServiceError::InvalidConfiguration {
                message: format!(
                    "agent.agents_url must be an http(s) URL, got '{}'",
                    self.agent.agents_url
                ),
            });
        }

        if self.jira.repo_field.trim().is_empty() {
            return Err(ServiceError::InvalidConfiguration {
                message: "jira.repo_field must not be blank".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
