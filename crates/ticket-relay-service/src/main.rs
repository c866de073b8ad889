//! # Ticket-Relay Service
//!
//! Binary entry point for the ticket-relay HTTP service.
//!
//! This executable:
//! - Loads configuration from environment and files
//! - Initializes logging
//! - Creates the webhook pipeline and its dependencies
//! - Starts the HTTP server

use std::sync::Arc;
use ticket_relay_core::agent::{AgentConfig, AgentLauncher};
use ticket_relay_core::dedupe::DedupeStore;
use ticket_relay_core::prompt::PromptOptions;
use ticket_relay_core::webhook::JiraWebhookHandler;
use ticket_relay_service::{start_server, AppState, ServiceConfig};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ticket_relay_service=info,ticket_relay_core=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ticket-Relay Service");

    // -------------------------------------------------------------------------
    // Load configuration
    //
    // Sources (applied in order — later sources override earlier ones):
    //  1. /etc/ticket-relay/service.yaml   — system-wide defaults
    //  2. ./config/service.yaml            — deployment-local override
    //  3. Path given by TR_CONFIG_FILE env — operator-specified file
    //  4. Environment variables prefixed TR__ (double-underscore separator)
    //     e.g. TR__SERVER__PORT=8080 sets server.port = 8080
    //
    // All configuration fields carry serde defaults, so absent files or an
    // entirely unconfigured environment produces a valid service config. A
    // malformed file or an environment variable that cannot be coerced to
    // the correct type IS a hard error because it indicates
    // deliberate-but-broken operator configuration.
    // -------------------------------------------------------------------------
    let mut config_builder = config::Config::builder()
        .add_source(
            config::File::with_name("/etc/ticket-relay/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        )
        .add_source(
            config::File::with_name("config/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        );

    // Optional explicit path supplied by the operator.
    if let Ok(explicit_path) = std::env::var("TR_CONFIG_FILE") {
        if !explicit_path.is_empty() {
            config_builder = config_builder.add_source(
                config::File::with_name(&explicit_path)
                    .required(true)
                    .format(config::FileFormat::Yaml),
            );
            info!(path = %explicit_path, "Loading configuration from explicit path");
        }
    }

    let config = match config_builder
        .add_source(config::Environment::with_prefix("TR").separator("__"))
        .build()
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "Failed to build configuration; aborting");
            std::process::exit(3);
        }
    };

    let service_config: ServiceConfig = match config.try_deserialize() {
        Ok(sc) => sc,
        Err(e) => {
            error!(
                error = %e,
                "Could not deserialize service configuration; aborting. \
                 Fix the configuration and restart."
            );
            std::process::exit(3);
        }
    };

    if let Err(e) = service_config.validate() {
        error!(error = %e, "Service configuration is invalid; aborting");
        std::process::exit(3);
    }

    // -------------------------------------------------------------------------
    // Wire the pipeline
    //
    // One dedupe store and one launcher for the process lifetime, injected
    // into the handler rather than reached through globals. The dedupe
    // store is in-memory only: a restart clears it, and Jira retries
    // arriving after a restart are processed again. That is accepted.
    // -------------------------------------------------------------------------
    let launcher = AgentLauncher::new(AgentConfig {
        api_key: service_config.agent.api_key.clone(),
        repository: service_config.agent.repository.clone(),
        git_ref: service_config.agent.git_ref.clone(),
        agents_url: service_config.agent.agents_url.clone(),
    });

    let prompt_options = PromptOptions {
        jira_base_url: service_config.jira.base_url.clone(),
        repo_field: service_config.jira.repo_field.clone(),
    };

    if service_config.jira.webhook_secret.is_none() {
        info!("No webhook secret configured; signature verification is disabled");
    }

    let handler = JiraWebhookHandler::new(
        service_config.jira.webhook_secret.clone(),
        DedupeStore::new(),
        launcher,
        prompt_options,
    );

    let state = AppState {
        webhook_handler: Arc::new(handler),
    };

    start_server(&service_config, state).await?;

    Ok(())
}
