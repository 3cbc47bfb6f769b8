//! Serve Command Implementation
//!
//! Starts the HTTP server hosting the prediction form and JSON API.

use anyhow::{Context, Result};
use clap::Args;
use decisiomate_model::ArtifactPolicy;
use decisiomate_serving::{Server, ServerConfig};
use std::path::PathBuf;
use tracing::{info, warn};

/// Serve the prediction form over HTTP
///
/// Settings are resolved in order: built-in defaults, then the optional
/// `--config` JSON file, then flags and environment variables.
///
/// # Example
///
/// ```bash
/// decisiomate serve \
///     --host 0.0.0.0 \
///     --port 10101 \
///     --artifact-policy cached
/// ```
#[derive(Args, Debug, Clone, Default)]
pub struct ServeCommand {
    /// JSON file deserialized into the server configuration
    #[arg(long, short = 'c', env = "DECISIOMATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Host address to bind to
    #[arg(long, env = "DECISIOMATE_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p', env = "DECISIOMATE_PORT")]
    pub port: Option<u16>,

    /// Path to the weights artifact
    #[arg(long, env = "DECISIOMATE_WEIGHTS")]
    pub weights: Option<PathBuf>,

    /// Path to the scaler artifact
    #[arg(long, env = "DECISIOMATE_SCALER")]
    pub scaler: Option<PathBuf>,

    /// When artifacts are read: "reload" (every request) or "cached"
    #[arg(long, env = "DECISIOMATE_ARTIFACT_POLICY")]
    pub artifact_policy: Option<ArtifactPolicy>,
}

impl ServeCommand {
    /// Resolves the effective server configuration.
    pub fn server_config(&self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config file {:?}", path))?,
            None => ServerConfig::default(),
        };

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(weights) = &self.weights {
            config.artifacts.weights = weights.clone();
        }
        if let Some(scaler) = &self.scaler {
            config.artifacts.scaler = scaler.clone();
        }
        if let Some(policy) = self.artifact_policy {
            config.artifact_policy = policy;
        }

        config.validate().context("Invalid server configuration")?;
        Ok(config)
    }

    /// Execute the serve command
    pub async fn run(&self) -> Result<()> {
        let config = self.server_config()?;
        info!("Starting DecisioMate server on {}", config.socket_addr());

        if !config.artifacts.exist() {
            warn!(
                "Artifacts not found at {:?} / {:?}; predictions will fail until they exist",
                config.artifacts.weights, config.artifacts.scaler
            );
        }

        let server = Server::new(config).context("Failed to create server")?;
        server.run().await.context("Server failed")?;
        Ok(())
    }
}
