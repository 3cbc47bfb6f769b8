//! Server configuration for the DecisioMate web form.
//!
//! This module provides configuration structures for binding the HTTP server,
//! locating the model artifacts and customising the page chrome.

use decisiomate_model::{ArtifactPaths, ArtifactPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the HTTP server.
///
/// # Example
///
/// ```
/// use decisiomate_serving::config::ServerConfig;
/// use decisiomate_model::ArtifactPolicy;
///
/// let config = ServerConfig::builder()
///     .host("127.0.0.1")
///     .port(10101)
///     .artifact_policy(ArtifactPolicy::Cached)
///     .build();
/// assert_eq!(config.socket_addr(), "127.0.0.1:10101");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to (default: "127.0.0.1")
    pub host: String,

    /// Port to listen on (default: 10101)
    pub port: u16,

    /// Locations of the weights and scaler files
    pub artifacts: ArtifactPaths,

    /// When artifacts are read from disk
    pub artifact_policy: ArtifactPolicy,

    /// Header and footer content
    pub page: PageConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 10101,
            artifacts: ArtifactPaths::default(),
            artifact_policy: ArtifactPolicy::default(),
            page: PageConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Reads a JSON configuration file. Missing keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::InvalidConfigFile(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| ConfigError::InvalidConfigFile(format!("{}: {}", path.display(), e)))
    }

    /// Get the socket address string for binding.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate the configuration.
    ///
    /// Artifact files are not required to exist here; they are read per
    /// request and a missing file is reported to the user at that point.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidHost);
        }
        if self.artifacts.weights.as_os_str().is_empty() {
            return Err(ConfigError::EmptyArtifactPath("weights"));
        }
        if self.artifacts.scaler.as_os_str().is_empty() {
            return Err(ConfigError::EmptyArtifactPath("scaler"));
        }
        Ok(())
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    weights_path: Option<PathBuf>,
    scaler_path: Option<PathBuf>,
    artifact_policy: Option<ArtifactPolicy>,
    page: Option<PageConfig>,
}

impl ServerConfigBuilder {
    /// Set the host address.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the port number.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the weights artifact path.
    pub fn weights_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.weights_path = Some(path.into());
        self
    }

    /// Set the scaler artifact path.
    pub fn scaler_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.scaler_path = Some(path.into());
        self
    }

    /// Set both artifact paths.
    pub fn artifacts(mut self, paths: ArtifactPaths) -> Self {
        self.weights_path = Some(paths.weights);
        self.scaler_path = Some(paths.scaler);
        self
    }

    /// Set the artifact loading policy.
    pub fn artifact_policy(mut self, policy: ArtifactPolicy) -> Self {
        self.artifact_policy = Some(policy);
        self
    }

    /// Set the page chrome.
    pub fn page(mut self, page: PageConfig) -> Self {
        self.page = Some(page);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ServerConfig {
        let default = ServerConfig::default();
        ServerConfig {
            host: self.host.unwrap_or(default.host),
            port: self.port.unwrap_or(default.port),
            artifacts: ArtifactPaths {
                weights: self.weights_path.unwrap_or(default.artifacts.weights),
                scaler: self.scaler_path.unwrap_or(default.artifacts.scaler),
            },
            artifact_policy: self.artifact_policy.unwrap_or(default.artifact_policy),
            page: self.page.unwrap_or(default.page),
        }
    }
}

/// A link shown in the footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterLink {
    /// Link text
    pub label: String,
    /// Target URL
    pub url: String,
}

/// Header and footer content of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Header title
    pub title: String,
    /// Header subtitle
    pub subtitle: String,
    /// Name shown in the header persona
    pub persona_name: String,
    /// Role shown under the persona name
    pub persona_role: String,
    /// Footer caption
    pub footer_caption: String,
    /// Footer links
    pub footer_links: Vec<FooterLink>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "DecisioMate".to_string(),
            subtitle: "Let's Make Decision about Mobile Phones".to_string(),
            persona_name: "Manula Gunatilleke".to_string(),
            persona_role: "Developer".to_string(),
            footer_caption: "Made with \u{1f49b} by Manula Gunatilleke".to_string(),
            footer_links: vec![
                FooterLink {
                    label: "GitHub".to_string(),
                    url: "https://github.com/ManulaGunatilleke".to_string(),
                },
                FooterLink {
                    label: "LinkedIn".to_string(),
                    url: "https://www.linkedin.com/in/manula-gunatilleke/".to_string(),
                },
            ],
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Invalid port number
    #[error("Invalid port number: port cannot be 0")]
    InvalidPort,

    /// Empty host
    #[error("Invalid host: host cannot be empty")]
    InvalidHost,

    /// Artifact path left empty
    #[error("Artifact path for {0} cannot be empty")]
    EmptyArtifactPath(&'static str),

    /// Invalid configuration file
    #[error("Invalid configuration file: {0}")]
    InvalidConfigFile(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 10101);
        assert_eq!(config.artifact_policy, ArtifactPolicy::Reload);
        assert_eq!(config.artifacts, ArtifactPaths::default());
        assert_eq!(config.page.title, "DecisioMate");
    }

    #[test]
    fn test_config_builder() {
        let config = ServerConfig::builder()
            .host("0.0.0.0")
            .port(9090)
            .weights_path("/models/w.json")
            .scaler_path("/models/s.json")
            .artifact_policy(ArtifactPolicy::Cached)
            .build();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.artifacts.weights, PathBuf::from("/models/w.json"));
        assert_eq!(config.artifacts.scaler, PathBuf::from("/models/s.json"));
        assert_eq!(config.artifact_policy, ArtifactPolicy::Cached);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_ok());

        config.port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPort)));

        config.port = 8080;
        config.artifacts.scaler = PathBuf::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyArtifactPath("scaler"))
        ));
    }

    #[test]
    fn test_from_json_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"port": 8181, "artifact_policy": "cached", "page": {{"title": "Phones"}}}}"#
        )
        .unwrap();

        let config = ServerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.port, 8181);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.artifact_policy, ArtifactPolicy::Cached);
        assert_eq!(config.page.title, "Phones");
        assert_eq!(config.page.subtitle, PageConfig::default().subtitle);
        assert_eq!(config.page.persona_name, "Manula Gunatilleke");
        assert_eq!(config.page.persona_role, "Developer");
    }

    #[test]
    fn test_from_json_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "port = 8181").unwrap();
        assert!(matches!(
            ServerConfig::from_json_file(file.path()),
            Err(ConfigError::InvalidConfigFile(_))
        ));
    }
}
