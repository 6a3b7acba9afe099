//! Server configuration.
//!
//! Values are layered by [`loader::ConfigLoader`]: built-in defaults, an optional TOML
//! file, `KUBE_MCP_*` environment variables, then command-line overrides.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub use loader::ConfigLoader;

pub const DEFAULT_KUBECONFIG_PATH: &str = "/root/.kube/conf";
pub const DEFAULT_CONFIG_FILE: &str = "kube-mcp";
pub const ENV_PREFIX: &str = "KUBE_MCP";

/// How tool failures reach the MCP client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Failures are ordinary text results
    #[default]
    Text,
    /// Failures become JSON-RPC errors
    Fault,
}

impl fmt::Display for ErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMode::Text => f.write_str("text"),
            ErrorMode::Fault => f.write_str("fault"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Kubeconfig used for every cluster request
    pub kubeconfig_path: PathBuf,
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// Enables a daily rolling log file in this directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    pub error_mode: ErrorMode,
    /// Cache the first client instead of building one per call
    pub reuse_client: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            kubeconfig_path: PathBuf::from(DEFAULT_KUBECONFIG_PATH),
            log_level: "info".to_string(),
            log_dir: None,
            error_mode: ErrorMode::Text,
            reuse_client: false,
        }
    }
}

/// Values given on the command line. `None` leaves the lower layers untouched.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub kubeconfig_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub error_mode: Option<ErrorMode>,
    pub reuse_client: Option<bool>,
}

impl ServerConfig {
    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(path) = overrides.kubeconfig_path {
            self.kubeconfig_path = path;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if let Some(dir) = overrides.log_dir {
            self.log_dir = Some(dir);
        }
        if let Some(mode) = overrides.error_mode {
            self.error_mode = mode;
        }
        if let Some(reuse) = overrides.reuse_client {
            self.reuse_client = reuse;
        }
        self
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.kubeconfig_path, PathBuf::from("/root/.kube/conf"));
        assert_eq!(config.error_mode, ErrorMode::Text);
        assert!(!config.reuse_client);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_overrides_only_touch_given_fields() {
        let config = ServerConfig::default().apply(ConfigOverrides {
            error_mode: Some(ErrorMode::Fault),
            reuse_client: Some(true),
            ..Default::default()
        });
        assert_eq!(config.error_mode, ErrorMode::Fault);
        assert!(config.reuse_client);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_toml_uses_lowercase_mode() {
        let toml = ServerConfig::default().to_toml().unwrap();
        assert!(toml.contains("error_mode = \"text\""));
        assert!(toml.contains("kubeconfig_path = \"/root/.kube/conf\""));
        assert!(!toml.contains("log_dir"));
    }
}
