use super::{ConfigOverrides, ServerConfig, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use anyhow::{Context, Result};
use config::{Config, Environment, File};

/// Configuration loader with builder pattern
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_file: Option<String>,
    load_env: bool,
    overrides: ConfigOverrides,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// An explicit file must exist; without one `kube-mcp.toml` is read if present.
    pub fn load_from_file(mut self, path: Option<&str>) -> Self {
        self.config_file = path.map(String::from);
        self
    }

    /// Read `KUBE_MCP_*` variables
    pub fn load_from_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn build(self) -> Result<ServerConfig> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&ServerConfig::default()).context("Failed to encode defaults")?,
        );

        builder = match &self.config_file {
            Some(path) => builder.add_source(File::with_name(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        if self.load_env {
            builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        }

        let config: ServerConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(config.apply(self.overrides))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErrorMode;
    use std::io::Write;

    #[test]
    fn test_file_layer_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "error_mode = \"fault\"\nlog_level = \"debug\"").unwrap();

        let config = ConfigLoader::new()
            .load_from_file(file.path().to_str())
            .build()
            .unwrap();
        assert_eq!(config.error_mode, ErrorMode::Fault);
        assert_eq!(config.log_level, "debug");
        assert!(!config.reuse_client);
    }

    #[test]
    fn test_overrides_beat_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();

        let config = ConfigLoader::new()
            .load_from_file(file.path().to_str())
            .with_overrides(ConfigOverrides {
                log_level: Some("warn".to_string()),
                ..Default::default()
            })
            .build()
            .unwrap();
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let result = ConfigLoader::new()
            .load_from_file(Some("/nonexistent/kube-mcp-config.toml"))
            .build();
        assert!(result.is_err());
    }
}
