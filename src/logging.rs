//! Tracing setup. Stdout carries the protocol, so console output goes to stderr.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

pub const LOG_FILE_NAME: &str = "kube-mcp.log";

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive (`info`, `kube_mcp_rs=debug`, ...) used when `RUST_LOG` is unset
    pub level: String,
    /// Daily rolling file directory; console only when `None`
    pub log_dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl LogConfig {
    pub fn from_server_config(config: &ServerConfig) -> Self {
        Self {
            level: config.log_level.clone(),
            log_dir: config.log_dir.clone(),
        }
    }

    /// `RUST_LOG` wins over the configured level.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn ensure_log_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    Ok(())
}

/// Installs the global subscriber. Keep the returned guard alive until exit or
/// buffered file output is lost.
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = config.env_filter();

    let guard = match &config.log_dir {
        Some(dir) => {
            ensure_log_dir(dir)?;
            let (file_writer, guard) = non_blocking(rolling::daily(dir, LOG_FILE_NAME));
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr.and(file_writer))
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to install subscriber: {e}"))?;
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to install subscriber: {e}"))?;
            None
        }
    };

    tracing::debug!(level = %config.level, log_dir = ?config.log_dir, "Logging initialized");
    Ok(guard)
}
