//! Cluster connection factory.

use async_trait::async_trait;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::{Result, ToolError};

/// Produces an authenticated handle for one tool call.
#[async_trait]
pub trait ClusterConnector: Send + Sync {
    async fn connect(&self) -> Result<Client>;
}

/// Builds clients from a kubeconfig file, optionally keeping the first one.
pub struct KubeconfigConnector {
    path: PathBuf,
    cached: Option<OnceCell<Client>>,
}

impl KubeconfigConnector {
    /// A fresh client per call
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
        }
    }

    /// The first successfully built client is reused by later calls
    pub fn reusing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: Some(OnceCell::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn build(&self) -> Result<Client> {
        debug!(path = %self.path.display(), "Building cluster client");
        let kubeconfig = Kubeconfig::read_from(&self.path)
            .map_err(|e| ToolError::Connection(e.to_string()))?;
        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .map_err(|e| ToolError::Connection(e.to_string()))?;
        Client::try_from(config).map_err(|e| ToolError::Connection(e.to_string()))
    }
}

#[async_trait]
impl ClusterConnector for KubeconfigConnector {
    async fn connect(&self) -> Result<Client> {
        match &self.cached {
            Some(cell) => cell.get_or_try_init(|| self.build()).await.cloned(),
            None => self.build().await,
        }
    }
}

/// Shared state handed to every tool handler.
#[derive(Clone)]
pub struct ToolContext {
    connector: Arc<dyn ClusterConnector>,
}

impl ToolContext {
    pub fn new(connector: Arc<dyn ClusterConnector>) -> Self {
        Self { connector }
    }

    pub async fn client(&self) -> Result<Client> {
        self.connector.connect().await
    }
}
