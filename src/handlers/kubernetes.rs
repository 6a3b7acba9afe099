//! MCP handler backed by the Kubernetes tool registry

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{ErrorMode, ServerConfig};
use crate::kubernetes::{KubeconfigConnector, ToolArgs, ToolContext, ToolRegistry};
use crate::mcp::{
    InitializeParams, InitializeResult, McpError, McpHandler, ServerCapabilities, ServerInfo,
    Tool, ToolCallParams, ToolResult, ToolsCapability, PROTOCOL_VERSION,
};

pub const SERVER_NAME: &str = "Kubernetes MCP";

pub struct KubernetesHandler {
    registry: Arc<ToolRegistry>,
    context: ToolContext,
    error_mode: ErrorMode,
}

impl KubernetesHandler {
    pub fn new(registry: Arc<ToolRegistry>, context: ToolContext, error_mode: ErrorMode) -> Self {
        Self {
            registry,
            context,
            error_mode,
        }
    }

    /// Wires the kubeconfig connector the configuration asks for.
    pub fn from_config(registry: Arc<ToolRegistry>, config: &ServerConfig) -> Self {
        let connector = if config.reuse_client {
            KubeconfigConnector::reusing(&config.kubeconfig_path)
        } else {
            KubeconfigConnector::new(&config.kubeconfig_path)
        };
        Self::new(
            registry,
            ToolContext::new(Arc::new(connector)),
            config.error_mode,
        )
    }
}

#[async_trait]
impl McpHandler for KubernetesHandler {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult, McpError> {
        let client = params
            .client_info
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("unknown");
        info!(client, tools = self.registry.len(), "Kubernetes MCP handler initialized");

        Ok(InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        })
    }

    async fn list_tools(&self) -> Result<Vec<Tool>, McpError> {
        Ok(self.registry.iter().map(|tool| tool.to_tool()).collect())
    }

    async fn call_tool(&self, params: ToolCallParams) -> Result<ToolResult, McpError> {
        let Some(tool) = self.registry.get(&params.name) else {
            warn!(tool = %params.name, "Unknown tool requested");
            return Err(McpError::ToolNotFound(params.name));
        };

        info!(tool = tool.name, "Calling tool");
        let args = ToolArgs::from(params.arguments);

        match tool.call(self.context.clone(), args).await {
            Ok(text) => {
                debug!(tool = tool.name, bytes = text.len(), "Tool call succeeded");
                Ok(ToolResult::text(text))
            }
            Err(err) => {
                warn!(tool = tool.name, error = %err, "Tool call failed");
                match self.error_mode {
                    ErrorMode::Text => Ok(ToolResult::text(err.to_string())),
                    ErrorMode::Fault => Err(McpError::Tool(err)),
                }
            }
        }
    }
}
