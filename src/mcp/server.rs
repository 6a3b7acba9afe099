use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use crate::mcp::{
    InitializeParams, InitializeResult, JsonRpcRequest, JsonRpcResponse, McpError, Tool,
    ToolCallParams, ToolResult, JSONRPC_VERSION,
};

#[async_trait]
pub trait McpHandler: Send + Sync {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult, McpError>;
    async fn list_tools(&self) -> Result<Vec<Tool>, McpError>;
    async fn call_tool(&self, params: ToolCallParams) -> Result<ToolResult, McpError>;
}

/// Line-delimited JSON-RPC server bound to one handler.
pub struct McpServer {
    handler: Arc<dyn McpHandler>,
}

impl McpServer {
    pub fn new(handler: Arc<dyn McpHandler>) -> Self {
        Self { handler }
    }

    /// Serves requests from stdin until it closes
    pub async fn run_stdio(&self) -> Result<(), McpError> {
        info!("MCP Server running on stdio");
        let reader = tokio::io::BufReader::new(tokio::io::stdin());
        self.serve(reader, tokio::io::stdout()).await
    }

    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<(), McpError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                break; // EOF
            }
            if line.trim().is_empty() {
                continue;
            }

            let Some(response) = self.process_line(&line).await else {
                continue;
            };

            let response_str = serde_json::to_string(&response)?;
            writer.write_all(response_str.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        info!("Input closed, shutting down");
        Ok(())
    }

    /// Handles one raw line. Returns `None` for notifications.
    pub async fn process_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line.trim()) {
            Ok(request) => request,
            Err(e) => {
                warn!("Malformed request: {}", e);
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    McpError::Parse(e.to_string()).into(),
                ));
            }
        };

        if request.is_notification() {
            debug!(method = %request.method, "Notification received");
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        if request.jsonrpc != JSONRPC_VERSION {
            warn!(version = %request.jsonrpc, "Unsupported JSON-RPC version");
            let err = McpError::InvalidRequest(format!(
                "jsonrpc must be \"{JSONRPC_VERSION}\", got \"{}\"",
                request.jsonrpc
            ));
            return Some(JsonRpcResponse::failure(id, err.into()));
        }

        match self.dispatch(request).await {
            Ok(result) => Some(JsonRpcResponse::success(id, result)),
            Err(e) => {
                if matches!(e, McpError::Io(_) | McpError::Internal(_)) {
                    error!("Error processing request: {}", e);
                } else {
                    warn!("Request failed: {}", e);
                }
                Some(JsonRpcResponse::failure(id, e.into()))
            }
        }
    }

    async fn dispatch(&self, request: JsonRpcRequest) -> Result<Value, McpError> {
        debug!(method = %request.method, "Dispatching request");

        match request.method.as_str() {
            "initialize" => {
                let params: InitializeParams = match request.params {
                    Some(params) => serde_json::from_value(params)
                        .map_err(|e| McpError::InvalidParams(e.to_string()))?,
                    None => InitializeParams::default(),
                };
                let result = self.handler.initialize(params).await?;
                Ok(serde_json::to_value(result)?)
            }
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => {
                let tools = self.handler.list_tools().await?;
                Ok(serde_json::json!({ "tools": tools }))
            }
            "tools/call" => {
                let params: ToolCallParams = serde_json::from_value(
                    request
                        .params
                        .ok_or_else(|| McpError::InvalidParams("Missing params".to_string()))?,
                )
                .map_err(|e| McpError::InvalidParams(e.to_string()))?;
                let result = self.handler.call_tool(params).await?;
                Ok(serde_json::to_value(result)?)
            }
            _ => Err(McpError::MethodNotFound(request.method)),
        }
    }
}
