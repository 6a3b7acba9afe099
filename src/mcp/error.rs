use crate::error::ToolError;
use crate::mcp::JsonRpcError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// A domain error surfaced through the fault channel
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl McpError {
    pub fn code(&self) -> i32 {
        match self {
            McpError::Parse(_) => -32700,
            McpError::InvalidRequest(_) => -32600,
            McpError::MethodNotFound(_) => -32601,
            McpError::InvalidParams(_) | McpError::ToolNotFound(_) => -32602,
            McpError::Tool(err) => err.to_json_rpc_code(),
            McpError::Internal(_) | McpError::Serialization(_) | McpError::Io(_) => -32603,
        }
    }
}

impl From<McpError> for JsonRpcError {
    fn from(err: McpError) -> Self {
        JsonRpcError {
            code: err.code(),
            message: err.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_maps_to_invalid_params() {
        let err: JsonRpcError = McpError::ToolNotFound("list-widgets".to_string()).into();
        assert_eq!(err.code, -32602);
        assert_eq!(err.message, "Tool not found: list-widgets");
    }

    #[test]
    fn test_tool_error_keeps_message() {
        let err: JsonRpcError =
            McpError::from(ToolError::Validation("bad input".to_string())).into();
        assert_eq!(err.code, -32602);
        assert_eq!(err.message, "bad input");
    }
}
