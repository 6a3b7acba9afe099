//! Error types for Kubernetes tool calls.

use thiserror::Error;

/// Result type alias for tool handlers
pub type Result<T> = std::result::Result<T, ToolError>;

/// Domain failures raised while serving a single tool call.
///
/// Every variant renders to the exact sentence returned to the calling agent, so the
/// `Display` output is part of the tool contract.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A required argument was absent or not a string
    #[error("{0}")]
    MissingArgument(String),

    /// The cluster handle could not be built
    #[error("Error in initializing client: {0}")]
    Connection(String),

    /// The Kubernetes API rejected the request
    #[error("{context}: {source}")]
    Api {
        context: String,
        #[source]
        source: kube::Error,
    },

    /// Locally detected shape mismatch
    #[error("{0}")]
    Validation(String),

    /// Projection could not be rendered
    #[error("Error in marshalling: {0}")]
    Marshal(#[from] serde_json::Error),
}

impl ToolError {
    pub fn missing(message: impl Into<String>) -> Self {
        ToolError::MissingArgument(message.into())
    }

    pub fn api(context: impl Into<String>, source: kube::Error) -> Self {
        ToolError::Api {
            context: context.into(),
            source,
        }
    }

    /// JSON-RPC error code used when domain errors are delivered as faults
    pub fn to_json_rpc_code(&self) -> i32 {
        match self {
            ToolError::MissingArgument(_) | ToolError::Validation(_) => -32602,
            ToolError::Connection(_) | ToolError::Api { .. } | ToolError::Marshal(_) => -32603,
        }
    }
}
