//! # kube-mcp-rs
//!
//! Model Context Protocol server exposing Kubernetes cluster operations as tools.
//!
//! An MCP client speaks line-delimited JSON-RPC over stdio, discovers the tool catalog
//! through `tools/list`, and invokes tools by name. Each tool performs one list, get,
//! create, update or delete against the cluster named by the configured kubeconfig and
//! answers with a text result, usually pretty-printed JSON.

pub mod config;
pub mod error;
pub mod handlers;
pub mod kubernetes;
pub mod logging;
pub mod mcp;

pub use config::{ConfigLoader, ErrorMode, ServerConfig};
pub use error::{Result, ToolError};
pub use handlers::KubernetesHandler;
pub use kubernetes::{ToolContext, ToolRegistry};
pub use mcp::McpServer;
