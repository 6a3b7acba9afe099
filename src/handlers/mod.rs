//! Handler implementations
//!
//! Handlers implement the common `McpHandler` trait so the server loop stays
//! independent of the target system.

pub mod kubernetes;

pub use kubernetes::*;
