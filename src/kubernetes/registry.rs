//! Tool catalog.
//!
//! The catalog is assembled once at startup from every resource module's `tools()` and
//! never changes afterwards.

use futures::future::BoxFuture;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

use super::{
    clusterrole, clusterrolebinding, configmap, daemonset, deployment, namespace, node, pod, pv,
    pvc, role, rolebinding, secret, service, serviceaccount, statefulset, storageclass,
};
use super::{ToolArgs, ToolContext};
use crate::error::Result;
use crate::mcp::Tool;

pub type ToolFuture = BoxFuture<'static, Result<String>>;
pub type ToolFn = fn(ToolContext, ToolArgs) -> ToolFuture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Number,
}

impl ParamType {
    fn as_str(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamType,
    pub required: bool,
    pub description: &'static str,
}

/// A named tool: schema plus the handler it dispatches to.
#[derive(Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<Param>,
    handler: ToolFn,
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl ToolDefinition {
    pub fn new(name: &'static str, description: &'static str, handler: ToolFn) -> Self {
        Self {
            name,
            description,
            params: Vec::new(),
            handler,
        }
    }

    fn param(
        mut self,
        name: &'static str,
        kind: ParamType,
        required: bool,
        description: &'static str,
    ) -> Self {
        self.params.push(Param {
            name,
            kind,
            required,
            description,
        });
        self
    }

    /// Required string argument
    pub fn required(self, name: &'static str, description: &'static str) -> Self {
        self.param(name, ParamType::String, true, description)
    }

    /// Optional string argument
    pub fn optional(self, name: &'static str, description: &'static str) -> Self {
        self.param(name, ParamType::String, false, description)
    }

    /// Optional numeric argument
    pub fn number(self, name: &'static str, description: &'static str) -> Self {
        self.param(name, ParamType::Number, false, description)
    }

    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| {
                (
                    p.name.to_string(),
                    json!({ "type": p.kind.as_str(), "description": p.description }),
                )
            })
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.input_schema(),
        }
    }

    pub fn call(&self, ctx: ToolContext, args: ToolArgs) -> ToolFuture {
        (self.handler)(ctx, args)
    }
}

pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    /// Later definitions with an already registered name are dropped.
    pub fn new(definitions: impl IntoIterator<Item = ToolDefinition>) -> Self {
        let mut tools = Vec::new();
        let mut index = HashMap::new();
        for definition in definitions {
            if index.contains_key(definition.name) {
                warn!(tool = definition.name, "Duplicate tool definition ignored");
                continue;
            }
            index.insert(definition.name, tools.len());
            tools.push(definition);
        }
        Self { tools, index }
    }

    /// Every Kubernetes tool this server offers
    pub fn kubernetes() -> Self {
        Self::new(
            [
                pod::tools(),
                namespace::tools(),
                node::tools(),
                deployment::tools(),
                daemonset::tools(),
                statefulset::tools(),
                service::tools(),
                configmap::tools(),
                secret::tools(),
                serviceaccount::tools(),
                role::tools(),
                rolebinding::tools(),
                pvc::tools(),
                pv::tools(),
                clusterrole::tools(),
                clusterrolebinding::tools(),
                storageclass::tools(),
            ]
            .into_iter()
            .flatten(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
