//! Node tools

use k8s_openapi::api::core::v1::Node;
use kube::api::Api;
use kube::ResourceExt;
use serde::Serialize;
use tracing::info;

use super::registry::ToolDefinition;
use super::update::Family;
use super::{delete_object, get_object, list_objects, render, update_object, ToolArgs, ToolContext};
use crate::error::Result;

const KIND: &str = "node";

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kubernetes_version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub os: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kernel_version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub architecture: String,
}

/// `Ready` or `NotReady` from the node's Ready condition
fn readiness(node: &Node) -> String {
    node.status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .and_then(|conditions| conditions.iter().find(|c| c.type_ == "Ready"))
        .map(|c| if c.status == "True" { "Ready" } else { "NotReady" })
        .unwrap_or_default()
        .to_string()
}

impl NodeData {
    pub fn summary(node: &Node) -> Self {
        Self {
            name: node.name_any(),
            status: readiness(node),
            ..Default::default()
        }
    }

    pub fn detail(node: &Node) -> Self {
        let info = node.status.as_ref().and_then(|s| s.node_info.as_ref());
        match info {
            Some(info) => Self {
                kubernetes_version: info.kubelet_version.clone(),
                os: info.os_image.clone(),
                kernel_version: info.kernel_version.clone(),
                architecture: info.architecture.clone(),
                ..Self::summary(node)
            },
            None => Self::summary(node),
        }
    }
}

fn name_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("name", "Provide name for node")
}

pub async fn list(ctx: ToolContext, _args: ToolArgs) -> Result<String> {
    let api: Api<Node> = Api::all(ctx.client().await?);
    let nodes = list_objects(&api, "", "Error in listing node".to_string()).await?;
    render(&nodes.iter().map(NodeData::summary).collect::<Vec<_>>())
}

pub async fn get(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let name = name_arg(&args)?;
    let api: Api<Node> = Api::all(ctx.client().await?);
    let node = get_object(&api, &name, KIND, &name).await?;
    render(&NodeData::detail(&node))
}

pub async fn delete(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let name = name_arg(&args)?;
    let api: Api<Node> = Api::all(ctx.client().await?);
    delete_object(&api, &name, KIND, &name).await?;
    info!(node = %name, "Node deleted");
    Ok(format!("Node {name} is deleted"))
}

pub async fn update(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let name = name_arg(&args)?;
    args.require_string("label", "Provide label for node")?;
    let api: Api<Node> = Api::all(ctx.client().await?);
    update_object(&api, &name, KIND, &name, &args, &[Family::Label]).await
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list-node",
            "List the node in the kubernetes cluster with status",
            tool_handler!(list),
        ),
        ToolDefinition::new(
            "get-node",
            "Get the particular node in the kubernetes cluster with status, kubernetes version, architecture and os",
            tool_handler!(get),
        )
        .required("name", "Name of the node to get"),
        ToolDefinition::new(
            "delete-node",
            "Delete the particular node in the kubernetes cluster",
            tool_handler!(delete),
        )
        .required("name", "Name of the node to be deleted"),
        ToolDefinition::new(
            "update-node",
            "Update the node like label changes",
            tool_handler!(update),
        )
        .required("name", "Name of the node to be updated")
        .required("label", "Label to be updated"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{NodeCondition, NodeStatus, NodeSystemInfo};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn node(ready: &str) -> Node {
        Node {
            metadata: ObjectMeta {
                name: Some("worker-1".to_string()),
                ..Default::default()
            },
            status: Some(NodeStatus {
                conditions: Some(vec![
                    NodeCondition {
                        type_: "MemoryPressure".to_string(),
                        status: "False".to_string(),
                        ..Default::default()
                    },
                    NodeCondition {
                        type_: "Ready".to_string(),
                        status: ready.to_string(),
                        ..Default::default()
                    },
                ]),
                node_info: Some(NodeSystemInfo {
                    kubelet_version: "v1.31.2".to_string(),
                    os_image: "Ubuntu 24.04".to_string(),
                    kernel_version: "6.8.0".to_string(),
                    architecture: "amd64".to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_readiness_from_condition() {
        assert_eq!(NodeData::summary(&node("True")).status, "Ready");
        assert_eq!(NodeData::summary(&node("Unknown")).status, "NotReady");
    }

    #[test]
    fn test_summary_hides_system_info() {
        let json = serde_json::to_value(NodeData::summary(&node("True"))).unwrap();
        assert_eq!(json, serde_json::json!({"name": "worker-1", "status": "Ready"}));
    }

    #[test]
    fn test_detail_includes_system_info() {
        let data = NodeData::detail(&node("True"));
        assert_eq!(data.kubernetes_version, "v1.31.2");
        assert_eq!(data.os, "Ubuntu 24.04");
        assert_eq!(data.architecture, "amd64");
    }
}
