//! ClusterRoleBinding tools

use k8s_openapi::api::rbac::v1::ClusterRoleBinding;
use kube::api::Api;

use super::registry::ToolDefinition;
use super::rolebinding::BindingData;
use super::{get_object, list_objects, render, ToolArgs, ToolContext};
use crate::error::Result;

const KIND: &str = "clusterrolebinding";

pub async fn list(ctx: ToolContext, _args: ToolArgs) -> Result<String> {
    let api: Api<ClusterRoleBinding> = Api::all(ctx.client().await?);
    let bindings = list_objects(&api, "", "Error in listing clusterrolebinding".to_string()).await?;
    render(&bindings.iter().map(BindingData::summary).collect::<Vec<_>>())
}

pub async fn get(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let name = args.require_string("name", "Provide name for clusterrolebinding")?;
    let api: Api<ClusterRoleBinding> = Api::all(ctx.client().await?);
    let binding = get_object(&api, &name, KIND, &name).await?;
    render(&BindingData::detail(&binding, &binding.role_ref, binding.subjects.as_ref()))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list-clusterrolebinding",
            "List all the clusterrolebinding in the cluster",
            tool_handler!(list),
        ),
        ToolDefinition::new(
            "get-clusterrolebinding",
            "Get the particular clusterrolebinding with role reference and subjects",
            tool_handler!(get),
        )
        .required("name", "Name of the clusterrolebinding to get"),
    ]
}
