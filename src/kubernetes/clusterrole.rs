//! ClusterRole tools

use k8s_openapi::api::rbac::v1::ClusterRole;
use kube::api::Api;

use super::registry::ToolDefinition;
use super::role::RoleData;
use super::{get_object, list_objects, render, ToolArgs, ToolContext};
use crate::error::Result;

const KIND: &str = "clusterrole";

pub async fn list(ctx: ToolContext, _args: ToolArgs) -> Result<String> {
    let api: Api<ClusterRole> = Api::all(ctx.client().await?);
    let roles = list_objects(&api, "", "Error in listing clusterrole".to_string()).await?;
    render(&roles.iter().map(RoleData::summary).collect::<Vec<_>>())
}

pub async fn get(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let name = args.require_string("name", "Provide name for clusterrole")?;
    let api: Api<ClusterRole> = Api::all(ctx.client().await?);
    let role = get_object(&api, &name, KIND, &name).await?;
    render(&RoleData::detail(&role, role.rules.as_ref()))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list-clusterrole",
            "List all the clusterrole in the cluster",
            tool_handler!(list),
        ),
        ToolDefinition::new(
            "get-clusterrole",
            "Get the particular clusterrole with rules",
            tool_handler!(get),
        )
        .required("name", "Name of the clusterrole to get"),
    ]
}
