//! Role tools and the rule projection shared with cluster roles.

use k8s_openapi::api::rbac::v1::{PolicyRule, Role};
use kube::api::Api;
use kube::{Resource, ResourceExt};
use serde::Serialize;

use super::registry::ToolDefinition;
use super::{get_object, list_all_namespaces, list_objects, render, ToolArgs, ToolContext};
use crate::error::Result;

const KIND: &str = "role";

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleData {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub api_groups: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub verbs: Vec<String>,
}

impl From<&PolicyRule> for RuleData {
    fn from(rule: &PolicyRule) -> Self {
        Self {
            api_groups: rule.api_groups.clone().unwrap_or_default(),
            resources: rule.resources.clone().unwrap_or_default(),
            verbs: rule.verbs.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct RoleData {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleData>,
}

impl RoleData {
    pub fn summary<K: Resource>(role: &K) -> Self {
        Self {
            name: role.name_any(),
            namespace: role.namespace().unwrap_or_default(),
            rules: Vec::new(),
        }
    }

    pub fn detail<K: Resource>(role: &K, rules: Option<&Vec<PolicyRule>>) -> Self {
        Self {
            rules: rules.into_iter().flatten().map(RuleData::from).collect(),
            ..Self::summary(role)
        }
    }
}

fn namespace_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("namespace", "Provide namespace for role")
}

pub async fn list_in_namespace(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let api: Api<Role> = Api::namespaced(ctx.client().await?, &ns);
    let roles = list_objects(&api, "", format!("Error in listing role in {ns}")).await?;
    render(&roles.iter().map(RoleData::summary).collect::<Vec<_>>())
}

pub async fn list(ctx: ToolContext, _args: ToolArgs) -> Result<String> {
    let roles: Vec<Role> = list_all_namespaces(&ctx.client().await?, "", KIND).await?;
    render(&roles.iter().map(RoleData::summary).collect::<Vec<_>>())
}

pub async fn get(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = args.require_string("name", "Provide name for role")?;
    let api: Api<Role> = Api::namespaced(ctx.client().await?, &ns);
    let role = get_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    render(&RoleData::detail(&role, role.rules.as_ref()))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list-role-in-namespace",
            "List the role in particular namespace",
            tool_handler!(list_in_namespace),
        )
        .required("namespace", "Namespace of the role to list"),
        ToolDefinition::new("list-role", "List the role in all namespaces", tool_handler!(list)),
        ToolDefinition::new(
            "get-role",
            "Get the role in particular namespace with rules",
            tool_handler!(get),
        )
        .required("namespace", "Namespace of the role to get")
        .required("name", "Name of the role to get"),
    ]
}
