//! RoleBinding tools and the binding projection shared with cluster role
//! bindings.

use k8s_openapi::api::rbac::v1::{RoleBinding, RoleRef, Subject};
use kube::api::Api;
use kube::{Resource, ResourceExt};
use serde::Serialize;

use super::registry::ToolDefinition;
use super::{get_object, list_all_namespaces, list_objects, render, ToolArgs, ToolContext};
use crate::error::Result;

const KIND: &str = "rolebinding";

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRefData {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_group: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectData {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_group: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

impl From<&RoleRef> for RoleRefData {
    fn from(role_ref: &RoleRef) -> Self {
        Self {
            api_group: role_ref.api_group.clone(),
            kind: role_ref.kind.clone(),
            name: role_ref.name.clone(),
        }
    }
}

impl From<&Subject> for SubjectData {
    fn from(subject: &Subject) -> Self {
        Self {
            api_group: subject.api_group.clone().unwrap_or_default(),
            kind: subject.kind.clone(),
            name: subject.name.clone(),
            namespace: subject.namespace.clone().unwrap_or_default(),
        }
    }
}

/// List output leaves `roleRef` out entirely instead of emitting `{}`.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingData {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_ref: Option<RoleRefData>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<SubjectData>,
}

impl BindingData {
    pub fn summary<K: Resource>(binding: &K) -> Self {
        Self {
            name: binding.name_any(),
            namespace: binding.namespace().unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn detail<K: Resource>(binding: &K, role_ref: &RoleRef, subjects: Option<&Vec<Subject>>) -> Self {
        Self {
            role_ref: Some(RoleRefData::from(role_ref)),
            subjects: subjects.into_iter().flatten().map(SubjectData::from).collect(),
            ..Self::summary(binding)
        }
    }
}

fn namespace_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("namespace", "Provide namespace for rolebinding")
}

pub async fn list_in_namespace(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let api: Api<RoleBinding> = Api::namespaced(ctx.client().await?, &ns);
    let bindings = list_objects(&api, "", format!("Error in listing rolebinding in {ns}")).await?;
    render(&bindings.iter().map(BindingData::summary).collect::<Vec<_>>())
}

pub async fn list(ctx: ToolContext, _args: ToolArgs) -> Result<String> {
    let bindings: Vec<RoleBinding> = list_all_namespaces(&ctx.client().await?, "", KIND).await?;
    render(&bindings.iter().map(BindingData::summary).collect::<Vec<_>>())
}

pub async fn get(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = args.require_string("name", "Provide name for rolebinding")?;
    let api: Api<RoleBinding> = Api::namespaced(ctx.client().await?, &ns);
    let binding = get_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    render(&BindingData::detail(&binding, &binding.role_ref, binding.subjects.as_ref()))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list-rolebinding-in-namespace",
            "List the rolebinding in particular namespace",
            tool_handler!(list_in_namespace),
        )
        .required("namespace", "Namespace of the rolebinding to list"),
        ToolDefinition::new(
            "list-rolebinding",
            "List the rolebinding in all namespaces",
            tool_handler!(list),
        ),
        ToolDefinition::new(
            "get-rolebinding",
            "Get the rolebinding in particular namespace with role reference and subjects",
            tool_handler!(get),
        )
        .required("namespace", "Namespace of the rolebinding to get")
        .required("name", "Name of the rolebinding to get"),
    ]
}
