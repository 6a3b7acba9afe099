//! Namespace tools

use k8s_openapi::api::core::v1::Namespace;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::Api;
use kube::ResourceExt;
use serde::Serialize;
use tracing::info;

use super::parse::parse_key_values;
use super::registry::ToolDefinition;
use super::update::METADATA;
use super::{
    create_object, delete_object, get_object, list_objects, render, update_object, ToolArgs,
    ToolContext,
};
use crate::error::Result;

const KIND: &str = "namespace";

#[derive(Debug, Default, Serialize)]
pub struct NamespaceData {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
}

impl From<&Namespace> for NamespaceData {
    fn from(namespace: &Namespace) -> Self {
        Self {
            name: namespace.name_any(),
            status: namespace
                .status
                .as_ref()
                .and_then(|s| s.phase.clone())
                .unwrap_or_default(),
        }
    }
}

fn name_arg(args: &ToolArgs, action: &str) -> Result<String> {
    args.require_string("name", &format!("Provide namespace name to {action}"))
}

pub async fn list(ctx: ToolContext, _args: ToolArgs) -> Result<String> {
    let api: Api<Namespace> = Api::all(ctx.client().await?);
    let namespaces = list_objects(&api, "", "Error in listing namespace".to_string()).await?;
    render(&namespaces.iter().map(NamespaceData::from).collect::<Vec<_>>())
}

pub async fn get(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let name = name_arg(&args, "get")?;
    let api: Api<Namespace> = Api::all(ctx.client().await?);
    let namespace = get_object(&api, &name, KIND, &name).await?;
    render(&NamespaceData::from(&namespace))
}

pub async fn delete(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let name = name_arg(&args, "delete")?;
    let api: Api<Namespace> = Api::all(ctx.client().await?);
    delete_object(&api, &name, KIND, &name).await?;
    info!(namespace = %name, "Namespace deleted");
    Ok(format!("Namespace {name} is deleted"))
}

pub async fn update(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let name = name_arg(&args, "update")?;
    let api: Api<Namespace> = Api::all(ctx.client().await?);
    update_object(&api, &name, KIND, &name, &args, METADATA).await
}

pub async fn create(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let name = name_arg(&args, "create")?;
    let labels = parse_key_values(&args.get_string("label", ""));

    let namespace = Namespace {
        metadata: ObjectMeta {
            name: Some(name.clone()),
            labels: Some(labels),
            ..Default::default()
        },
        ..Default::default()
    };

    let api: Api<Namespace> = Api::all(ctx.client().await?);
    create_object(&api, &namespace, KIND, &name).await?;
    info!(namespace = %name, "Namespace created");
    Ok(format!("Successfully namespace {name} is created"))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list-ns",
            "List the namespace in the kubernetes cluster with status",
            tool_handler!(list),
        ),
        ToolDefinition::new(
            "get-ns",
            "Get the particular namespace in the kubernetes cluster with status",
            tool_handler!(get),
        )
        .required("name", "The name of the namespace to get details for"),
        ToolDefinition::new(
            "delete-ns",
            "Delete the particular namespace in the kubernetes cluster",
            tool_handler!(delete),
        )
        .required("name", "The name of the namespace to be deleted"),
        ToolDefinition::new(
            "update-ns",
            "Update the namespace like label and annotation changes",
            tool_handler!(update),
        )
        .required("name", "Name of the namespace to be updated")
        .optional("label", "Label to be updated")
        .optional("annotation", "Annotation to be updated"),
        ToolDefinition::new("create-ns", "Create the namespace", tool_handler!(create))
            .required("name", "Name of the namespace to be created")
            .optional("label", "Label to be added in the namespace"),
    ]
}
