//! Secret tools. Values come back base64 encoded.

use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use kube::api::Api;
use kube::ResourceExt;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use super::parse::parse_key_values;
use super::registry::ToolDefinition;
use super::{
    create_object, delete_object, get_object, list_all_namespaces, list_objects, render, ToolArgs,
    ToolContext,
};
use crate::error::Result;

const KIND: &str = "secret";
const OPAQUE: &str = "Opaque";

#[derive(Debug, Default, Serialize)]
pub struct SecretData {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, ByteString>,
}

impl SecretData {
    pub fn summary(secret: &Secret) -> Self {
        Self {
            name: secret.name_any(),
            namespace: secret.namespace().unwrap_or_default(),
            data: BTreeMap::new(),
        }
    }

    pub fn detail(secret: &Secret) -> Self {
        Self {
            data: secret.data.clone().unwrap_or_default(),
            ..Self::summary(secret)
        }
    }
}

pub fn build_secret(namespace: &str, name: &str, data: BTreeMap<String, String>) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        string_data: Some(data),
        type_: Some(OPAQUE.to_string()),
        ..Default::default()
    }
}

fn namespace_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("namespace", "Provide namespace for secret")
}

fn name_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("name", "Provide name for secret")
}

pub async fn list_in_namespace(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let api: Api<Secret> = Api::namespaced(ctx.client().await?, &ns);
    let secrets = list_objects(&api, "", format!("Error in listing secret in {ns}")).await?;
    render(&secrets.iter().map(SecretData::summary).collect::<Vec<_>>())
}

pub async fn list(ctx: ToolContext, _args: ToolArgs) -> Result<String> {
    let secrets: Vec<Secret> = list_all_namespaces(&ctx.client().await?, "", KIND).await?;
    render(&secrets.iter().map(SecretData::summary).collect::<Vec<_>>())
}

pub async fn get(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<Secret> = Api::namespaced(ctx.client().await?, &ns);
    let secret = get_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    render(&SecretData::detail(&secret))
}

pub async fn delete(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = args.require_string("namespace", "Provide namespace for secret delete")?;
    let name = args.require_string("name", "Provide name for secret delete")?;
    let api: Api<Secret> = Api::namespaced(ctx.client().await?, &ns);
    delete_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    info!(namespace = %ns, name = %name, "Secret deleted");
    Ok(format!("Secret {ns}/{name} is deleted"))
}

pub async fn create(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = args.require_string("namespace", "Provide namespace for secret creation")?;
    let name = args.require_string("name", "Provide name for secret creation")?;
    let data = args.require_string(
        "data",
        "Provide datas for secret creation like password=kubernetes123,username=kubernetes",
    )?;

    let secret = build_secret(&ns, &name, parse_key_values(&data));

    let target = format!("{ns}/{name}");
    let api: Api<Secret> = Api::namespaced(ctx.client().await?, &ns);
    create_object(&api, &secret, KIND, &target).await?;
    // keys only; values never reach the log
    info!(secret = %target, keys = secret.string_data.as_ref().map_or(0, |d| d.len()), "Secret created");
    Ok(format!("Successfully secret {target} is created"))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list-secret-in-namespace",
            "List the secret in particular namespace",
            tool_handler!(list_in_namespace),
        )
        .required("namespace", "The namespace in which the secret should be listed"),
        ToolDefinition::new(
            "list-secret",
            "List the secret in all namespaces",
            tool_handler!(list),
        ),
        ToolDefinition::new(
            "get-secret",
            "Get the secret in particular namespace with data",
            tool_handler!(get),
        )
        .required("namespace", "The namespace in which the secret to get")
        .required("name", "Name of the secret to get"),
        ToolDefinition::new(
            "delete-secret",
            "Delete the secret in particular namespace",
            tool_handler!(delete),
        )
        .required("namespace", "The namespace in which the secret to be deleted")
        .required("name", "Name of the secret to be deleted"),
        ToolDefinition::new(
            "create-secret",
            "Create the secret in particular namespace",
            tool_handler!(create),
        )
        .required("namespace", "The namespace in which the secret to be created")
        .required("name", "Name of the secret to be created")
        .required("data", "Data of the secret, like password=kubernetes123,username=kubernetes"),
    ]
}
