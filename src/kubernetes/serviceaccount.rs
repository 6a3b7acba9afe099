//! ServiceAccount tools

use k8s_openapi::api::core::v1::ServiceAccount;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
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

const KIND: &str = "service account";

#[derive(Debug, Default, Serialize)]
pub struct ServiceAccountData {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl From<&ServiceAccount> for ServiceAccountData {
    fn from(account: &ServiceAccount) -> Self {
        Self {
            name: account.name_any(),
            namespace: account.namespace().unwrap_or_default(),
            labels: account.labels().clone(),
        }
    }
}

pub fn build_service_account(
    namespace: &str,
    name: &str,
    labels: BTreeMap<String, String>,
) -> ServiceAccount {
    ServiceAccount {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: (!labels.is_empty()).then_some(labels),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn namespace_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("namespace", "Provide namespace for service account")
}

fn name_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("name", "Provide name for service account")
}

fn project(accounts: &[ServiceAccount]) -> Vec<ServiceAccountData> {
    accounts.iter().map(ServiceAccountData::from).collect()
}

pub async fn list_in_namespace(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let selector = args.get_string("label", "");
    let api: Api<ServiceAccount> = Api::namespaced(ctx.client().await?, &ns);
    let accounts =
        list_objects(&api, &selector, format!("Error in listing service account in {ns}")).await?;
    render(&project(&accounts))
}

pub async fn list(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let selector = args.get_string("label", "");
    let accounts: Vec<ServiceAccount> =
        list_all_namespaces(&ctx.client().await?, &selector, KIND).await?;
    render(&project(&accounts))
}

pub async fn get(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<ServiceAccount> = Api::namespaced(ctx.client().await?, &ns);
    let account = get_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    render(&ServiceAccountData::from(&account))
}

pub async fn delete(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<ServiceAccount> = Api::namespaced(ctx.client().await?, &ns);
    delete_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    info!(namespace = %ns, name = %name, "ServiceAccount deleted");
    Ok(format!("ServiceAccount {ns}/{name} is deleted"))
}

pub async fn create(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let name = args.require_string("name", "Provide name to create Service account")?;
    let ns = args.require_string("namespace", "Provide namespace to create Service account")?;
    let labels = parse_key_values(&args.get_string("label", ""));

    let account = build_service_account(&ns, &name, labels);

    let target = format!("{ns}/{name}");
    let api: Api<ServiceAccount> = Api::namespaced(ctx.client().await?, &ns);
    create_object(&api, &account, KIND, &target).await?;
    info!(service_account = %target, "ServiceAccount created");
    Ok(format!("Successfully serviceAccount {target} is created"))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list-serviceAccount",
            "List the serviceAccount in all the namespaces",
            tool_handler!(list),
        )
        .optional(
            "label",
            "Label of the serviceAccount, if we need to list the service account with particular label",
        ),
        ToolDefinition::new(
            "list-serviceAccount-in-namepsace",
            "List the serviceAccount in particular namespace",
            tool_handler!(list_in_namespace),
        )
        .required("namespace", "Namespace of the serviceAccount to be listed")
        .optional(
            "label",
            "Label of the serviceAccount, if we need to list the service account with particular label",
        ),
        ToolDefinition::new(
            "get-serviceAccount",
            "Get the serviceAccount in particular namespace",
            tool_handler!(get),
        )
        .required("namespace", "Namespace of the serviceAccount to get")
        .required("name", "Name of the serviceAccount to get"),
        ToolDefinition::new(
            "delete-serviceAccount",
            "Delete the serviceAccount in particular namespace",
            tool_handler!(delete),
        )
        .required("namespace", "Namespace of the serviceAccount to delete")
        .required("name", "Name of the serviceAccount to delete"),
        ToolDefinition::new(
            "create-serviceAccount",
            "Create the serviceAccount in particular namespace",
            tool_handler!(create),
        )
        .required("namespace", "Namespace of the serviceAccount to be created")
        .required("name", "Name of the serviceAccount to be created")
        .optional(
            "label",
            "Label of the serviceAccount, if we need to create the service account with particular label",
        ),
    ]
}
