//! DaemonSet tools

use k8s_openapi::api::apps::v1::{DaemonSet, DaemonSetSpec};
use k8s_openapi::api::core::v1::Container;
use kube::api::Api;
use std::collections::BTreeMap;
use tracing::info;

use super::parse::{build_containers, labels_or_default};
use super::registry::ToolDefinition;
use super::update::WORKLOAD;
use super::workload::{object_meta, pod_template, selector, WorkloadData};
use super::{
    create_object, delete_object, get_object, list_all_namespaces, list_objects, render,
    update_object, ToolArgs, ToolContext,
};
use crate::error::Result;

const KIND: &str = "daemonset";

fn summary(daemonset: &DaemonSet) -> WorkloadData {
    let (ready, scheduled) = daemonset
        .status
        .as_ref()
        .map(|s| (s.number_ready, s.updated_number_scheduled.unwrap_or(0)))
        .unwrap_or((0, 0));
    WorkloadData::summary(daemonset, ready, scheduled)
}

fn detail(daemonset: &DaemonSet) -> WorkloadData {
    summary(daemonset).with_containers(
        daemonset
            .spec
            .as_ref()
            .and_then(|s| s.template.spec.as_ref()),
    )
}

pub fn build_daemonset(
    namespace: &str,
    name: &str,
    labels: BTreeMap<String, String>,
    containers: Vec<Container>,
) -> DaemonSet {
    DaemonSet {
        metadata: object_meta(namespace, name, &labels),
        spec: Some(DaemonSetSpec {
            selector: selector(&labels),
            template: pod_template(&labels, containers),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn namespace_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("namespace", "Provide namespace for daemonset")
}

fn name_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("name", "Provide name for daemonset")
}

pub async fn list_in_namespace(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let selector = args.get_string("label", "");
    let api: Api<DaemonSet> = Api::namespaced(ctx.client().await?, &ns);
    let daemonsets =
        list_objects(&api, &selector, format!("Error in listing daemonset in {ns}")).await?;
    render(&daemonsets.iter().map(summary).collect::<Vec<_>>())
}

pub async fn list(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let selector = args.get_string("label", "");
    let daemonsets: Vec<DaemonSet> =
        list_all_namespaces(&ctx.client().await?, &selector, KIND).await?;
    render(&daemonsets.iter().map(summary).collect::<Vec<_>>())
}

pub async fn get(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<DaemonSet> = Api::namespaced(ctx.client().await?, &ns);
    let daemonset = get_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    render(&detail(&daemonset))
}

pub async fn delete(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<DaemonSet> = Api::namespaced(ctx.client().await?, &ns);
    delete_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    info!(namespace = %ns, name = %name, "DaemonSet deleted");
    Ok(format!("Daemonset {ns}/{name} is deleted"))
}

pub async fn update(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<DaemonSet> = Api::namespaced(ctx.client().await?, &ns);
    update_object(&api, &name, KIND, &format!("{ns}/{name}"), &args, WORKLOAD).await
}

pub async fn create(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let label = args.get_string("label", "");
    let names = args.require_string("containerNames", "Provide container name for daemonset")?;
    let images = args.require_string("containerImages", "Provide image for daemonset")?;
    let ports = args.get_string("containerPorts", "");

    let containers = build_containers(&names, &images, &ports)?;
    let daemonset = build_daemonset(&ns, &name, labels_or_default(&label, &name), containers);

    let target = format!("{ns}/{name}");
    let api: Api<DaemonSet> = Api::namespaced(ctx.client().await?, &ns);
    create_object(&api, &daemonset, KIND, &target).await?;
    info!(daemonset = %target, "DaemonSet created");
    Ok(format!("Successfully daemonset {target} is created"))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list-daemonset-in-namespace",
            "List the daemonset in particular namespace with available instance and label",
            tool_handler!(list_in_namespace),
        )
        .required("namespace", "The namespace in which the daemonset should be listed")
        .optional("label", "The daemonset should be listed only if this particular label exists"),
        ToolDefinition::new(
            "list-daemonset",
            "List the daemonset in all namespaces with available instance and label",
            tool_handler!(list),
        )
        .optional("label", "Get the daemonset only if this particular label exists"),
        ToolDefinition::new(
            "get-daemonset",
            "Get the daemonset in particular namespace with available instance and label",
            tool_handler!(get),
        )
        .required("namespace", "The namespace to get the daemonset")
        .required("name", "Name of the daemonset to get"),
        ToolDefinition::new(
            "delete-daemonset",
            "Delete the daemonset in particular namespace",
            tool_handler!(delete),
        )
        .required("namespace", "The namespace in which the daemonset to be deleted")
        .required("name", "Name of the daemonset to be deleted"),
        ToolDefinition::new(
            "update-daemonset",
            "Update the daemonset in particular namespace like label, annotation and image changes",
            tool_handler!(update),
        )
        .required("namespace", "The namespace in which the daemonset to be updated")
        .required("name", "Name of the daemonset to be updated")
        .optional("label", "Label to be updated")
        .optional("annotation", "Annotation to be updated")
        .optional("containerName", "Container Name to update the image")
        .optional("image", "Image to be updated"),
        ToolDefinition::new(
            "create-daemonset",
            "Create the daemonset in particular namespace",
            tool_handler!(create),
        )
        .required("namespace", "The namespace in which the daemonset to be created")
        .required("name", "Name of the daemonset to be created")
        .optional("label", "Label to be added in that daemonset")
        .required("containerNames", "Container Names for the daemonset")
        .required("containerImages", "Container Image for the daemonset")
        .optional("containerPorts", "Container port details for the daemonset"),
    ]
}
