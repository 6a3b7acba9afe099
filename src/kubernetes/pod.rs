//! Pod tools

use k8s_openapi::api::core::v1::{Container, Pod, PodSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, LogParams};
use kube::ResourceExt;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use super::parse::{build_containers, labels_or_default};
use super::registry::ToolDefinition;
use super::update::Family;
use super::{
    create_object, delete_object, get_object, list_all_namespaces, list_objects, render,
    update_object, ToolArgs, ToolContext,
};
use crate::error::{Result, ToolError};

const KIND: &str = "pod";
const DEFAULT_TAIL_LINES: i64 = 100;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodData {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub container_names: Vec<String>,
}

impl PodData {
    pub fn summary(pod: &Pod) -> Self {
        Self {
            name: pod.name_any(),
            namespace: pod.namespace().unwrap_or_default(),
            status: pod
                .status
                .as_ref()
                .and_then(|s| s.phase.clone())
                .unwrap_or_default(),
            labels: pod.labels().clone(),
            ..Default::default()
        }
    }

    pub fn detail(pod: &Pod) -> Self {
        Self {
            container_names: pod
                .spec
                .iter()
                .flat_map(|spec| spec.containers.iter().map(|c| c.name.clone()))
                .collect(),
            ..Self::summary(pod)
        }
    }
}

pub fn build_pod(
    namespace: &str,
    name: &str,
    labels: BTreeMap<String, String>,
    containers: Vec<Container>,
) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels),
            ..Default::default()
        },
        spec: Some(PodSpec {
            containers,
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn namespace_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("namespace", "Provide namespace for pod")
}

fn name_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("name", "Provide name for pod")
}

pub async fn list_in_namespace(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let selector = args.get_string("label", "");
    let api: Api<Pod> = Api::namespaced(ctx.client().await?, &ns);
    let pods = list_objects(&api, &selector, format!("Error in listing pods in {ns}")).await?;
    render(&pods.iter().map(PodData::summary).collect::<Vec<_>>())
}

pub async fn list(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let selector = args.get_string("label", "");
    let pods: Vec<Pod> = list_all_namespaces(&ctx.client().await?, &selector, KIND).await?;
    render(&pods.iter().map(PodData::summary).collect::<Vec<_>>())
}

pub async fn get(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<Pod> = Api::namespaced(ctx.client().await?, &ns);
    let pod = get_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    render(&PodData::detail(&pod))
}

pub async fn delete(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<Pod> = Api::namespaced(ctx.client().await?, &ns);
    delete_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    info!(namespace = %ns, name = %name, "Pod deleted");
    Ok(format!("Pod {ns}/{name} is deleted"))
}

pub async fn update(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    args.require_string("label", "Provide label for pod")?;
    let api: Api<Pod> = Api::namespaced(ctx.client().await?, &ns);
    update_object(&api, &name, KIND, &format!("{ns}/{name}"), &args, &[Family::Label]).await
}

pub async fn create(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let label = args.get_string("label", "");
    let names = args.require_string("containerNames", "Provide container name for pod")?;
    let images = args.require_string("containerImages", "Provide image for pod")?;
    let ports = args.get_string("containerPorts", "http:8080");

    let containers = build_containers(&names, &images, &ports)?;
    let pod = build_pod(&ns, &name, labels_or_default(&label, &name), containers);

    let target = format!("{ns}/{name}");
    let api: Api<Pod> = Api::namespaced(ctx.client().await?, &ns);
    create_object(&api, &pod, KIND, &target).await?;
    info!(pod = %target, "Pod created");
    Ok(format!("Successfully pod {target} is created"))
}

pub async fn logs(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let container = args.require_string("containerName", "Provide container name for pod")?;
    let tail_lines = args.get_int("tailLine", DEFAULT_TAIL_LINES);

    let api: Api<Pod> = Api::namespaced(ctx.client().await?, &ns);
    let params = LogParams {
        container: Some(container),
        tail_lines: Some(tail_lines),
        ..Default::default()
    };
    api.logs(&name, &params)
        .await
        .map_err(|e| ToolError::api(format!("Error in streaming the log for pod {ns}/{name}"), e))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list-pod-in-namespace",
            "List the pod in particular namespace with status, label and instance",
            tool_handler!(list_in_namespace),
        )
        .required("namespace", "The namespace in which the pod should be listed")
        .optional("label", "Only return pods matching this label selector"),
        ToolDefinition::new(
            "list-pod",
            "List the pod in all namespaces with status, label and instance",
            tool_handler!(list),
        )
        .optional("label", "Only return pods matching this label selector"),
        ToolDefinition::new(
            "get-pod",
            "Get the pod in particular namespace with status, label and instance",
            tool_handler!(get),
        )
        .required("namespace", "The namespace in which the pod exists")
        .required("name", "The name of the pod to get details"),
        ToolDefinition::new(
            "delete-pod",
            "Delete the pod in particular namespace",
            tool_handler!(delete),
        )
        .required("namespace", "The namespace in which the pod to be deleted")
        .required("name", "The name of the pod to be deleted"),
        ToolDefinition::new(
            "update-pod",
            "Update the pod in particular namespace like label changes",
            tool_handler!(update),
        )
        .required("namespace", "The namespace in which the pod to be updated")
        .required("name", "Name of the pod to be updated")
        .required("label", "Label to be updated"),
        ToolDefinition::new(
            "create-pod",
            "Create the pod in particular namespace",
            tool_handler!(create),
        )
        .required("namespace", "The namespace in which the pod to be created")
        .required("name", "Name of the pod to be created")
        .optional("label", "Label to be added in that pod")
        .required("containerNames", "Container Names for the pod")
        .required("containerImages", "Container Image for the pod")
        .optional(
            "containerPorts",
            "Container port details for the pod, like http:8080|metrics:9090 per container",
        ),
        ToolDefinition::new(
            "pod-log",
            "Get the log for particular pod in the namespace",
            tool_handler!(logs),
        )
        .required("namespace", "The namespace in which the pod is present")
        .required("name", "Name of the pod to get log")
        .number("tailLine", "Number of log line to get")
        .required("containerName", "Container Names for the pod to get log"),
    ]
}
