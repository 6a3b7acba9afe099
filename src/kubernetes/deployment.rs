//! Deployment tools

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::Container;
use kube::api::Api;
use std::collections::BTreeMap;
use tracing::info;

use super::parse::{build_containers, labels_or_default};
use super::registry::ToolDefinition;
use super::update::WORKLOAD_WITH_REPLICAS;
use super::workload::{object_meta, pod_template, selector, WorkloadData};
use super::{
    create_object, delete_object, get_object, list_all_namespaces, list_objects, render,
    update_object, ToolArgs, ToolContext,
};
use crate::error::Result;

const KIND: &str = "deployment";

fn summary(deployment: &Deployment) -> WorkloadData {
    let desired = deployment
        .spec
        .as_ref()
        .and_then(|s| s.replicas)
        .unwrap_or(1);
    let ready = deployment
        .status
        .as_ref()
        .and_then(|s| s.ready_replicas)
        .unwrap_or(0);
    WorkloadData::summary(deployment, ready, desired)
}

fn detail(deployment: &Deployment) -> WorkloadData {
    summary(deployment).with_containers(
        deployment
            .spec
            .as_ref()
            .and_then(|s| s.template.spec.as_ref()),
    )
}

pub fn build_deployment(
    namespace: &str,
    name: &str,
    replicas: i32,
    labels: BTreeMap<String, String>,
    containers: Vec<Container>,
) -> Deployment {
    Deployment {
        metadata: object_meta(namespace, name, &labels),
        spec: Some(DeploymentSpec {
            replicas: Some(replicas),
            selector: selector(&labels),
            template: pod_template(&labels, containers),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn namespace_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("namespace", "Provide namespace for deployment")
}

fn name_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("name", "Provide name for deployment")
}

pub async fn list_in_namespace(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let selector = args.get_string("label", "");
    let api: Api<Deployment> = Api::namespaced(ctx.client().await?, &ns);
    let deployments =
        list_objects(&api, &selector, format!("Error in listing deployment in {ns}")).await?;
    render(&deployments.iter().map(summary).collect::<Vec<_>>())
}

pub async fn list(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let selector = args.get_string("label", "");
    let deployments: Vec<Deployment> =
        list_all_namespaces(&ctx.client().await?, &selector, KIND).await?;
    render(&deployments.iter().map(summary).collect::<Vec<_>>())
}

pub async fn get(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<Deployment> = Api::namespaced(ctx.client().await?, &ns);
    let deployment = get_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    render(&detail(&deployment))
}

pub async fn delete(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<Deployment> = Api::namespaced(ctx.client().await?, &ns);
    delete_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    info!(namespace = %ns, name = %name, "Deployment deleted");
    Ok(format!("Deployment {ns}/{name} is deleted"))
}

pub async fn update(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<Deployment> = Api::namespaced(ctx.client().await?, &ns);
    update_object(&api, &name, KIND, &format!("{ns}/{name}"), &args, WORKLOAD_WITH_REPLICAS).await
}

pub async fn create(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let label = args.get_string("label", "");
    let replicas = args.get_int("replica", 1) as i32;
    let names = args.require_string("containerNames", "Provide container name for deployment")?;
    let images = args.require_string("containerImages", "Provide images for deployment")?;
    let ports = args.get_string("containerPorts", "");

    let containers = build_containers(&names, &images, &ports)?;
    let deployment = build_deployment(
        &ns,
        &name,
        replicas,
        labels_or_default(&label, &name),
        containers,
    );

    let target = format!("{ns}/{name}");
    let api: Api<Deployment> = Api::namespaced(ctx.client().await?, &ns);
    create_object(&api, &deployment, KIND, &target).await?;
    info!(deployment = %target, replicas, "Deployment created");
    Ok(format!("Successfully deployment {target} is created"))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list-deployment-in-namespace",
            "List the deployment in particular namespace with available instance and label",
            tool_handler!(list_in_namespace),
        )
        .required("namespace", "The namespace in which the deployment should be listed")
        .optional("label", "The deployment should be listed only if this particular label exists"),
        ToolDefinition::new(
            "list-deployment",
            "List the deployment in all namespaces with available instance and label",
            tool_handler!(list),
        )
        .optional("label", "The deployment should be listed only if this particular label exists"),
        ToolDefinition::new(
            "get-deployment",
            "Get the deployment in particular namespace with available instance and label",
            tool_handler!(get),
        )
        .required("namespace", "The namespace to get the deployment")
        .required("name", "Name of the deployment to get"),
        ToolDefinition::new(
            "delete-deployment",
            "Delete the deployment in particular namespace",
            tool_handler!(delete),
        )
        .required("namespace", "The namespace in which the deployment to be deleted")
        .required("name", "Name of the deployment to be deleted"),
        ToolDefinition::new(
            "update-deployment",
            "Update the deployment in particular namespace like label, annotation, replica and image changes",
            tool_handler!(update),
        )
        .required("namespace", "The namespace in which the deployment to be updated")
        .required("name", "Name of the deployment to be updated")
        .optional("label", "Label to be updated")
        .optional("annotation", "Annotation to be updated")
        .number("replica", "Replica to be updated")
        .optional("containerName", "Container Name to update the image")
        .optional("image", "Image to be updated"),
        ToolDefinition::new(
            "create-deployment",
            "Create the deployment in particular namespace",
            tool_handler!(create),
        )
        .required("namespace", "The namespace in which the deployment to be created")
        .required("name", "Name of the deployment to be created")
        .optional("label", "Label to be added in that deployment")
        .number("replica", "Number of replica")
        .required("containerNames", "Container Names for the deployment")
        .required("containerImages", "Container Image for the deployment")
        .optional("containerPorts", "Container port details for the deployment"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::apps::v1::DeploymentStatus;

    #[test]
    fn test_build_deployment_wires_labels_into_selector() {
        let containers = build_containers("app", "nginx:latest", "").unwrap();
        let deployment =
            build_deployment("default", "web", 3, labels_or_default("", "web"), containers);

        let spec = deployment.spec.unwrap();
        assert_eq!(spec.replicas, Some(3));
        assert_eq!(spec.selector.match_labels.unwrap()["app"], "web");
        let template_labels = spec.template.metadata.unwrap().labels.unwrap();
        assert_eq!(template_labels["app"], "web");
        assert_eq!(deployment.metadata.labels.unwrap()["app"], "web");
    }

    #[test]
    fn test_available_instance_ratio() {
        let containers = build_containers("app", "nginx:latest", "").unwrap();
        let mut deployment =
            build_deployment("default", "web", 3, labels_or_default("", "web"), containers);
        deployment.status = Some(DeploymentStatus {
            ready_replicas: Some(2),
            ..Default::default()
        });

        let data = detail(&deployment);
        assert_eq!(data.available_instance, "2/3");
        assert_eq!(data.container_name, vec!["app"]);
        assert_eq!(data.container_image, vec!["nginx:latest"]);

        let json = serde_json::to_value(summary(&deployment)).unwrap();
        assert_eq!(json["availableInstance"], "2/3");
        assert!(json.get("containerName").is_none());
    }
}
