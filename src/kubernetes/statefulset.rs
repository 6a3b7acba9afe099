//! StatefulSet tools
//!
//! `create-statefulset` also creates the governing Service, named after the statefulset,
//! before the statefulset itself.

use k8s_openapi::api::apps::v1::{StatefulSet, StatefulSetSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, PersistentVolumeClaim, PersistentVolumeClaimSpec, Service,
    ServicePort, ServiceSpec, VolumeMount, VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::Api;
use std::collections::BTreeMap;
use tracing::info;

use super::parse::{is_valid_quantity, labels_or_default, DEFAULT_CONTAINER_PORT};
use super::registry::ToolDefinition;
use super::update::WORKLOAD_WITH_REPLICAS;
use super::workload::{object_meta, pod_template, selector, WorkloadData};
use super::{
    create_object, delete_object, get_object, list_all_namespaces, list_objects, render,
    update_object, ToolArgs, ToolContext,
};
use crate::error::{Result, ToolError};

const KIND: &str = "statefulset";

fn summary(statefulset: &StatefulSet) -> WorkloadData {
    let desired = statefulset
        .spec
        .as_ref()
        .and_then(|s| s.replicas)
        .unwrap_or(1);
    let available = statefulset
        .status
        .as_ref()
        .and_then(|s| s.available_replicas)
        .unwrap_or(0);
    WorkloadData::summary(statefulset, available, desired)
}

fn detail(statefulset: &StatefulSet) -> WorkloadData {
    summary(statefulset).with_containers(
        statefulset
            .spec
            .as_ref()
            .and_then(|s| s.template.spec.as_ref()),
    )
}

/// Everything `create-statefulset` needs, after defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct StatefulSetRequest {
    pub namespace: String,
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub container_name: String,
    pub image: String,
    pub container_port: i32,
    pub storage: String,
    pub mount_path: String,
    pub pvc_name: String,
    pub service_type: String,
    pub service_port: i32,
    pub replicas: i32,
}

impl StatefulSetRequest {
    pub fn from_args(args: &ToolArgs) -> Result<Self> {
        let namespace = namespace_arg(args)?;
        let name = name_arg(args)?;
        let image = args.require_string("containerImages", "Provide image for statefulset")?;
        let storage =
            args.require_string("storageValue", "Provide storage value for statefulset")?;
        let mount_path = args.require_string("mountPath", "Provide mount path for statefulset")?;

        if !is_valid_quantity(&storage) {
            return Err(ToolError::Validation(format!(
                "Invalid storage value for statefulset: {storage}"
            )));
        }

        Ok(Self {
            labels: labels_or_default(&args.get_string("label", ""), &name),
            container_name: args.get_string("containerNames", &name),
            container_port: args.get_int("containerPorts", DEFAULT_CONTAINER_PORT.into()) as i32,
            pvc_name: args.get_string("pvcName", &name),
            service_type: args.get_string("svcType", "ClusterIP"),
            service_port: args.get_int("svcPort", 8080) as i32,
            replicas: args.get_int("replica", 1) as i32,
            namespace,
            name,
            image,
            storage,
            mount_path,
        })
    }

    pub fn service(&self) -> Service {
        Service {
            metadata: object_meta(&self.namespace, &self.name, &self.labels),
            spec: Some(ServiceSpec {
                type_: Some(self.service_type.clone()),
                selector: Some(self.labels.clone()),
                ports: Some(vec![ServicePort {
                    name: Some(self.name.clone()),
                    port: self.service_port,
                    target_port: Some(IntOrString::Int(self.container_port)),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn statefulset(&self) -> StatefulSet {
        let container = Container {
            name: self.container_name.clone(),
            image: Some(self.image.clone()),
            ports: Some(vec![ContainerPort {
                name: Some(self.name.clone()),
                container_port: self.container_port,
                ..Default::default()
            }]),
            volume_mounts: Some(vec![VolumeMount {
                name: self.pvc_name.clone(),
                mount_path: self.mount_path.clone(),
                ..Default::default()
            }]),
            ..Default::default()
        };

        let claim = PersistentVolumeClaim {
            metadata: ObjectMeta {
                name: Some(self.pvc_name.clone()),
                ..Default::default()
            },
            spec: Some(PersistentVolumeClaimSpec {
                access_modes: Some(vec!["ReadWriteOnce".to_string()]),
                resources: Some(VolumeResourceRequirements {
                    requests: Some(BTreeMap::from([(
                        "storage".to_string(),
                        Quantity(self.storage.clone()),
                    )])),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        StatefulSet {
            metadata: object_meta(&self.namespace, &self.name, &self.labels),
            spec: Some(StatefulSetSpec {
                replicas: Some(self.replicas),
                service_name: self.name.clone().into(),
                selector: selector(&self.labels),
                template: pod_template(&self.labels, vec![container]),
                volume_claim_templates: Some(vec![claim]),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

fn namespace_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("namespace", "Provide namespace for statefulset")
}

fn name_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("name", "Provide name for statefulset")
}

pub async fn list_in_namespace(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let selector = args.get_string("label", "");
    let api: Api<StatefulSet> = Api::namespaced(ctx.client().await?, &ns);
    let statefulsets =
        list_objects(&api, &selector, format!("Error in listing statefulset in {ns}")).await?;
    render(&statefulsets.iter().map(summary).collect::<Vec<_>>())
}

pub async fn list(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let selector = args.get_string("label", "");
    let statefulsets: Vec<StatefulSet> =
        list_all_namespaces(&ctx.client().await?, &selector, KIND).await?;
    render(&statefulsets.iter().map(summary).collect::<Vec<_>>())
}

pub async fn get(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<StatefulSet> = Api::namespaced(ctx.client().await?, &ns);
    let statefulset = get_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    render(&detail(&statefulset))
}

pub async fn delete(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<StatefulSet> = Api::namespaced(ctx.client().await?, &ns);
    delete_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    info!(namespace = %ns, name = %name, "StatefulSet deleted");
    Ok(format!("Statefulset {ns}/{name} is deleted"))
}

pub async fn update(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<StatefulSet> = Api::namespaced(ctx.client().await?, &ns);
    update_object(&api, &name, KIND, &format!("{ns}/{name}"), &args, WORKLOAD_WITH_REPLICAS).await
}

pub async fn create(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let request = StatefulSetRequest::from_args(&args)?;
    let target = format!("{}/{}", request.namespace, request.name);
    let client = ctx.client().await?;

    let services: Api<Service> = Api::namespaced(client.clone(), &request.namespace);
    create_object(&services, &request.service(), "service for sts", &target).await?;

    let statefulsets: Api<StatefulSet> = Api::namespaced(client, &request.namespace);
    create_object(&statefulsets, &request.statefulset(), KIND, &target).await?;

    info!(statefulset = %target, replicas = request.replicas, "StatefulSet created");
    Ok(format!(
        "Successfully statefulset {} is created with service {}",
        target, request.name
    ))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list-statefulset-in-namespace",
            "List the statefulset in particular namespace with available instance and label",
            tool_handler!(list_in_namespace),
        )
        .required("namespace", "The namespace in which the statefulset should be listed")
        .optional("label", "Get the statefulset only if this particular label exists"),
        ToolDefinition::new(
            "list-statefulset",
            "List the statefulset in all namespaces with available instance and label",
            tool_handler!(list),
        )
        .optional("label", "Get the statefulset only if this particular label exists"),
        ToolDefinition::new(
            "get-statefulset",
            "Get the particular statefulset in particular namespace with available instance and labels",
            tool_handler!(get),
        )
        .required("namespace", "The namespace in which the statefulset exists")
        .required("name", "Name of the statefulset to get"),
        ToolDefinition::new(
            "delete-statefulset",
            "Delete the particular statefulset in particular namespace",
            tool_handler!(delete),
        )
        .required("namespace", "The namespace in which the statefulset to be deleted")
        .required("name", "Name of the statefulset to be deleted"),
        ToolDefinition::new(
            "update-statefulset",
            "Update the statefulset in particular namespace like label, annotation, replica and image changes",
            tool_handler!(update),
        )
        .required("namespace", "The namespace in which the statefulset to be updated")
        .required("name", "Name of the statefulset to be updated")
        .optional("label", "Label to be updated")
        .optional("annotation", "Annotation to be updated")
        .number("replica", "Replica to be updated")
        .optional("containerName", "Container Name to update the image")
        .optional("image", "Image to be updated"),
        ToolDefinition::new(
            "create-statefulset",
            "Create the statefulset in particular namespace",
            tool_handler!(create),
        )
        .required("namespace", "The namespace in which the statefulset to be created")
        .required("name", "Name of the statefulset to be created")
        .optional("label", "Label to be added in that statefulset")
        .optional("containerNames", "Container Name for the statefulset")
        .required("containerImages", "Container Image for the statefulset")
        .number("containerPorts", "Container port for the statefulset")
        .required("storageValue", "Pvc size for the statefulset")
        .required("mountPath", "Mount path for the statefulset container to mount the pvc")
        .optional("pvcName", "Name of the pvc for statefulset")
        .optional("svcType", "Service type for statefulset service")
        .number("svcPort", "Service Port for the statefulset service")
        .number("replica", "Number of replica for statefulset"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args() -> ToolArgs {
        ToolArgs::from([
            ("namespace", json!("data")),
            ("name", json!("pg")),
            ("containerImages", json!("postgres:16")),
            ("containerPorts", json!(5432)),
            ("storageValue", json!("10Gi")),
            ("mountPath", json!("/var/lib/postgresql/data")),
        ])
    }

    #[test]
    fn test_defaults_follow_name() {
        let request = StatefulSetRequest::from_args(&args()).unwrap();
        assert_eq!(request.container_name, "pg");
        assert_eq!(request.pvc_name, "pg");
        assert_eq!(request.service_type, "ClusterIP");
        assert_eq!(request.service_port, 8080);
        assert_eq!(request.replicas, 1);
        assert_eq!(request.labels["app"], "pg");
    }

    #[test]
    fn test_statefulset_claims_storage() {
        let request = StatefulSetRequest::from_args(&args()).unwrap();
        let statefulset = request.statefulset();
        let spec = statefulset.spec.unwrap();

        let claim = &spec.volume_claim_templates.unwrap()[0];
        let claim_spec = claim.spec.as_ref().unwrap();
        assert_eq!(claim_spec.access_modes.as_deref(), Some(&["ReadWriteOnce".to_string()][..]));
        let requests = claim_spec.resources.as_ref().unwrap().requests.as_ref().unwrap();
        assert_eq!(requests["storage"], Quantity("10Gi".to_string()));

        let container = &spec.template.spec.unwrap().containers[0];
        assert_eq!(container.ports.as_ref().unwrap()[0].container_port, 5432);
        let mount = &container.volume_mounts.as_ref().unwrap()[0];
        assert_eq!(mount.name, "pg");
        assert_eq!(mount.mount_path, "/var/lib/postgresql/data");
    }

    #[test]
    fn test_service_targets_container_port() {
        let request = StatefulSetRequest::from_args(&args()).unwrap();
        let spec = request.service().spec.unwrap();
        let port = &spec.ports.unwrap()[0];
        assert_eq!(port.port, 8080);
        assert_eq!(port.target_port, Some(IntOrString::Int(5432)));
        assert_eq!(spec.selector.unwrap()["app"], "pg");
    }

    #[test]
    fn test_invalid_storage_rejected() {
        let values = ToolArgs::from([
            ("namespace", json!("data")),
            ("name", json!("pg")),
            ("containerImages", json!("postgres:16")),
            ("storageValue", json!("ten gigs")),
            ("mountPath", json!("/data")),
        ]);
        let err = StatefulSetRequest::from_args(&values).unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
    }
}
