//! Projection and pod-template helpers shared by deployments, daemonsets and
//! statefulsets.

use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use kube::{Resource, ResourceExt};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadData {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub available_instance: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub container_name: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub container_image: Vec<String>,
}

impl WorkloadData {
    /// `ready` and `desired` become the `availableInstance` ratio
    pub fn summary<K: Resource>(object: &K, ready: i32, desired: i32) -> Self {
        Self {
            name: object.name_any(),
            namespace: object.namespace().unwrap_or_default(),
            available_instance: format!("{ready}/{desired}"),
            labels: object.labels().clone(),
            ..Default::default()
        }
    }

    pub fn with_containers(mut self, spec: Option<&PodSpec>) -> Self {
        for container in spec.into_iter().flat_map(|s| s.containers.iter()) {
            self.container_name.push(container.name.clone());
            self.container_image
                .push(container.image.clone().unwrap_or_default());
        }
        self
    }
}

pub fn selector(labels: &BTreeMap<String, String>) -> LabelSelector {
    LabelSelector {
        match_labels: Some(labels.clone()),
        ..Default::default()
    }
}

pub fn pod_template(labels: &BTreeMap<String, String>, containers: Vec<Container>) -> PodTemplateSpec {
    PodTemplateSpec {
        metadata: Some(ObjectMeta {
            labels: Some(labels.clone()),
            ..Default::default()
        }),
        spec: Some(PodSpec {
            containers,
            ..Default::default()
        }),
    }
}

pub fn object_meta(namespace: &str, name: &str, labels: &BTreeMap<String, String>) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        labels: Some(labels.clone()),
        ..Default::default()
    }
}
