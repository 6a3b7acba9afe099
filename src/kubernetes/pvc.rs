//! PersistentVolumeClaim tools

use k8s_openapi::api::core::v1::{
    PersistentVolumeClaim, PersistentVolumeClaimSpec, VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, PostParams};
use kube::ResourceExt;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use super::parse::{is_valid_quantity, parse_access_modes, DEFAULT_ACCESS_MODE};
use super::registry::ToolDefinition;
use super::{
    create_object, delete_object, get_object, list_all_namespaces, list_objects, render, ToolArgs,
    ToolContext,
};
use crate::error::{Result, ToolError};

const KIND: &str = "pvc";
const STORAGE: &str = "storage";

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PvcData {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub capacity: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub access_mode: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub storage_class: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub volume: String,
}

impl PvcData {
    pub fn summary(claim: &PersistentVolumeClaim) -> Self {
        let capacity = claim
            .spec
            .as_ref()
            .and_then(|s| s.resources.as_ref())
            .and_then(|r| r.requests.as_ref())
            .and_then(|requests| requests.get(STORAGE))
            .map(|q| q.0.clone())
            .unwrap_or_default();

        Self {
            name: claim.name_any(),
            namespace: claim.namespace().unwrap_or_default(),
            status: claim
                .status
                .as_ref()
                .and_then(|s| s.phase.clone())
                .unwrap_or_default(),
            capacity,
            ..Default::default()
        }
    }

    pub fn detail(claim: &PersistentVolumeClaim) -> Self {
        let spec = claim.spec.as_ref();
        Self {
            access_mode: spec.and_then(|s| s.access_modes.clone()).unwrap_or_default(),
            storage_class: spec
                .and_then(|s| s.storage_class_name.clone())
                .unwrap_or_default(),
            volume: spec.and_then(|s| s.volume_name.clone()).unwrap_or_default(),
            ..Self::summary(claim)
        }
    }
}

fn storage_request(size: &str) -> BTreeMap<String, Quantity> {
    BTreeMap::from([(STORAGE.to_string(), Quantity(size.to_string()))])
}

fn validated_size(args: &ToolArgs) -> Result<String> {
    let size = args.require_string("size", "Provide size for pvc")?;
    if !is_valid_quantity(&size) {
        return Err(ToolError::Validation(format!("Invalid pvc size: {size}")));
    }
    Ok(size)
}

pub fn build_pvc(
    namespace: &str,
    name: &str,
    size: &str,
    storage_class: &str,
    access_modes: Vec<String>,
) -> PersistentVolumeClaim {
    PersistentVolumeClaim {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: Some(PersistentVolumeClaimSpec {
            access_modes: Some(access_modes),
            resources: Some(VolumeResourceRequirements {
                requests: Some(storage_request(size)),
                ..Default::default()
            }),
            storage_class_name: Some(storage_class.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Sets the requested storage, creating the spec sections a sparse object lacks.
pub fn resize(claim: &mut PersistentVolumeClaim, size: &str) {
    let spec = claim.spec.get_or_insert_with(Default::default);
    let resources = spec.resources.get_or_insert_with(Default::default);
    resources
        .requests
        .get_or_insert_with(BTreeMap::new)
        .insert(STORAGE.to_string(), Quantity(size.to_string()));
}

fn namespace_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("namespace", "Provide namespace for pvc")
}

fn name_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("name", "Provide name for pvc")
}

pub async fn list_in_namespace(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let api: Api<PersistentVolumeClaim> = Api::namespaced(ctx.client().await?, &ns);
    let claims = list_objects(&api, "", format!("Error in listing pvc in {ns}")).await?;
    render(&claims.iter().map(PvcData::summary).collect::<Vec<_>>())
}

pub async fn list(ctx: ToolContext, _args: ToolArgs) -> Result<String> {
    let claims: Vec<PersistentVolumeClaim> =
        list_all_namespaces(&ctx.client().await?, "", KIND).await?;
    render(&claims.iter().map(PvcData::summary).collect::<Vec<_>>())
}

pub async fn get(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<PersistentVolumeClaim> = Api::namespaced(ctx.client().await?, &ns);
    let claim = get_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    render(&PvcData::detail(&claim))
}

pub async fn delete(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<PersistentVolumeClaim> = Api::namespaced(ctx.client().await?, &ns);
    delete_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    info!(namespace = %ns, name = %name, "PVC deleted");
    Ok(format!("Successfully pvc {ns}/{name} is deleted"))
}

pub async fn update(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let size = validated_size(&args)?;

    let target = format!("{ns}/{name}");
    let api: Api<PersistentVolumeClaim> = Api::namespaced(ctx.client().await?, &ns);
    let mut claim = get_object(&api, &name, KIND, &target).await?;
    resize(&mut claim, &size);

    api.replace(&name, &PostParams::default(), &claim)
        .await
        .map_err(|e| ToolError::api(format!("Error in updating pvc {target} with size {size}"), e))?;
    info!(pvc = %target, size = %size, "PVC resized");
    Ok(format!("Successfully pvc {target} updated with size {size}"))
}

pub async fn create(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let size = validated_size(&args)?;
    let storage_class = args.require_string("storageClass", "Provide storageClass name for pvc")?;
    let access_modes = parse_access_modes(&args.get_string("accessMode", DEFAULT_ACCESS_MODE));

    let claim = build_pvc(&ns, &name, &size, &storage_class, access_modes);

    let target = format!("{ns}/{name}");
    let api: Api<PersistentVolumeClaim> = Api::namespaced(ctx.client().await?, &ns);
    create_object(&api, &claim, KIND, &target).await?;
    info!(pvc = %target, size = %size, storage_class = %storage_class, "PVC created");
    Ok(format!("Successfully pvc {target} is created"))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list-pvc-in-namespace",
            "List the pvc in particular namespace",
            tool_handler!(list_in_namespace),
        )
        .required("namespace", "Namespace of the pvc to be listed"),
        ToolDefinition::new("list-pvc", "List the pvc in all namespaces", tool_handler!(list)),
        ToolDefinition::new(
            "get-pvc",
            "Get the pvc in particular namespace with access mode, storage class and volume",
            tool_handler!(get),
        )
        .required("namespace", "Namespace of the pvc to get")
        .required("name", "Name of the pvc to get"),
        ToolDefinition::new(
            "delete-pvc",
            "Delete the pvc in particular namespace",
            tool_handler!(delete),
        )
        .required("namespace", "Namespace in which the pvc to be deleted")
        .required("name", "Name of the pvc to delete"),
        ToolDefinition::new(
            "update-pvc",
            "Update the size of the pvc in particular namespace",
            tool_handler!(update),
        )
        .required("namespace", "Namespace of the pvc to update")
        .required("name", "Name of the pvc to update")
        .required("size", "Size of the pvc to update, like 10Gi"),
        ToolDefinition::new(
            "create-pvc",
            "Create the pvc in particular namespace",
            tool_handler!(create),
        )
        .required("namespace", "Namespace of the pvc to create")
        .required("name", "Name of the pvc to create")
        .required("size", "Size of the pvc to create, like 5Gi")
        .required("storageClass", "Name of the storageClass for pvc to create")
        .optional(
            "accessMode",
            "AccessModes of the pvc to create, if not provided it will take ReadWriteOnce",
        ),
    ]
}
