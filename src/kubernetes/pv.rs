//! PersistentVolume tools

use k8s_openapi::api::core::v1::PersistentVolume;
use kube::api::Api;
use kube::ResourceExt;
use serde::Serialize;
use tracing::info;

use super::registry::ToolDefinition;
use super::{delete_object, get_object, list_objects, render, ToolArgs, ToolContext};
use crate::error::Result;

const KIND: &str = "pv";

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PvData {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub capacity: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub access_mode: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub storage_class: String,
}

impl PvData {
    pub fn summary(volume: &PersistentVolume) -> Self {
        Self {
            name: volume.name_any(),
            status: volume
                .status
                .as_ref()
                .and_then(|s| s.phase.clone())
                .unwrap_or_default(),
            capacity: volume
                .spec
                .as_ref()
                .and_then(|s| s.capacity.as_ref())
                .and_then(|c| c.get("storage"))
                .map(|q| q.0.clone())
                .unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn detail(volume: &PersistentVolume) -> Self {
        let spec = volume.spec.as_ref();
        Self {
            access_mode: spec.and_then(|s| s.access_modes.clone()).unwrap_or_default(),
            storage_class: spec
                .and_then(|s| s.storage_class_name.clone())
                .unwrap_or_default(),
            ..Self::summary(volume)
        }
    }
}

fn name_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("name", "Provide name for pv")
}

pub async fn list(ctx: ToolContext, _args: ToolArgs) -> Result<String> {
    let api: Api<PersistentVolume> = Api::all(ctx.client().await?);
    let volumes = list_objects(&api, "", "Error in listing pv".to_string()).await?;
    render(&volumes.iter().map(PvData::summary).collect::<Vec<_>>())
}

pub async fn get(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let name = name_arg(&args)?;
    let api: Api<PersistentVolume> = Api::all(ctx.client().await?);
    let volume = get_object(&api, &name, KIND, &name).await?;
    render(&PvData::detail(&volume))
}

pub async fn delete(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let name = name_arg(&args)?;
    let api: Api<PersistentVolume> = Api::all(ctx.client().await?);
    delete_object(&api, &name, KIND, &name).await?;
    info!(name = %name, "PV deleted");
    Ok(format!("Successfully pv {name} is deleted"))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new("list-pv", "List all the pv in the cluster", tool_handler!(list)),
        ToolDefinition::new(
            "get-pv",
            "Get the particular pv with access mode and storage class",
            tool_handler!(get),
        )
        .required("name", "Name of the pv to get"),
        ToolDefinition::new("delete-pv", "Delete the particular pv", tool_handler!(delete))
            .required("name", "Name of the pv to delete"),
    ]
}
