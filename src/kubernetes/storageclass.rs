//! StorageClass tools

use k8s_openapi::api::storage::v1::StorageClass;
use kube::api::Api;
use kube::ResourceExt;
use serde::Serialize;

use super::registry::ToolDefinition;
use super::{get_object, list_objects, render, ToolArgs, ToolContext};
use crate::error::Result;

const KIND: &str = "storageclass";

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageClassData {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub provisioner: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reclaim_policy: String,
}

impl StorageClassData {
    pub fn summary(class: &StorageClass) -> Self {
        Self {
            name: class.name_any(),
            ..Default::default()
        }
    }

    pub fn detail(class: &StorageClass) -> Self {
        Self {
            name: class.name_any(),
            provisioner: class.provisioner.clone(),
            reclaim_policy: class.reclaim_policy.clone().unwrap_or_default(),
        }
    }
}

pub async fn list(ctx: ToolContext, _args: ToolArgs) -> Result<String> {
    let api: Api<StorageClass> = Api::all(ctx.client().await?);
    let classes = list_objects(&api, "", "Error in listing storageclass".to_string()).await?;
    render(&classes.iter().map(StorageClassData::summary).collect::<Vec<_>>())
}

pub async fn get(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let name = args.require_string("name", "Provide name for storage class")?;
    let api: Api<StorageClass> = Api::all(ctx.client().await?);
    let class = get_object(&api, &name, KIND, &name).await?;
    render(&StorageClassData::detail(&class))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list-storageClass",
            "List the storageClass in the entire cluster",
            tool_handler!(list),
        ),
        ToolDefinition::new(
            "get-storageClass",
            "Get the particular storageClass with provisioner and reclaim policy",
            tool_handler!(get),
        )
        .required("name", "Name of the storageClass to get"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    #[test]
    fn test_detail_has_provisioner() {
        let class = StorageClass {
            metadata: ObjectMeta {
                name: Some("standard".to_string()),
                ..Default::default()
            },
            provisioner: "kubernetes.io/gce-pd".to_string(),
            reclaim_policy: Some("Delete".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(StorageClassData::detail(&class)).unwrap();
        assert_eq!(json["provisioner"], "kubernetes.io/gce-pd");
        assert_eq!(json["reclaimPolicy"], "Delete");
        assert_eq!(
            serde_json::to_value(StorageClassData::summary(&class)).unwrap(),
            serde_json::json!({"name": "standard"})
        );
    }
}
