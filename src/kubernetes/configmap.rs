//! ConfigMap tools

use k8s_openapi::api::core::v1::ConfigMap;
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

const KIND: &str = "configmap";

#[derive(Debug, Default, Serialize)]
pub struct ConfigMapData {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl ConfigMapData {
    pub fn summary(configmap: &ConfigMap) -> Self {
        Self {
            name: configmap.name_any(),
            namespace: configmap.namespace().unwrap_or_default(),
            data: BTreeMap::new(),
        }
    }

    pub fn detail(configmap: &ConfigMap) -> Self {
        Self {
            data: configmap.data.clone().unwrap_or_default(),
            ..Self::summary(configmap)
        }
    }
}

fn namespace_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("namespace", "Provide namespace for configmap")
}

fn name_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("name", "Provide name for configmap")
}

pub async fn list_in_namespace(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let api: Api<ConfigMap> = Api::namespaced(ctx.client().await?, &ns);
    let configmaps = list_objects(&api, "", format!("Error in listing configmap in {ns}")).await?;
    render(&configmaps.iter().map(ConfigMapData::summary).collect::<Vec<_>>())
}

pub async fn list(ctx: ToolContext, _args: ToolArgs) -> Result<String> {
    let configmaps: Vec<ConfigMap> = list_all_namespaces(&ctx.client().await?, "", KIND).await?;
    render(&configmaps.iter().map(ConfigMapData::summary).collect::<Vec<_>>())
}

pub async fn get(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<ConfigMap> = Api::namespaced(ctx.client().await?, &ns);
    let configmap = get_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    render(&ConfigMapData::detail(&configmap))
}

pub async fn delete(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<ConfigMap> = Api::namespaced(ctx.client().await?, &ns);
    delete_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    info!(namespace = %ns, name = %name, "ConfigMap deleted");
    Ok(format!("Configmap {ns}/{name} is deleted"))
}

pub async fn create(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = args.require_string("namespace", "Provide namespace for configmap creation")?;
    let name = args.require_string("name", "Provide name for configmap creation")?;
    let data = args.require_string(
        "data",
        "Provide datas for configmap creation like password=kubernetes123,username=kubernetes",
    )?;

    let configmap = ConfigMap {
        metadata: ObjectMeta {
            name: Some(name.clone()),
            namespace: Some(ns.clone()),
            ..Default::default()
        },
        data: Some(parse_key_values(&data)),
        ..Default::default()
    };

    let target = format!("{ns}/{name}");
    let api: Api<ConfigMap> = Api::namespaced(ctx.client().await?, &ns);
    create_object(&api, &configmap, KIND, &target).await?;
    info!(configmap = %target, "ConfigMap created");
    Ok(format!("Successfully configmap {target} is created"))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list-configmap-in-namespace",
            "List the configmap in particular namespace",
            tool_handler!(list_in_namespace),
        )
        .required("namespace", "The namespace in which the configmap should be listed"),
        ToolDefinition::new(
            "list-configmap",
            "List the configmap in all namespaces",
            tool_handler!(list),
        ),
        ToolDefinition::new(
            "get-configmap",
            "Get the configmap in particular namespace with data",
            tool_handler!(get),
        )
        .required("namespace", "The namespace in which the configmap to get")
        .required("name", "Name of the configmap to get"),
        ToolDefinition::new(
            "delete-configmap",
            "Delete the configmap in particular namespace",
            tool_handler!(delete),
        )
        .required("namespace", "The namespace in which the configmap to be deleted")
        .required("name", "Name of the configmap to be deleted"),
        ToolDefinition::new(
            "create-configmap",
            "Create the configmap in particular namespace",
            tool_handler!(create),
        )
        .required("namespace", "The namespace in which the configmap to be created")
        .required("name", "Name of the configmap to be created")
        .required("data", "Data of the configmap, like username=admin,mode=debug"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configmap() -> ConfigMap {
        ConfigMap {
            metadata: ObjectMeta {
                name: Some("settings".to_string()),
                namespace: Some("default".to_string()),
                ..Default::default()
            },
            data: Some(parse_key_values("mode=debug, level = 3")),
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_omits_data() {
        let json = serde_json::to_value(ConfigMapData::summary(&configmap())).unwrap();
        assert_eq!(json, serde_json::json!({"name": "settings", "namespace": "default"}));
    }

    #[test]
    fn test_detail_includes_trimmed_data() {
        let data = ConfigMapData::detail(&configmap());
        assert_eq!(data.data["mode"], "debug");
        assert_eq!(data.data["level"], "3");
    }
}
