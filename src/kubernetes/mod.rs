//! Kubernetes tool handlers
//!
//! One module per resource kind. Each exposes its async handlers and a `tools()` list
//! that binds them to names and argument schemas. [`registry::ToolRegistry`] collects
//! those lists into the catalog served over MCP.

use k8s_openapi::api::core::v1::Namespace;
use k8s_openapi::NamespaceResourceScope;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::{Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use tracing::debug;

use crate::error::{Result, ToolError};
use update::{Family, UpdateTarget};

/// Turns an async handler into a [`registry::ToolFn`].
macro_rules! tool_handler {
    ($handler:path) => {{
        fn call(
            ctx: $crate::kubernetes::ToolContext,
            args: $crate::kubernetes::ToolArgs,
        ) -> $crate::kubernetes::registry::ToolFuture {
            Box::pin($handler(ctx, args))
        }
        call
    }};
}

pub mod args;
pub mod client;
pub mod parse;
pub mod registry;
pub mod update;

pub mod clusterrole;
pub mod clusterrolebinding;
pub mod configmap;
pub mod daemonset;
pub mod deployment;
pub mod namespace;
pub mod node;
pub mod pod;
pub mod pv;
pub mod pvc;
pub mod role;
pub mod rolebinding;
pub mod secret;
pub mod service;
pub mod serviceaccount;
pub mod statefulset;
pub mod storageclass;
pub mod workload;

pub use args::ToolArgs;
pub use client::{ClusterConnector, KubeconfigConnector, ToolContext};
pub use registry::{ToolDefinition, ToolRegistry};

/// Indented JSON for a projection
pub(crate) fn render<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub(crate) fn list_params(selector: &str) -> ListParams {
    let params = ListParams::default();
    if selector.is_empty() {
        params
    } else {
        params.labels(selector)
    }
}

pub(crate) async fn list_objects<K>(api: &Api<K>, selector: &str, context: String) -> Result<Vec<K>>
where
    K: Clone + DeserializeOwned + Debug,
{
    let list = api
        .list(&list_params(selector))
        .await
        .map_err(|e| ToolError::api(context, e))?;
    Ok(list.items)
}

/// Lists `K` in every namespace, one request per namespace in listing order.
pub(crate) async fn list_all_namespaces<K>(
    client: &Client,
    selector: &str,
    kind: &str,
) -> Result<Vec<K>>
where
    K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
    K::DynamicType: Default,
{
    let namespaces: Api<Namespace> = Api::all(client.clone());
    let namespaces = list_objects(&namespaces, "", "Error in listing namespace".to_string()).await?;

    let mut items = Vec::new();
    for namespace in namespaces {
        let ns = namespace.name_any();
        debug!(kind, namespace = %ns, "Listing namespace");
        let api: Api<K> = Api::namespaced(client.clone(), &ns);
        items.extend(list_objects(&api, selector, format!("Error in listing {kind} in {ns}")).await?);
    }
    Ok(items)
}

pub(crate) async fn get_object<K>(api: &Api<K>, name: &str, kind: &str, target: &str) -> Result<K>
where
    K: Clone + DeserializeOwned + Debug,
{
    api.get(name)
        .await
        .map_err(|e| ToolError::api(format!("Error in getting {kind} {target}"), e))
}

pub(crate) async fn create_object<K>(api: &Api<K>, object: &K, kind: &str, target: &str) -> Result<K>
where
    K: Clone + DeserializeOwned + Serialize + Debug,
{
    api.create(&PostParams::default(), object)
        .await
        .map_err(|e| ToolError::api(format!("Error in creating {kind} {target}"), e))
}

pub(crate) async fn delete_object<K>(api: &Api<K>, name: &str, kind: &str, target: &str) -> Result<()>
where
    K: Clone + DeserializeOwned + Debug,
{
    api.delete(name, &DeleteParams::default())
        .await
        .map_err(|e| ToolError::api(format!("Error in deleting {kind} {target}"), e))?;
    Ok(())
}

/// Fetches the object, applies the first mutation family present in `args`, and
/// writes it back.
pub(crate) async fn update_object<K>(
    api: &Api<K>,
    name: &str,
    kind: &str,
    target: &str,
    args: &ToolArgs,
    order: &[Family],
) -> Result<String>
where
    K: UpdateTarget + Clone + DeserializeOwned + Serialize + Debug,
{
    let mut object = get_object(api, name, kind, target).await?;

    let Some(mutation) = update::select(args, order) else {
        return Ok(format!(
            "Mentioned update in {} {} is not possible, we are supporting {}",
            kind,
            target,
            update::describe(order)
        ));
    };

    mutation
        .apply(&mut object)
        .map_err(|rejection| ToolError::Validation(rejection.message(kind, target)))?;

    api.replace(name, &PostParams::default(), &object)
        .await
        .map_err(|e| ToolError::api(format!("Error in updating {kind} {target} with {mutation}"), e))?;

    Ok(format!("Successfully {kind} {target} updated with {mutation}"))
}

