//! Service tools

use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::Api;
use kube::ResourceExt;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use super::parse::{parse_key_values, parse_service_ports};
use super::registry::ToolDefinition;
use super::update::SERVICE;
use super::{
    create_object, delete_object, get_object, list_all_namespaces, list_objects, render,
    update_object, ToolArgs, ToolContext,
};
use crate::error::Result;

const KIND: &str = "service";

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceData {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub service_type: String,
    #[serde(rename = "internalIP", skip_serializing_if = "String::is_empty")]
    pub internal_ip: String,
    #[serde(rename = "externalIP", skip_serializing_if = "String::is_empty")]
    pub external_ip: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub selector_label: BTreeMap<String, String>,
}

impl ServiceData {
    pub fn summary(service: &Service) -> Self {
        Self {
            name: service.name_any(),
            namespace: service.namespace().unwrap_or_default(),
            service_type: service
                .spec
                .as_ref()
                .and_then(|s| s.type_.clone())
                .unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn detail(service: &Service) -> Self {
        let spec = service.spec.as_ref();
        let base = Self::summary(service);
        let external_ip = if base.service_type == "LoadBalancer" {
            service
                .status
                .as_ref()
                .and_then(|s| s.load_balancer.as_ref())
                .and_then(|lb| lb.ingress.as_ref())
                .and_then(|ingress| ingress.first())
                .and_then(|ingress| ingress.ip.clone())
                .unwrap_or_default()
        } else {
            String::new()
        };

        Self {
            internal_ip: spec.and_then(|s| s.cluster_ip.clone()).unwrap_or_default(),
            external_ip,
            selector_label: spec.and_then(|s| s.selector.clone()).unwrap_or_default(),
            ..base
        }
    }
}

pub fn build_service(
    namespace: &str,
    name: &str,
    selector: BTreeMap<String, String>,
    ports: Vec<ServicePort>,
    service_type: &str,
) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(selector.clone()),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            selector: Some(selector),
            ports: Some(ports),
            type_: Some(service_type.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn namespace_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("namespace", "Provide namespace for service")
}

fn name_arg(args: &ToolArgs) -> Result<String> {
    args.require_string("name", "Provide name for service")
}

pub async fn list_in_namespace(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let api: Api<Service> = Api::namespaced(ctx.client().await?, &ns);
    let services = list_objects(&api, "", format!("Error in listing service in {ns}")).await?;
    render(&services.iter().map(ServiceData::summary).collect::<Vec<_>>())
}

pub async fn list(ctx: ToolContext, _args: ToolArgs) -> Result<String> {
    let services: Vec<Service> = list_all_namespaces(&ctx.client().await?, "", KIND).await?;
    render(&services.iter().map(ServiceData::summary).collect::<Vec<_>>())
}

pub async fn get(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<Service> = Api::namespaced(ctx.client().await?, &ns);
    let service = get_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    render(&ServiceData::detail(&service))
}

pub async fn delete(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<Service> = Api::namespaced(ctx.client().await?, &ns);
    delete_object(&api, &name, KIND, &format!("{ns}/{name}")).await?;
    info!(namespace = %ns, name = %name, "Service deleted");
    Ok(format!("Service {ns}/{name} is deleted"))
}

pub async fn update(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let api: Api<Service> = Api::namespaced(ctx.client().await?, &ns);
    update_object(&api, &name, KIND, &format!("{ns}/{name}"), &args, SERVICE).await
}

pub async fn create(ctx: ToolContext, args: ToolArgs) -> Result<String> {
    let ns = namespace_arg(&args)?;
    let name = name_arg(&args)?;
    let selector = args.require_string("selectorLabel", "Provide selector label for service")?;
    let service_ports = args.require_string("svcPort", "Provide svc port details for service")?;
    let target_ports = args.require_string("targetPort", "Provide target port for service")?;
    let service_type = args.get_string("svcType", "ClusterIP");

    let ports = parse_service_ports(&service_ports, &target_ports)?;
    let service = build_service(&ns, &name, parse_key_values(&selector), ports, &service_type);

    let target = format!("{ns}/{name}");
    let api: Api<Service> = Api::namespaced(ctx.client().await?, &ns);
    create_object(&api, &service, KIND, &target).await?;
    info!(service = %target, service_type = %service_type, "Service created");
    Ok(format!("Successfully service {target} is created"))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list-service-in-namespace",
            "List the service in particular namespace with type",
            tool_handler!(list_in_namespace),
        )
        .required("namespace", "The namespace in which the service should be listed"),
        ToolDefinition::new(
            "list-service",
            "List the service in all namespaces with type",
            tool_handler!(list),
        ),
        ToolDefinition::new(
            "get-service",
            "Get the particular service with type and IP",
            tool_handler!(get),
        )
        .required("namespace", "The namespace in which the service exists")
        .required("name", "Name of the service to get"),
        ToolDefinition::new(
            "delete-service",
            "Delete the particular service in the namespace",
            tool_handler!(delete),
        )
        .required("namespace", "The namespace in which the service to be deleted")
        .required("name", "Name of the service to be deleted"),
        ToolDefinition::new(
            "update-service",
            "Update the service in particular namespace like selector label and type changes",
            tool_handler!(update),
        )
        .required("namespace", "The namespace in which the service to be updated")
        .required("name", "Name of the service to be updated")
        .optional("selectorLabel", "Selector label to be updated")
        .optional("svctype", "Service type to be updated"),
        ToolDefinition::new(
            "create-service",
            "Create the service in particular namespace",
            tool_handler!(create),
        )
        .required("namespace", "The namespace in which the service to be created")
        .required("name", "Name of the service to be created")
        .required("selectorLabel", "Selector Label for the service")
        .required("svcPort", "Service port name and port details for service, like http:80,https:443")
        .required("targetPort", "Target port details, like 8080,8443")
        .optional(
            "svcType",
            "Service type to create, if not provided it will take default service type",
        ),
    ]
}
