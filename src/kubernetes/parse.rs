//! Parsers for the comma-delimited argument formats shared by create and update tools.
//!
//! Malformed entries are dropped rather than rejected. Callers rely on that, so none of
//! these functions fail on a bad entry; only count mismatches between parallel lists
//! are errors.

use k8s_openapi::api::core::v1::{Container, ContainerPort, ServicePort};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::error::{Result, ToolError};

pub const DEFAULT_CONTAINER_PORT: i32 = 8080;
pub const DEFAULT_ACCESS_MODE: &str = "ReadWriteOnce";

pub const CONTAINER_COUNT_MISMATCH: &str = "container name and images counts are not matched";
pub const SERVICE_PORT_COUNT_MISMATCH: &str =
    "Service ports and target ports counts are not matched";

static QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+|Ki|Mi|Gi|Ti|Pi|Ei|n|u|m|k|M|G|T|P|E)?$")
        .expect("quantity pattern is valid")
});

/// `"a=1, b=2,bad,c = 3"` becomes `{a: 1, b: 2, c: 3}`. Only the first `=` splits.
pub fn parse_key_values(input: &str) -> BTreeMap<String, String> {
    input
        .split(',')
        .filter_map(|entry| entry.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

/// Parsed labels, or `{"app": name}` when nothing usable was given.
pub fn labels_or_default(input: &str, name: &str) -> BTreeMap<String, String> {
    let labels = parse_key_values(input);
    if labels.is_empty() {
        BTreeMap::from([("app".to_string(), name.to_string())])
    } else {
        labels
    }
}

/// Ports for one container: `"http:8080|metrics:9090"`.
pub fn parse_container_ports(spec: &str) -> Vec<ContainerPort> {
    let ports: Vec<ContainerPort> = spec
        .split('|')
        .map(str::trim)
        .filter_map(|entry| entry.split_once(':'))
        .filter_map(|(name, port)| {
            port.parse::<i32>().ok().map(|container_port| ContainerPort {
                name: Some(name.trim().to_string()),
                container_port,
                ..Default::default()
            })
        })
        .collect();

    if ports.is_empty() {
        vec![ContainerPort {
            container_port: DEFAULT_CONTAINER_PORT,
            ..Default::default()
        }]
    } else {
        ports
    }
}

/// Builds containers from parallel comma lists. `ports` may be shorter than the name
/// list; missing entries get the default port.
pub fn build_containers(names: &str, images: &str, ports: &str) -> Result<Vec<Container>> {
    let names: Vec<&str> = names.split(',').collect();
    let images: Vec<&str> = images.split(',').collect();
    let ports: Vec<&str> = ports.split(',').collect();

    if names.len() != images.len() {
        return Err(ToolError::Validation(CONTAINER_COUNT_MISMATCH.to_string()));
    }

    Ok(names
        .iter()
        .zip(images.iter())
        .enumerate()
        .map(|(i, (name, image))| Container {
            name: name.trim().to_string(),
            image: Some(image.trim().to_string()),
            ports: Some(parse_container_ports(ports.get(i).copied().unwrap_or_default())),
            ..Default::default()
        })
        .collect())
}

/// Service ports from `"http:80,https:443"` and `"8080,8443"`.
pub fn parse_service_ports(service_ports: &str, target_ports: &str) -> Result<Vec<ServicePort>> {
    let service_ports: Vec<&str> = service_ports.split(',').collect();
    let target_ports: Vec<&str> = target_ports.split(',').collect();

    if service_ports.len() != target_ports.len() {
        return Err(ToolError::Validation(SERVICE_PORT_COUNT_MISMATCH.to_string()));
    }

    Ok(service_ports
        .iter()
        .zip(target_ports.iter())
        .filter_map(|(service, target)| {
            let (name, port) = service.trim().split_once(':')?;
            let port = port.parse::<i32>().ok()?;
            let target = target.parse::<i32>().ok()?;
            Some(ServicePort {
                name: Some(name.trim().to_string()),
                port,
                target_port: Some(IntOrString::Int(target)),
                ..Default::default()
            })
        })
        .collect())
}

pub fn parse_access_modes(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|mode| !mode.is_empty())
        .map(str::to_string)
        .collect()
}

/// Kubernetes resource quantity such as `5Gi`, `500m` or `1e3`.
pub fn is_valid_quantity(input: &str) -> bool {
    QUANTITY.is_match(input)
}
