//! Single-family updates chosen by a fixed priority.
//!
//! An update tool lists the families it supports in priority order. The first family
//! whose argument is set wins and every other argument is ignored.

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{Namespace, Node, Pod, PodSpec, Service};
use kube::Resource;
use std::collections::BTreeMap;
use std::fmt;

use super::args::ToolArgs;
use super::parse::parse_key_values;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Label,
    Annotation,
    Image,
    Replica,
    Selector,
    ServiceType,
}

pub const WORKLOAD_WITH_REPLICAS: &[Family] =
    &[Family::Label, Family::Annotation, Family::Image, Family::Replica];
pub const WORKLOAD: &[Family] = &[Family::Label, Family::Annotation, Family::Image];
pub const METADATA: &[Family] = &[Family::Label, Family::Annotation];
pub const SERVICE: &[Family] = &[Family::Selector, Family::ServiceType];

impl Family {
    /// The mutation this family would apply, if its argument is set
    pub fn extract(self, args: &ToolArgs) -> Option<Mutation> {
        let non_empty = |key: &str| Some(args.get_string(key, "")).filter(|v| !v.is_empty());
        match self {
            Family::Label => non_empty("label").map(Mutation::Labels),
            Family::Annotation => non_empty("annotation").map(Mutation::Annotations),
            Family::Image => non_empty("image").map(|image| Mutation::Image {
                image,
                container: non_empty("containerName"),
            }),
            Family::Replica => {
                let replica = args.get_int("replica", -1);
                (replica > -1).then(|| Mutation::Replicas(replica as i32))
            }
            Family::Selector => non_empty("selectorLabel").map(Mutation::Selector),
            Family::ServiceType => non_empty("svctype").map(Mutation::ServiceType),
        }
    }
}

/// Walks `order` and returns the first mutation whose argument is present.
pub fn select(args: &ToolArgs, order: &[Family]) -> Option<Mutation> {
    order.iter().find_map(|family| family.extract(args))
}

/// Readable list of families for the "not supported" message.
pub fn describe(order: &[Family]) -> String {
    let names: Vec<&str> = order
        .iter()
        .map(|family| match family {
            Family::Label => "labelling",
            Family::Annotation => "annotating",
            Family::Image => "image",
            Family::Replica => "replica",
            Family::Selector => "selector labelling",
            Family::ServiceType => "type",
        })
        .collect();
    match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {}", rest.join(", "), last),
        Some((last, _)) => last.to_string(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Labels(String),
    Annotations(String),
    Image {
        image: String,
        container: Option<String>,
    },
    Replicas(i32),
    Selector(String),
    ServiceType(String),
}

/// Why an image update could not be placed on a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    AmbiguousContainer,
    ContainerNotFound(String),
    Unsupported,
}

impl Rejection {
    /// Sentence returned to the caller for `kind ns/name`
    pub fn message(&self, kind: &str, target: &str) -> String {
        match self {
            Rejection::AmbiguousContainer => format!(
                "{} {} has more than one container, please provide the container name to update the image",
                capitalize(kind),
                target
            ),
            Rejection::ContainerNotFound(container) => format!(
                "Container name {} is not found in {} {}",
                container, kind, target
            ),
            Rejection::Unsupported => format!("Mentioned update in {} {} is not possible", kind, target),
        }
    }
}

impl fmt::Display for Mutation {
    /// Tail of the success sentence, e.g. `label app=web`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Labels(raw) | Mutation::Selector(raw) => write!(f, "label {}", raw),
            Mutation::Annotations(raw) => write!(f, "annotation {}", raw),
            Mutation::Image { image, .. } => write!(f, "image {}", image),
            Mutation::Replicas(count) => write!(f, "replica {}", count),
            Mutation::ServiceType(kind) => write!(f, "type {}", kind),
        }
    }
}

impl Mutation {
    pub fn apply<T: UpdateTarget>(&self, target: &mut T) -> Result<(), Rejection> {
        match self {
            Mutation::Labels(raw) => {
                target.meta_mut().labels = Some(parse_key_values(raw));
            }
            Mutation::Annotations(raw) => {
                target.meta_mut().annotations = Some(parse_key_values(raw));
            }
            Mutation::Image { image, container } => {
                let spec = target.pod_spec_mut().ok_or(Rejection::Unsupported)?;
                set_image(spec, image, container.as_deref())?;
            }
            Mutation::Replicas(count) => {
                *target.replicas_mut().ok_or(Rejection::Unsupported)? = Some(*count);
            }
            Mutation::Selector(raw) => {
                *target.selector_mut().ok_or(Rejection::Unsupported)? = Some(parse_key_values(raw));
            }
            Mutation::ServiceType(kind) => {
                *target.service_type_mut().ok_or(Rejection::Unsupported)? = Some(kind.clone());
            }
        }
        Ok(())
    }
}

fn set_image(spec: &mut PodSpec, image: &str, container: Option<&str>) -> Result<(), Rejection> {
    let slot = match (spec.containers.len(), container) {
        (1, None) => &mut spec.containers[0],
        (_, None) => return Err(Rejection::AmbiguousContainer),
        (_, Some(name)) => spec
            .containers
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| Rejection::ContainerNotFound(name.to_string()))?,
    };
    slot.image = Some(image.to_string());
    Ok(())
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Mutable views a resource exposes to [`Mutation::apply`].
pub trait UpdateTarget: Resource {
    fn pod_spec_mut(&mut self) -> Option<&mut PodSpec> {
        None
    }

    fn replicas_mut(&mut self) -> Option<&mut Option<i32>> {
        None
    }

    fn selector_mut(&mut self) -> Option<&mut Option<BTreeMap<String, String>>> {
        None
    }

    fn service_type_mut(&mut self) -> Option<&mut Option<String>> {
        None
    }
}

impl UpdateTarget for Deployment {
    fn pod_spec_mut(&mut self) -> Option<&mut PodSpec> {
        self.spec.as_mut()?.template.spec.as_mut()
    }

    fn replicas_mut(&mut self) -> Option<&mut Option<i32>> {
        self.spec.as_mut().map(|spec| &mut spec.replicas)
    }
}

impl UpdateTarget for StatefulSet {
    fn pod_spec_mut(&mut self) -> Option<&mut PodSpec> {
        self.spec.as_mut()?.template.spec.as_mut()
    }

    fn replicas_mut(&mut self) -> Option<&mut Option<i32>> {
        self.spec.as_mut().map(|spec| &mut spec.replicas)
    }
}

impl UpdateTarget for DaemonSet {
    fn pod_spec_mut(&mut self) -> Option<&mut PodSpec> {
        self.spec.as_mut()?.template.spec.as_mut()
    }
}

impl UpdateTarget for Service {
    fn selector_mut(&mut self) -> Option<&mut Option<BTreeMap<String, String>>> {
        Some(&mut self.spec.get_or_insert_with(Default::default).selector)
    }

    fn service_type_mut(&mut self) -> Option<&mut Option<String>> {
        Some(&mut self.spec.get_or_insert_with(Default::default).type_)
    }
}

impl UpdateTarget for Namespace {}
impl UpdateTarget for Node {}
impl UpdateTarget for Pod {}
