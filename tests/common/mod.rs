//! In-process stand-in for the Kubernetes API server.
//!
//! `FakeApiServer` is a `tower::Service` handed to `kube::Client::new`. It serves
//! canned objects and lists by path, echoes POST/PUT bodies back, answers DELETE with a
//! success `Status`, and records every request for later assertions.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::future::BoxFuture;
use hyper::body::Body as _;
use kube::client::Body;
use kube::Client;
use kube_mcp_rs::kubernetes::{ClusterConnector, ToolArgs, ToolContext, ToolRegistry};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::convert::Infallible;
use std::future::poll_fn;
use std::pin::pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct State {
    objects: HashMap<String, Value>,
    lists: HashMap<String, Vec<Value>>,
    logs: HashMap<String, String>,
    requests: Vec<RecordedRequest>,
}

#[derive(Clone, Default)]
pub struct FakeApiServer {
    state: Arc<Mutex<State>>,
}

impl FakeApiServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `object` for GET and PUT on `path`.
    pub fn with_object(self, path: &str, object: Value) -> Self {
        self.state
            .lock()
            .unwrap()
            .objects
            .insert(path.to_string(), object);
        self
    }

    pub fn with_list(self, path: &str, items: Vec<Value>) -> Self {
        self.state
            .lock()
            .unwrap()
            .lists
            .insert(path.to_string(), items);
        self
    }

    pub fn with_log(self, path: &str, text: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .logs
            .insert(path.to_string(), text.to_string());
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests other than GET
    pub fn writes(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != "GET")
            .collect()
    }

    pub fn client(&self) -> Client {
        Client::new(self.clone(), "default")
    }

    pub fn context(&self) -> ToolContext {
        ToolContext::new(Arc::new(FakeConnector {
            client: self.client(),
        }))
    }

    fn respond(&self, method: &str, path: &str, body: Option<Value>) -> (u16, Vec<u8>) {
        let state = self.state.lock().unwrap();
        match method {
            "GET" => {
                if let Some(text) = state.logs.get(path) {
                    return (200, text.clone().into_bytes());
                }
                if let Some(object) = state.objects.get(path) {
                    return (200, to_bytes(object));
                }
                if let Some(items) = state.lists.get(path) {
                    let list = json!({
                        "apiVersion": "v1",
                        "kind": "List",
                        "metadata": {"resourceVersion": ""},
                        "items": items,
                    });
                    return (200, to_bytes(&list));
                }
                not_found(path)
            }
            "POST" => (201, to_bytes(&body.unwrap_or(Value::Null))),
            "PUT" => {
                if state.objects.contains_key(path) {
                    (200, to_bytes(&body.unwrap_or(Value::Null)))
                } else {
                    not_found(path)
                }
            }
            "DELETE" => {
                if state.objects.contains_key(path) {
                    let status = json!({
                        "apiVersion": "v1",
                        "kind": "Status",
                        "metadata": {},
                        "status": "Success",
                        "code": 200,
                    });
                    (200, to_bytes(&status))
                } else {
                    not_found(path)
                }
            }
            _ => (405, Vec::new()),
        }
    }
}

fn to_bytes(value: &Value) -> Vec<u8> {
    serde_json::to_vec(value).unwrap()
}

fn not_found(path: &str) -> (u16, Vec<u8>) {
    let name = path.rsplit('/').next().unwrap_or_default();
    let status = json!({
        "apiVersion": "v1",
        "kind": "Status",
        "metadata": {},
        "status": "Failure",
        "message": format!("\"{name}\" not found"),
        "reason": "NotFound",
        "code": 404,
    });
    (404, to_bytes(&status))
}

async fn read_body(body: Body) -> Vec<u8> {
    let mut body = pin!(body);
    let mut bytes = Vec::new();
    while let Some(frame) = poll_fn(|cx| body.as_mut().poll_frame(cx)).await {
        if let Ok(data) = frame.unwrap().into_data() {
            bytes.extend_from_slice(&data);
        }
    }
    bytes
}

impl tower::Service<http::Request<Body>> for FakeApiServer {
    type Response = http::Response<Body>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: http::Request<Body>) -> Self::Future {
        let server = self.clone();
        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let raw = read_body(body).await;
            let body: Option<Value> = serde_json::from_slice(&raw).ok();

            let method = parts.method.to_string();
            let path = parts.uri.path().to_string();
            let query = parts.uri.query().unwrap_or_default().to_string();

            server.state.lock().unwrap().requests.push(RecordedRequest {
                method: method.clone(),
                path: path.clone(),
                query,
                body: body.clone(),
            });

            let (status, bytes) = server.respond(&method, &path, body);
            let response = http::Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(bytes))
                .unwrap();
            Ok(response)
        })
    }
}

struct FakeConnector {
    client: Client,
}

#[async_trait]
impl ClusterConnector for FakeConnector {
    async fn connect(&self) -> kube_mcp_rs::Result<Client> {
        Ok(self.client.clone())
    }
}

pub fn args<const N: usize>(pairs: [(&str, Value); N]) -> ToolArgs {
    ToolArgs::from(pairs)
}

/// Runs a tool through the registry and flattens the result to its text, the way the
/// default error mode reports it.
pub async fn call(server: &FakeApiServer, tool: &str, args: ToolArgs) -> String {
    let registry = ToolRegistry::kubernetes();
    let definition = registry.get(tool).unwrap();
    match definition.call(server.context(), args).await {
        Ok(text) => text,
        Err(err) => err.to_string(),
    }
}

pub fn pod(namespace: &str, name: &str, phase: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {"name": name, "namespace": namespace, "labels": {"app": name}},
        "spec": {"containers": [{"name": "app", "image": "nginx:latest"}]},
        "status": {"phase": phase},
    })
}

pub fn namespace(name: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {"name": name},
        "status": {"phase": "Active"},
    })
}
