mod common;

use common::{args, call, namespace, pod, FakeApiServer};
use serde_json::{json, Value};

fn deployment_json() -> Value {
    json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": {"name": "web", "namespace": "default", "labels": {"app": "web"}},
        "spec": {
            "replicas": 2,
            "selector": {"matchLabels": {"app": "web"}},
            "template": {
                "metadata": {"labels": {"app": "web"}},
                "spec": {"containers": [{"name": "app", "image": "nginx:1"}]}
            }
        },
        "status": {"readyReplicas": 2}
    })
}

#[tokio::test]
async fn test_create_pod() {
    let server = FakeApiServer::new();
    let text = call(
        &server,
        "create-pod",
        args([
            ("namespace", json!("default")),
            ("name", json!("web")),
            ("containerNames", json!("app")),
            ("containerImages", json!("nginx:latest")),
            ("containerPorts", json!("http:8080")),
        ]),
    )
    .await;

    assert_eq!(text, "Successfully pod default/web is created");

    let writes = server.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].method, "POST");
    assert_eq!(writes[0].path, "/api/v1/namespaces/default/pods");

    let body = writes[0].body.as_ref().unwrap();
    let containers = body["spec"]["containers"].as_array().unwrap();
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0]["name"], "app");
    assert_eq!(containers[0]["image"], "nginx:latest");
    assert_eq!(containers[0]["ports"][0]["containerPort"], 8080);
    assert_eq!(containers[0]["ports"][0]["name"], "http");
    assert_eq!(body["metadata"]["labels"]["app"], "web");
}

#[tokio::test]
async fn test_create_pod_applies_given_labels() {
    let server = FakeApiServer::new();
    call(
        &server,
        "create-pod",
        args([
            ("namespace", json!("default")),
            ("name", json!("web")),
            ("label", json!("tier=frontend")),
            ("containerNames", json!("app")),
            ("containerImages", json!("nginx:latest")),
        ]),
    )
    .await;

    let body = server.writes()[0].body.clone().unwrap();
    assert_eq!(body["metadata"]["labels"], json!({"tier": "frontend"}));
}

#[tokio::test]
async fn test_container_count_mismatch_makes_no_request() {
    let server = FakeApiServer::new();
    let text = call(
        &server,
        "create-deployment",
        args([
            ("namespace", json!("default")),
            ("name", json!("web")),
            ("containerNames", json!("app,sidecar")),
            ("containerImages", json!("nginx:latest")),
        ]),
    )
    .await;

    assert_eq!(text, "container name and images counts are not matched");
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_missing_argument_makes_no_request() {
    let server = FakeApiServer::new();
    let text = call(&server, "get-deployment", args([("name", json!("web"))])).await;

    assert_eq!(text, "Provide namespace for deployment");
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_update_deployment_label_wins_over_image() {
    let path = "/apis/apps/v1/namespaces/default/deployments/web";
    let server = FakeApiServer::new().with_object(path, deployment_json());

    let text = call(
        &server,
        "update-deployment",
        args([
            ("namespace", json!("default")),
            ("name", json!("web")),
            ("label", json!("tier=frontend")),
            ("image", json!("nginx:2")),
        ]),
    )
    .await;

    assert_eq!(
        text,
        "Successfully deployment default/web updated with label tier=frontend"
    );

    let writes = server.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].method, "PUT");
    assert_eq!(writes[0].path, path);

    let body = writes[0].body.as_ref().unwrap();
    assert_eq!(body["metadata"]["labels"], json!({"tier": "frontend"}));
    assert_eq!(
        body["spec"]["template"]["spec"]["containers"][0]["image"],
        "nginx:1"
    );
}

#[tokio::test]
async fn test_update_deployment_without_mutation() {
    let path = "/apis/apps/v1/namespaces/default/deployments/web";
    let server = FakeApiServer::new().with_object(path, deployment_json());

    let text = call(
        &server,
        "update-deployment",
        args([("namespace", json!("default")), ("name", json!("web"))]),
    )
    .await;

    assert_eq!(
        text,
        "Mentioned update in deployment default/web is not possible, we are supporting labelling, annotating, image and replica"
    );
    assert!(server.writes().is_empty());
}

#[tokio::test]
async fn test_update_deployment_replicas() {
    let path = "/apis/apps/v1/namespaces/default/deployments/web";
    let server = FakeApiServer::new().with_object(path, deployment_json());

    let text = call(
        &server,
        "update-deployment",
        args([
            ("namespace", json!("default")),
            ("name", json!("web")),
            ("replica", json!(5)),
        ]),
    )
    .await;

    assert_eq!(text, "Successfully deployment default/web updated with replica 5");
    assert_eq!(server.writes()[0].body.as_ref().unwrap()["spec"]["replicas"], 5);
}

#[tokio::test]
async fn test_get_deployment_projection() {
    let server = FakeApiServer::new().with_object(
        "/apis/apps/v1/namespaces/default/deployments/web",
        deployment_json(),
    );

    let text = call(
        &server,
        "get-deployment",
        args([("namespace", json!("default")), ("name", json!("web"))]),
    )
    .await;

    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["availableInstance"], "2/2");
    assert_eq!(value["containerName"], json!(["app"]));
    assert_eq!(value["containerImage"], json!(["nginx:1"]));
}

#[tokio::test]
async fn test_create_pvc_defaults_access_mode() {
    let server = FakeApiServer::new();
    let text = call(
        &server,
        "create-pvc",
        args([
            ("namespace", json!("default")),
            ("name", json!("data")),
            ("size", json!("5Gi")),
            ("storageClass", json!("standard")),
        ]),
    )
    .await;

    assert_eq!(text, "Successfully pvc default/data is created");

    let writes = server.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].path, "/api/v1/namespaces/default/persistentvolumeclaims");
    let spec = &writes[0].body.as_ref().unwrap()["spec"];
    assert_eq!(spec["resources"]["requests"]["storage"], "5Gi");
    assert_eq!(spec["accessModes"], json!(["ReadWriteOnce"]));
    assert_eq!(spec["storageClassName"], "standard");
}

#[tokio::test]
async fn test_create_pvc_rejects_bad_size() {
    let server = FakeApiServer::new();
    let text = call(
        &server,
        "create-pvc",
        args([
            ("namespace", json!("default")),
            ("name", json!("data")),
            ("size", json!("lots")),
            ("storageClass", json!("standard")),
        ]),
    )
    .await;

    assert_eq!(text, "Invalid pvc size: lots");
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_update_service_type_only() {
    let path = "/api/v1/namespaces/default/services/web";
    let service = json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": {"name": "web", "namespace": "default"},
        "spec": {
            "type": "ClusterIP",
            "selector": {"app": "web"},
            "ports": [{"port": 80, "targetPort": 8080}]
        }
    });
    let server = FakeApiServer::new().with_object(path, service);

    let text = call(
        &server,
        "update-service",
        args([
            ("namespace", json!("default")),
            ("name", json!("web")),
            ("svctype", json!("LoadBalancer")),
        ]),
    )
    .await;

    assert_eq!(
        text,
        "Successfully service default/web updated with type LoadBalancer"
    );

    let body = server.writes()[0].body.clone().unwrap();
    assert_eq!(body["spec"]["type"], "LoadBalancer");
    assert_eq!(body["spec"]["selector"], json!({"app": "web"}));
    assert_eq!(body["spec"]["ports"][0]["port"], 80);
}

#[tokio::test]
async fn test_get_missing_pod_reports_name() {
    let server = FakeApiServer::new();
    let text = call(
        &server,
        "get-pod",
        args([("namespace", json!("default")), ("name", json!("ghost"))]),
    )
    .await;

    assert!(text.contains("Error in getting"), "{text}");
    assert!(text.contains("ghost"), "{text}");
}

#[tokio::test]
async fn test_list_pod_with_no_namespaces_is_empty_array() {
    let server = FakeApiServer::new().with_list("/api/v1/namespaces", vec![]);
    let text = call(&server, "list-pod", args([])).await;
    assert_eq!(text, "[]");
}

#[tokio::test]
async fn test_list_pod_walks_every_namespace() {
    let server = FakeApiServer::new()
        .with_list(
            "/api/v1/namespaces",
            vec![namespace("default"), namespace("kube-system")],
        )
        .with_list(
            "/api/v1/namespaces/default/pods",
            vec![pod("default", "web", "Running")],
        )
        .with_list(
            "/api/v1/namespaces/kube-system/pods",
            vec![pod("kube-system", "dns", "Pending")],
        );

    let text = call(&server, "list-pod", args([])).await;
    let value: Value = serde_json::from_str(&text).unwrap();
    let pods = value.as_array().unwrap();
    assert_eq!(pods.len(), 2);
    assert_eq!(pods[0]["name"], "web");
    assert_eq!(pods[0]["status"], "Running");
    assert_eq!(pods[1]["namespace"], "kube-system");
    assert!(pods[0].get("containerNames").is_none());
}

#[tokio::test]
async fn test_list_pod_in_namespace_passes_label_selector() {
    let server = FakeApiServer::new().with_list("/api/v1/namespaces/default/pods", vec![]);
    let text = call(
        &server,
        "list-pod-in-namespace",
        args([("namespace", json!("default")), ("label", json!("app=web"))]),
    )
    .await;

    assert_eq!(text, "[]");
    let request = &server.requests()[0];
    assert!(request.query.contains("labelSelector=app%3Dweb"), "{}", request.query);
}

#[tokio::test]
async fn test_pod_log() {
    let server = FakeApiServer::new().with_log(
        "/api/v1/namespaces/default/pods/web/log",
        "starting\nready\n",
    );
    let text = call(
        &server,
        "pod-log",
        args([
            ("namespace", json!("default")),
            ("name", json!("web")),
            ("containerName", json!("app")),
            ("tailLine", json!(20)),
        ]),
    )
    .await;

    assert_eq!(text, "starting\nready\n");
    let query = &server.requests()[0].query;
    assert!(query.contains("tailLines=20"), "{query}");
    assert!(query.contains("container=app"), "{query}");
}

#[tokio::test]
async fn test_delete_configmap() {
    let server = FakeApiServer::new().with_object(
        "/api/v1/namespaces/default/configmaps/settings",
        json!({"apiVersion": "v1", "kind": "ConfigMap", "metadata": {"name": "settings"}}),
    );
    let text = call(
        &server,
        "delete-configmap",
        args([("namespace", json!("default")), ("name", json!("settings"))]),
    )
    .await;

    assert_eq!(text, "Configmap default/settings is deleted");
    assert_eq!(server.writes()[0].method, "DELETE");
}

#[tokio::test]
async fn test_create_statefulset_creates_service_first() {
    let server = FakeApiServer::new();
    let text = call(
        &server,
        "create-statefulset",
        args([
            ("namespace", json!("db")),
            ("name", json!("pg")),
            ("containerImages", json!("postgres:16")),
            ("storageValue", json!("10Gi")),
            ("mountPath", json!("/var/lib/postgresql")),
        ]),
    )
    .await;

    assert_eq!(text, "Successfully statefulset db/pg is created with service pg");

    let writes = server.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0].path, "/api/v1/namespaces/db/services");
    assert_eq!(writes[1].path, "/apis/apps/v1/namespaces/db/statefulsets");
    let spec = &writes[1].body.as_ref().unwrap()["spec"];
    assert_eq!(spec["serviceName"], "pg");
    assert_eq!(
        spec["volumeClaimTemplates"][0]["spec"]["resources"]["requests"]["storage"],
        "10Gi"
    );
}

#[tokio::test]
async fn test_get_cluster_scoped_storage_class() {
    let server = FakeApiServer::new().with_object(
        "/apis/storage.k8s.io/v1/storageclasses/standard",
        json!({
            "apiVersion": "storage.k8s.io/v1",
            "kind": "StorageClass",
            "metadata": {"name": "standard"},
            "provisioner": "rancher.io/local-path",
            "reclaimPolicy": "Delete"
        }),
    );

    let text = call(&server, "get-storageClass", args([("name", json!("standard"))])).await;
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        value,
        json!({"name": "standard", "provisioner": "rancher.io/local-path", "reclaimPolicy": "Delete"})
    );
}

fn service_json(namespace: &str, name: &str, service_type: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": {"name": name, "namespace": namespace},
        "spec": {"type": service_type, "clusterIP": "10.0.0.10"}
    })
}

fn pvc_json() -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "PersistentVolumeClaim",
        "metadata": {"name": "data", "namespace": "default"},
        "spec": {
            "accessModes": ["ReadWriteOnce"],
            "storageClassName": "standard",
            "resources": {"requests": {"storage": "5Gi"}}
        },
        "status": {"phase": "Bound"}
    })
}

#[tokio::test]
async fn test_delete_service() {
    let path = "/api/v1/namespaces/default/services/web";
    let server = FakeApiServer::new().with_object(path, service_json("default", "web", "ClusterIP"));

    let text = call(
        &server,
        "delete-service",
        args([("namespace", json!("default")), ("name", json!("web"))]),
    )
    .await;

    assert_eq!(text, "Service default/web is deleted");
    let writes = server.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].method, "DELETE");
    assert_eq!(writes[0].path, path);
}

#[tokio::test]
async fn test_list_service_collects_every_namespace() {
    let server = FakeApiServer::new()
        .with_list(
            "/api/v1/namespaces",
            vec![namespace("default"), namespace("kube-system")],
        )
        .with_list(
            "/api/v1/namespaces/default/services",
            vec![service_json("default", "web", "ClusterIP")],
        )
        .with_list(
            "/api/v1/namespaces/kube-system/services",
            vec![
                service_json("kube-system", "dns", "ClusterIP"),
                service_json("kube-system", "ingress", "LoadBalancer"),
            ],
        );

    let text = call(&server, "list-service", args([])).await;
    let value: Value = serde_json::from_str(&text).unwrap();
    let names: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    assert_eq!(names, vec!["web", "dns", "ingress"]);
    assert_eq!(value[2]["type"], "LoadBalancer");
    assert!(server.writes().is_empty());
}

#[tokio::test]
async fn test_update_pvc_resizes_claim() {
    let path = "/api/v1/namespaces/default/persistentvolumeclaims/data";
    let server = FakeApiServer::new().with_object(path, pvc_json());

    let text = call(
        &server,
        "update-pvc",
        args([
            ("namespace", json!("default")),
            ("name", json!("data")),
            ("size", json!("10Gi")),
        ]),
    )
    .await;

    assert_eq!(text, "Successfully pvc default/data updated with size 10Gi");

    let writes = server.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].method, "PUT");
    assert_eq!(writes[0].path, path);
    let spec = &writes[0].body.as_ref().unwrap()["spec"];
    assert_eq!(spec["resources"]["requests"]["storage"], "10Gi");
    assert_eq!(spec["storageClassName"], "standard");
}

#[tokio::test]
async fn test_update_pvc_rejects_bad_size() {
    let server = FakeApiServer::new().with_object(
        "/api/v1/namespaces/default/persistentvolumeclaims/data",
        pvc_json(),
    );

    let text = call(
        &server,
        "update-pvc",
        args([
            ("namespace", json!("default")),
            ("name", json!("data")),
            ("size", json!("ten gigs")),
        ]),
    )
    .await;

    assert_eq!(text, "Invalid pvc size: ten gigs");
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_create_statefulset_rejects_bad_storage_value() {
    let server = FakeApiServer::new();
    let text = call(
        &server,
        "create-statefulset",
        args([
            ("namespace", json!("db")),
            ("name", json!("pg")),
            ("containerImages", json!("postgres:16")),
            ("storageValue", json!("10GB")),
            ("mountPath", json!("/var/lib/postgresql")),
        ]),
    )
    .await;

    assert_eq!(text, "Invalid storage value for statefulset: 10GB");
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_pod_log_default_tail() {
    let server = FakeApiServer::new().with_log("/api/v1/namespaces/default/pods/web/log", "ready\n");
    let text = call(
        &server,
        "pod-log",
        args([
            ("namespace", json!("default")),
            ("name", json!("web")),
            ("containerName", json!("app")),
        ]),
    )
    .await;

    assert_eq!(text, "ready\n");
    let query = &server.requests()[0].query;
    assert!(query.contains("tailLines=100"), "{query}");
}
