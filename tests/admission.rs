//! End-to-end tests for route admission
//!
//! These drive the public surface only: the axum router for HTTP round trips
//! and `reconcile_route` for patch convergence. The cluster is an in-memory
//! fake so no API server is needed.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use k8s_openapi::api::core::v1::Namespace;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use serde_json::{json, Value};
use tower::ServiceExt;

use route_host_webhook::cluster::ClusterSource;
use route_host_webhook::config::Config;
use route_host_webhook::crd::{IngressController, IngressControllerSpec, Route};
use route_host_webhook::ownership::OwnedHosts;
use route_host_webhook::reconcile::reconcile_route;
use route_host_webhook::webhook::{webhook_router, WebhookState, MUTATE_ROUTES_PATH};
use route_host_webhook::Error;

// =============================================================================
// Fixtures
// =============================================================================

/// In-memory cluster holding controllers and namespaces
#[derive(Default)]
struct FakeCluster {
    controllers: Vec<IngressController>,
    namespaces: BTreeMap<String, Namespace>,
}

impl FakeCluster {
    fn with_controller(mut self, controller: IngressController) -> Self {
        self.controllers.push(controller);
        self
    }

    fn with_namespace(mut self, name: &str, labels: &[(&str, &str)]) -> Self {
        let namespace = Namespace {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                labels: Some(pairs(labels)),
                ..Default::default()
            },
            ..Default::default()
        };
        self.namespaces.insert(name.to_string(), namespace);
        self
    }
}

#[async_trait]
impl ClusterSource for FakeCluster {
    async fn list_ingress_controllers(&self) -> Result<Vec<IngressController>, Error> {
        Ok(self.controllers.clone())
    }

    async fn get_namespace(&self, name: &str) -> Result<Namespace, Error> {
        self.namespaces
            .get(name)
            .cloned()
            .ok_or_else(|| Error::serialization(format!("namespace {name} not found")))
    }
}

fn pairs(labels: &[(&str, &str)]) -> BTreeMap<String, String> {
    labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn selector(labels: &[(&str, &str)]) -> Option<LabelSelector> {
    Some(LabelSelector {
        match_labels: Some(pairs(labels)),
        match_expressions: None,
    })
}

fn controller(
    name: &str,
    domain: &str,
    route_selector: Option<LabelSelector>,
    namespace_selector: Option<LabelSelector>,
) -> IngressController {
    IngressController::new(
        name,
        IngressControllerSpec {
            domain: Some(domain.to_string()),
            route_selector,
            namespace_selector,
            ..Default::default()
        },
    )
}

fn config(default_router: &str) -> Config {
    Config::new(
        default_router,
        OwnedHosts::parse(".apps.example.com, .internal.example.com"),
        "<name>-<ns>.<router-domain>",
        false,
    )
    .unwrap()
}

/// A multi-router cluster: a labelled public router and the internal default
fn multi_router_cluster() -> FakeCluster {
    FakeCluster::default()
        .with_controller(controller(
            "public",
            "apps.example.com",
            selector(&[("exposure", "public")]),
            None,
        ))
        .with_controller(controller(
            "internal-router",
            "internal.example.com",
            selector(&[("exposure", "internal")]),
            None,
        ))
}

fn route_json(namespace: &str, labels: Option<Value>, host: Option<&str>) -> Value {
    let mut metadata = json!({"name": "shop", "namespace": namespace});
    if let Some(labels) = labels {
        metadata["labels"] = labels;
    }
    let mut spec = json!({"to": {"kind": "Service", "name": "shop"}});
    if let Some(host) = host {
        spec["host"] = Value::String(host.to_string());
    }
    json!({
        "apiVersion": "route.openshift.io/v1",
        "kind": "Route",
        "metadata": metadata,
        "spec": spec
    })
}

/// Reconcile, apply the patch, and reconcile the patched object again
async fn converge(doc: &mut Value, config: &Config, cluster: &FakeCluster) -> usize {
    let route: Route = serde_json::from_value(doc.clone()).unwrap();
    let ops = reconcile_route(&route, config, cluster).await.unwrap();
    let applied = ops.len();
    json_patch::patch(doc, &json_patch::Patch(ops)).unwrap();

    let patched: Route = serde_json::from_value(doc.clone()).unwrap();
    let again = reconcile_route(&patched, config, cluster).await.unwrap();
    assert!(again.is_empty(), "second pass should be a no-op, got {again:?}");
    applied
}

fn admission_review(object: Value) -> Value {
    json!({
        "apiVersion": "admission.k8s.io/v1",
        "kind": "AdmissionReview",
        "request": {
            "uid": "2f6c1f0e-1111-4c3b-9d52-5b0e0f4a9a01",
            "kind": {"group": "route.openshift.io", "version": "v1", "kind": "Route"},
            "resource": {"group": "route.openshift.io", "version": "v1", "resource": "routes"},
            "operation": "CREATE",
            "userInfo": {"username": "developer"},
            "namespace": "shop",
            "name": "shop",
            "dryRun": false,
            "object": object
        }
    })
}

async fn post_review(cluster: FakeCluster, config: Config, review: Value) -> Value {
    let state = Arc::new(WebhookState::new(Arc::new(cluster), Arc::new(config)));
    let request = Request::builder()
        .method("POST")
        .uri(MUTATE_ROUTES_PATH)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&review).unwrap()))
        .unwrap();

    let response = webhook_router(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

// =============================================================================
// Story: patches converge
// =============================================================================

/// Story: a fresh route converges in one admission
#[tokio::test]
async fn story_fresh_route_converges_after_one_patch() {
    let cluster = multi_router_cluster();
    let mut doc = route_json("shop", Some(json!({})), None);

    let applied = converge(&mut doc, &config("internal-router"), &cluster).await;
    assert_eq!(applied, 2);
    assert_eq!(doc["metadata"]["labels"]["exposure"], "internal");
    assert_eq!(doc["spec"]["host"], "shop-shop.internal.example.com");
}

/// Story: a route without any label map gets the whole map added
#[tokio::test]
async fn story_route_without_label_map_converges() {
    let cluster = multi_router_cluster();
    let mut doc = route_json("shop", None, None);

    converge(&mut doc, &config("internal-router"), &cluster).await;
    assert_eq!(doc["metadata"]["labels"], json!({"exposure": "internal"}));
}

/// Story: moving a route to another router rewrites its generated host
#[tokio::test]
async fn story_relabelled_route_moves_host_to_new_router() {
    let cluster = multi_router_cluster();
    let mut doc = route_json(
        "shop",
        Some(json!({"exposure": "public"})),
        Some("shop-shop.internal.example.com"),
    );

    let applied = converge(&mut doc, &config("internal-router"), &cluster).await;
    assert_eq!(applied, 1);
    assert_eq!(doc["spec"]["host"], "shop-shop.apps.example.com");
}

/// Story: a user-chosen host survives while labels still converge
#[tokio::test]
async fn story_user_host_survives_label_convergence() {
    let cluster = multi_router_cluster();
    let mut doc = route_json("shop", Some(json!({"exposure": "nowhere"})), Some("shop.customer.io"));

    converge(&mut doc, &config("internal-router"), &cluster).await;
    assert_eq!(doc["metadata"]["labels"]["exposure"], "internal");
    assert_eq!(doc["spec"]["host"], "shop.customer.io");
}

/// Story: a namespace selector routes whole teams to a router
#[tokio::test]
async fn story_namespace_selector_picks_router() {
    let cluster = FakeCluster::default()
        .with_controller(controller(
            "team-router",
            "team.apps.example.com",
            None,
            selector(&[("team", "shop")]),
        ))
        .with_controller(controller("internal-router", "internal.example.com", None, None))
        .with_namespace("shop", &[("team", "shop")]);
    let mut doc = route_json("shop", Some(json!({})), None);

    converge(&mut doc, &config("internal-router"), &cluster).await;
    assert_eq!(doc["spec"]["host"], "shop-shop.team.apps.example.com");
}

// =============================================================================
// Story: HTTP surface
// =============================================================================

/// Story: the API server receives a JSONPatch for a route needing a host
#[tokio::test]
async fn story_http_review_returns_json_patch() {
    let review = admission_review(route_json("shop", Some(json!({"exposure": "public"})), None));

    let body = post_review(multi_router_cluster(), config("internal-router"), review).await;
    let response = &body["response"];
    assert_eq!(response["uid"], "2f6c1f0e-1111-4c3b-9d52-5b0e0f4a9a01");
    assert_eq!(response["allowed"], true);
    assert_eq!(response["patchType"], "JSONPatch");
    assert!(response["patch"].is_string());
}

/// Story: a conforming route is allowed without a patch
#[tokio::test]
async fn story_http_review_conforming_route_has_no_patch() {
    let review = admission_review(route_json(
        "shop",
        Some(json!({"exposure": "public"})),
        Some("shop-shop.apps.example.com"),
    ));

    let body = post_review(multi_router_cluster(), config("internal-router"), review).await;
    assert_eq!(body["response"]["allowed"], true);
    assert!(body["response"].get("patch").map_or(true, Value::is_null));
}

/// Story: a missing default router is reported back to the user
#[tokio::test]
async fn story_http_review_denies_when_nothing_resolves() {
    let review = admission_review(route_json("shop", Some(json!({})), None));

    let body = post_review(multi_router_cluster(), config("does-not-exist"), review).await;
    assert_eq!(body["response"]["allowed"], false);
    let message = body["response"]["status"]["message"].as_str().unwrap();
    assert!(message.contains("shop/shop"));
    assert!(message.contains("does-not-exist"));
}

#[tokio::test]
async fn healthz_reports_ok() {
    let state = Arc::new(WebhookState::new(
        Arc::new(FakeCluster::default()),
        Arc::new(config("internal-router")),
    ));
    let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();

    let response = webhook_router(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");
}
