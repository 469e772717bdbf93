//! Mutating admission webhook
//!
//! Exposes the route reconciler over HTTP. The API server sends an
//! `AdmissionReview` for every Route create/update; the handler answers with
//! the JSON patch assigning the route to an IngressController and host.

pub mod route;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::cluster::ClusterSource;
use crate::config::Config;

/// Path the Route mutation endpoint is served on
pub const MUTATE_ROUTES_PATH: &str = "/mutate/routes";

/// Shared state for webhook handlers
#[derive(Clone)]
pub struct WebhookState {
    /// Cluster reads for controllers and namespaces
    pub source: Arc<dyn ClusterSource>,
    /// Frozen reconciliation settings
    pub config: Arc<Config>,
}

impl WebhookState {
    /// Create a new webhook state
    pub fn new(source: Arc<dyn ClusterSource>, config: Arc<Config>) -> Self {
        Self { source, config }
    }
}

/// Create the webhook router
///
/// - POST /mutate/routes - mutate Routes
/// - GET /healthz - liveness
pub fn webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route(MUTATE_ROUTES_PATH, post(route::mutate_handler))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}
