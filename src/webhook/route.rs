//! Route Mutation Webhook
//!
//! Handles AdmissionReview requests for Routes, assigning each route to an
//! IngressController and enforcing its generated hostname.

use std::sync::Arc;

use axum::{extract::State, Json};
use kube::{
    api::DynamicObject,
    core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview},
};
use tracing::{debug, error, info, warn};

use crate::crd::Route;
use crate::reconcile::reconcile_route;
use crate::Error;

use super::WebhookState;

/// Handle mutating admission review for Routes
pub async fn mutate_handler(
    State(state): State<Arc<WebhookState>>,
    Json(body): Json<AdmissionReview<DynamicObject>>,
) -> Json<AdmissionReview<DynamicObject>> {
    let req: AdmissionRequest<DynamicObject> = match body.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to parse admission request");
            return Json(AdmissionResponse::invalid(e.to_string()).into_review());
        }
    };

    let response = mutate_route(&state, &req).await;
    Json(response.into_review())
}

/// Process a single route mutation request
pub async fn mutate_route(
    state: &WebhookState,
    request: &AdmissionRequest<DynamicObject>,
) -> AdmissionResponse {
    let uid = &request.uid;

    if !Route::is_route_kind(&request.kind) {
        warn!(
            uid = %uid,
            kind = ?request.kind,
            "Request for a kind other than route.openshift.io/v1 Route, allowing unchanged"
        );
        return AdmissionResponse::from(request);
    }

    let Some(obj) = &request.object else {
        debug!(uid = %uid, "No route object in request, allowing unchanged");
        return AdmissionResponse::from(request);
    };

    let route = match parse_route(obj, request.namespace.as_deref()) {
        Ok(route) => route,
        Err(e) => {
            error!(uid = %uid, error = %e, "Could not deserialize route");
            return AdmissionResponse::from(request).deny(e.to_string());
        }
    };

    let patches = match reconcile_route(&route, &state.config, state.source.as_ref()).await {
        Ok(patches) => patches,
        Err(e) => {
            error!(uid = %uid, route = %route.identity(), error = %e, "Route reconciliation failed");
            return AdmissionResponse::from(request).deny(e.to_string());
        }
    };

    if patches.is_empty() {
        debug!(uid = %uid, route = %route.identity(), "Route already conforms");
        return AdmissionResponse::from(request);
    }

    info!(
        uid = %uid,
        route = %route.identity(),
        patch_ops = patches.len(),
        "Applying patch to route"
    );

    match AdmissionResponse::from(request).with_patch(json_patch::Patch(patches)) {
        Ok(response) => response,
        Err(e) => {
            error!(uid = %uid, error = %e, "Failed to serialize patch");
            AdmissionResponse::from(request).deny(format!("patch serialization error: {e}"))
        }
    }
}

/// Convert the admitted object into a typed Route
///
/// The request namespace fills in a missing object namespace.
fn parse_route(obj: &DynamicObject, request_namespace: Option<&str>) -> Result<Route, Error> {
    let value = serde_json::to_value(obj)?;
    let mut route: Route =
        serde_json::from_value(value).map_err(|e| Error::serialization_for("Route", e.to_string()))?;

    if route.metadata.namespace.as_deref().unwrap_or_default().is_empty() {
        route.metadata.namespace = request_namespace.map(str::to_string);
    }
    Ok(route)
}
