//! Route reconciliation
//!
//! Turns one admitted Route into the ordered patch list that assigns it to an
//! IngressController and gives it the right host. The function is stateless:
//! the controller list and namespace are read fresh through the
//! [`ClusterSource`] on every call, and only the read-only [`Config`] is shared.

use json_patch::PatchOperation;
use kube::ResourceExt;
use tracing::{debug, info, instrument};

use crate::classify::is_system_route;
use crate::cluster::ClusterSource;
use crate::config::Config;
use crate::crd::{IngressController, Route};
use crate::hostname::{HostnameVars, Variable};
use crate::patch::{label_patches, HostDecision};
use crate::resolver::resolve_controller;
use crate::selector::required_labels;
use crate::Error;

/// Compute the patches that enforce controller and host for `route`
///
/// An empty result means the route is admitted unchanged.
///
/// # Errors
///
/// - the controller list cannot be read
/// - no controller matches and the default controller does not exist
/// - the host must be rendered but the controller has no domain
#[instrument(skip_all, fields(route = %route.identity()))]
pub async fn reconcile_route<S: ClusterSource + ?Sized>(
    route: &Route,
    config: &Config,
    source: &S,
) -> Result<Vec<PatchOperation>, Error> {
    if !config.mutate_system_routes() && is_system_route(route) {
        info!("Ignoring route mutation because it is in a system namespace");
        return Ok(Vec::new());
    }

    let controllers = source
        .list_ingress_controllers()
        .await
        .map_err(|e| Error::collaborator(route.identity(), "list ingress controllers", e.to_string()))?;

    let resolution = resolve_controller(route, source, &controllers, config.default_router())
        .await
        .ok_or_else(|| {
            Error::resolution(
                route.identity(),
                format!(
                    "no ingress controller matches and default controller {:?} does not exist",
                    config.default_router()
                ),
            )
        })?;
    let controller = resolution.controller;

    let mut patches = Vec::new();

    if let Some(required) = controller
        .spec
        .route_selector
        .as_ref()
        .and_then(required_labels)
    {
        patches.extend(label_patches(route.label_map(), required));
    }

    let host = HostDecision::decide(route.host(), config.owned_hosts(), || {
        render_host(config, route, controller)
    })?;
    debug!(
        controller = %controller.name_any(),
        current = %route.host(),
        decision = ?host,
        "Host decision"
    );
    patches.extend(host.into_patch());

    if !patches.is_empty() {
        info!(
            controller = %controller.name_any(),
            reason = %resolution.selection,
            patch_ops = patches.len(),
            "Route needs mutation"
        );
    }

    Ok(patches)
}

/// Render the desired host for `route` served by `controller`
///
/// Only the assigned `metadata.name` is used; a `generateName` prefix is not a
/// name yet. The rendered host is never empty.
fn render_host(config: &Config, route: &Route, controller: &IngressController) -> Result<String, Error> {
    let template = config.hostname_template();
    let domain = controller.effective_domain();
    if domain.is_empty() && template.uses(Variable::RouterDomain) {
        return Err(Error::missing_domain(controller.name_any(), route.identity()));
    }

    let route_name = route.metadata.name.as_deref().unwrap_or_default();
    if route_name.is_empty() && template.uses(Variable::RouteName) {
        return Err(Error::invalid_host(
            route.identity(),
            "route has no name yet and the template uses <name>",
        ));
    }

    let router_name = controller.name_any();
    let host = template.render(&HostnameVars {
        route_name,
        route_namespace: route.namespace_str(),
        router_name: &router_name,
        router_domain: domain,
    });
    if host.is_empty() {
        return Err(Error::invalid_host(route.identity(), "template rendered an empty host"));
    }
    Ok(host)
}
