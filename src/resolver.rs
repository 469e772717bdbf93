//! Ingress controller resolution
//!
//! Decides which IngressController owns a route. Every controller is matched
//! against the route's labels (route selector) and, when it declares one, the
//! route namespace's labels (namespace selector). The namespace is fetched at
//! most once per resolution, on first need, and the outcome is remembered even
//! when the fetch fails.
//!
//! Tie-break once all controllers are evaluated:
//! - one match: that controller
//! - no match: the default controller, if the list contains it
//! - several matches: the second match when the first one is the default
//!   controller, otherwise the first match

use std::fmt;

use k8s_openapi::api::core::v1::Namespace;
use kube::ResourceExt;
use tracing::{debug, trace, warn};

use crate::cluster::ClusterSource;
use crate::crd::{IngressController, Route};
use crate::selector::selector_matches;

/// Why a controller was selected
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// It was the only controller matching the route
    OnlyMatch,
    /// Nothing matched; the default controller was used
    DefaultFallback,
    /// Several matched and the first was the default; the next match won
    NextAfterDefault,
    /// Several matched and the first was not the default
    FirstMatch,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OnlyMatch => "only match",
            Self::DefaultFallback => "no match found, default controller",
            Self::NextAfterDefault => "more than one match, next after default",
            Self::FirstMatch => "more than one match, first match",
        };
        f.write_str(s)
    }
}

/// Outcome of a successful resolution
#[derive(Clone, Debug)]
pub struct Resolution<'a> {
    /// The controller that owns the route
    pub controller: &'a IngressController,
    /// Why it was picked
    pub selection: Selection,
}

enum NamespaceState {
    Unfetched,
    Fetched(Box<Namespace>),
    Failed,
}

/// Route namespace, fetched on first use and remembered afterwards
struct LazyNamespace<'s, S: ?Sized> {
    source: &'s S,
    name: &'s str,
    state: NamespaceState,
}

impl<'s, S: ClusterSource + ?Sized> LazyNamespace<'s, S> {
    fn new(source: &'s S, name: &'s str) -> Self {
        Self {
            source,
            name,
            state: NamespaceState::Unfetched,
        }
    }

    async fn get(&mut self) -> Option<&Namespace> {
        if matches!(self.state, NamespaceState::Unfetched) {
            self.state = match self.source.get_namespace(self.name).await {
                Ok(ns) => NamespaceState::Fetched(Box::new(ns)),
                Err(e) => {
                    warn!(namespace = %self.name, error = %e, "Failed to read namespace information");
                    NamespaceState::Failed
                }
            };
        }

        match &self.state {
            NamespaceState::Fetched(ns) => Some(ns.as_ref()),
            _ => None,
        }
    }
}

/// Resolve the controller that owns `route`
///
/// `controllers` is evaluated in order; order matters for the tie-break.
/// Returns `None` when nothing matched and `default_router` is not in the list.
pub async fn resolve_controller<'a, S: ClusterSource + ?Sized>(
    route: &Route,
    source: &S,
    controllers: &'a [IngressController],
    default_router: &str,
) -> Option<Resolution<'a>> {
    let route_name = route.name_any();
    let mut namespace = LazyNamespace::new(source, route.namespace_str());
    let mut default_idx: Option<usize> = None;
    let mut matched: Vec<usize> = Vec::new();

    for (idx, controller) in controllers.iter().enumerate() {
        let controller_name = controller.name_any();
        if default_idx.is_none() && controller_name == default_router {
            default_idx = Some(idx);
        }

        let mut is_match = true;
        if let Some(selector) = &controller.spec.route_selector {
            is_match = selector_matches(route.label_map(), selector);
            trace!(
                route = %route_name,
                labels = ?route.label_map(),
                controller = %controller_name,
                selector = ?selector,
                matched = is_match,
                "Route selector evaluated"
            );
        }

        if is_match {
            if let Some(selector) = &controller.spec.namespace_selector {
                is_match = match namespace.get().await {
                    Some(ns) => {
                        let ns_match = selector_matches(ns.metadata.labels.as_ref(), selector);
                        trace!(
                            namespace = %ns.name_any(),
                            labels = ?ns.metadata.labels,
                            controller = %controller_name,
                            selector = ?selector,
                            matched = ns_match,
                            "Namespace selector evaluated"
                        );
                        ns_match
                    }
                    None => false,
                };
            }
        }

        if is_match {
            matched.push(idx);
        }
    }

    debug!(
        route = %route_name,
        matched = ?matched.iter().map(|&i| controllers[i].name_any()).collect::<Vec<_>>(),
        "Matched controllers"
    );

    let (idx, selection) = match matched.as_slice() {
        [only] => (*only, Selection::OnlyMatch),
        [] => (default_idx?, Selection::DefaultFallback),
        [first, second, ..] if Some(*first) == default_idx => (*second, Selection::NextAfterDefault),
        [first, ..] => (*first, Selection::FirstMatch),
    };

    let controller = &controllers[idx];
    debug!(
        route = %route_name,
        controller = %controller.name_any(),
        reason = %selection,
        "Selected controller"
    );

    Some(Resolution {
        controller,
        selection,
    })
}
