//! Route classification
//!
//! System routes belong to infrastructure namespaces and are left alone
//! unless system mutation is explicitly enabled.

use crate::crd::Route;

/// Namespaces whose routes are never mutated by default
pub const IGNORED_NAMESPACES: &[&str] = &["kube-system", "kube-public", "kube-node-lease"];

/// Suffix of a `/`-delimited namespace prefix that marks an OpenShift system object
const SYSTEM_PREFIX_SUFFIX: &str = ".openshift.io";

/// Whether a namespace string belongs to the system
///
/// True when the namespace is in [`IGNORED_NAMESPACES`], or when it carries a
/// `/`-delimited prefix ending in `.openshift.io` (e.g. `config.openshift.io/x`).
pub fn is_system_namespace(namespace: &str) -> bool {
    if IGNORED_NAMESPACES.contains(&namespace) {
        return true;
    }

    namespace
        .split_once('/')
        .is_some_and(|(prefix, _)| prefix.ends_with(SYSTEM_PREFIX_SUFFIX))
}

/// Whether a route is a system route
pub fn is_system_route(route: &Route) -> bool {
    is_system_namespace(route.namespace_str())
}
