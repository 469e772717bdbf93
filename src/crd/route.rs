//! OpenShift Route (`route.openshift.io/v1`)

use std::collections::BTreeMap;

use kube::api::GroupVersionKind;
use kube::{CustomResource, ResourceExt};
use serde::{Deserialize, Serialize};

/// Specification for a Route
///
/// Only the fields the webhook reads are modelled; everything else in the
/// admitted object is left alone because mutations are expressed as patches.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[kube(
    group = "route.openshift.io",
    version = "v1",
    kind = "Route",
    plural = "routes",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    /// Requested hostname; empty or absent means "pick one for me"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl Route {
    /// Whether an admission request kind refers to a Route
    pub fn is_route_kind(kind: &GroupVersionKind) -> bool {
        kind.group == "route.openshift.io" && kind.version == "v1" && kind.kind == "Route"
    }

    /// Current host, empty when unset
    pub fn host(&self) -> &str {
        self.spec.host.as_deref().unwrap_or_default()
    }

    /// Route namespace, empty when unset
    pub fn namespace_str(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or_default()
    }

    /// Route labels, `None` when the object carries no label map at all
    pub fn label_map(&self) -> Option<&BTreeMap<String, String>> {
        self.metadata.labels.as_ref()
    }

    /// `namespace/name` identity used in logs and errors
    pub fn identity(&self) -> String {
        format!("{}/{}", self.namespace_str(), self.name_any())
    }
}
