//! OpenShift IngressController (`operator.openshift.io/v1`)

use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Specification for an IngressController
///
/// A controller is a routing tier. Its selectors restrict which routes it
/// serves; its domain is the suffix for hostnames it generates.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[kube(
    group = "operator.openshift.io",
    version = "v1",
    kind = "IngressController",
    plural = "ingresscontrollers",
    namespaced,
    status = "IngressControllerStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct IngressControllerSpec {
    /// DNS domain served by this controller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Only routes whose labels match are served
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_selector: Option<LabelSelector>,

    /// Only routes in namespaces whose labels match are served
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<LabelSelector>,
}

/// Observed state of an IngressController
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngressControllerStatus {
    /// Domain actually in use, defaulted by the operator when spec.domain is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl IngressController {
    /// Domain used for generated hostnames
    ///
    /// `spec.domain` wins when set; otherwise the domain the operator reports
    /// in status. Empty when neither is known.
    pub fn effective_domain(&self) -> &str {
        self.spec
            .domain
            .as_deref()
            .filter(|d| !d.is_empty())
            .or_else(|| self.status.as_ref().and_then(|s| s.domain.as_deref()))
            .unwrap_or_default()
    }
}
