//! Cluster lookups the reconciler depends on
//!
//! The engine only needs two reads: the current set of IngressControllers and,
//! sometimes, the labels of the route's namespace. Both go through
//! [`ClusterSource`] so tests can substitute a mock.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::{Api, ListParams};
use kube::Client;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::crd::IngressController;
use crate::Error;

/// Namespace the OpenShift ingress operator keeps IngressControllers in
pub const INGRESS_OPERATOR_NAMESPACE: &str = "openshift-ingress-operator";

/// Trait abstracting the Kubernetes reads made while reconciling a route
///
/// Implementations must not cache across calls: each admission request works
/// on a fresh snapshot.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterSource: Send + Sync {
    /// List every candidate IngressController, in API order
    async fn list_ingress_controllers(&self) -> Result<Vec<IngressController>, Error>;

    /// Get a namespace by name
    async fn get_namespace(&self, name: &str) -> Result<Namespace, Error>;
}

/// [`ClusterSource`] backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeClusterSource {
    client: Client,
    operator_namespace: String,
}

impl KubeClusterSource {
    /// Create a source listing controllers in `operator_namespace`
    pub fn new(client: Client, operator_namespace: impl Into<String>) -> Self {
        Self {
            client,
            operator_namespace: operator_namespace.into(),
        }
    }
}

#[async_trait]
impl ClusterSource for KubeClusterSource {
    async fn list_ingress_controllers(&self) -> Result<Vec<IngressController>, Error> {
        let api: Api<IngressController> =
            Api::namespaced(self.client.clone(), &self.operator_namespace);
        let list = api.list(&ListParams::default()).await?;

        debug!(
            namespace = %self.operator_namespace,
            count = list.items.len(),
            "Listed ingress controllers"
        );
        Ok(list.items)
    }

    async fn get_namespace(&self, name: &str) -> Result<Namespace, Error> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        Ok(api.get(name).await?)
    }
}
