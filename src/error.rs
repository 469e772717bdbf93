//! Error types for the route host webhook
//!
//! Errors carry the route identity and the step that failed so that a denied
//! admission request can be diagnosed from its message alone.

use thiserror::Error;

use crate::hostname::TemplateError;

/// Main error type for webhook operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Kubernetes API error
    #[error("kubernetes error: {source}")]
    Kube {
        /// The underlying kube-rs error
        #[from]
        source: kube::Error,
    },

    /// Invalid startup configuration
    #[error("configuration error [{setting}]: {message}")]
    Config {
        /// Name of the offending setting (e.g. "DEFAULT_ROUTER")
        setting: String,
        /// Description of what's invalid
        message: String,
    },

    /// Hostname template failed to compile
    #[error("hostname template error: {0}")]
    Template(#[from] TemplateError),

    /// No ingress controller could be resolved for a route
    #[error("no ingress controller for route {route}: {message}")]
    Resolution {
        /// Route identity as `namespace/name`
        route: String,
        /// Description of why nothing was resolved
        message: String,
    },

    /// A cluster lookup the engine depends on failed
    #[error("failed to {step} for route {route}: {message}")]
    Collaborator {
        /// Route identity as `namespace/name`
        route: String,
        /// The step that failed (e.g. "list ingress controllers")
        step: String,
        /// The underlying failure
        message: String,
    },

    /// The resolved controller has no domain but the template needs one
    #[error("ingress controller {controller} has no domain to render a host for route {route}")]
    MissingDomain {
        /// Name of the resolved controller
        controller: String,
        /// Route identity as `namespace/name`
        route: String,
    },

    /// A host cannot be generated for the route
    #[error("cannot generate host for route {route}: {message}")]
    InvalidHost {
        /// Route identity as `namespace/name`
        route: String,
        /// Why the host cannot be generated
        message: String,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The resource kind being (de)serialized, if known
        kind: Option<String>,
    },
}

impl Error {
    /// Create a configuration error for the named setting
    pub fn config(setting: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Config {
            setting: setting.into(),
            message: msg.into(),
        }
    }

    /// Create a resolution error for a route
    pub fn resolution(route: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Resolution {
            route: route.into(),
            message: msg.into(),
        }
    }

    /// Create a collaborator error for a route and failing step
    pub fn collaborator(
        route: impl Into<String>,
        step: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Collaborator {
            route: route.into(),
            step: step.into(),
            message: msg.into(),
        }
    }

    /// Create a missing domain error
    pub fn missing_domain(controller: impl Into<String>, route: impl Into<String>) -> Self {
        Self::MissingDomain {
            controller: controller.into(),
            route: route.into(),
        }
    }

    /// Create an invalid host error for a route
    pub fn invalid_host(route: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidHost {
            route: route.into(),
            message: msg.into(),
        }
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: None,
        }
    }

    /// Create a serialization error for a specific resource kind
    pub fn serialization_for(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: Some(kind.into()),
        }
    }

    /// Whether the error is a startup configuration problem
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Template(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
