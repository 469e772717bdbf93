//! Route Host Webhook - ingress controller assignment for OpenShift Routes
//!
//! A mutating admission webhook for clusters running several IngressControllers
//! side by side. For every admitted Route it decides which controller serves
//! it, makes the route carry the labels that controller selects on, and gives
//! the route a hostname generated from a template bound to that controller.
//!
//! # Modules
//!
//! - [`crd`] - Route and IngressController resource types
//! - [`classify`] - System route detection
//! - [`selector`] - Label selector evaluation
//! - [`resolver`] - Controller resolution and tie-breaking
//! - [`hostname`] - Hostname template compilation and rendering
//! - [`ownership`] - Owned host suffixes
//! - [`patch`] - JSON patch construction
//! - [`reconcile`] - The per-route decision engine
//! - [`cluster`] - Kubernetes reads behind a mockable trait
//! - [`config`] - Startup configuration
//! - [`webhook`] - HTTP admission endpoint
//! - [`error`] - Error types

#![deny(missing_docs)]

pub mod classify;
pub mod cluster;
pub mod config;
pub mod crd;
pub mod error;
pub mod hostname;
pub mod ownership;
pub mod patch;
pub mod reconcile;
pub mod resolver;
pub mod selector;
pub mod webhook;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Default address the HTTPS webhook server listens on
///
/// Port 8443 is used instead of 443 to avoid requiring root privileges.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8443";
