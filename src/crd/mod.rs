//! Resource types consumed by the webhook
//!
//! These mirror the OpenShift `Route` and `IngressController` APIs closely
//! enough to read the fields the webhook decides on. They are owned by
//! OpenShift, so no schema is generated for them.

mod ingress_controller;
mod route;

pub use ingress_controller::{IngressController, IngressControllerSpec, IngressControllerStatus};
pub use route::{Route, RouteSpec};
