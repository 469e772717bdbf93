//! Label selector evaluation
//!
//! Selectors are parsed into kube's [`Selector`] and matched with
//! [`SelectorExt`]. Every `matchLabels` entry and every `matchExpressions`
//! requirement must hold, and an empty selector matches everything. A selector
//! Kubernetes would reject (unknown operator, `In`/`NotIn` without values)
//! matches nothing.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::core::{Selector, SelectorExt};
use tracing::warn;

/// Check whether `labels` satisfy `selector`
///
/// `None` labels are treated as an empty label set.
pub fn selector_matches(labels: Option<&BTreeMap<String, String>>, selector: &LabelSelector) -> bool {
    let empty = BTreeMap::new();
    let labels = labels.unwrap_or(&empty);

    match Selector::try_from(selector.clone()) {
        Ok(parsed) => parsed.matches(labels),
        Err(e) => {
            warn!(selector = ?selector, error = %e, "Invalid label selector matches nothing");
            false
        }
    }
}

/// Labels a selector requires verbatim (its `matchLabels`)
///
/// Expressions are not included: they constrain values without naming one.
pub fn required_labels(selector: &LabelSelector) -> Option<&BTreeMap<String, String>> {
    selector.match_labels.as_ref()
}
