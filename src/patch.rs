//! JSON patch construction
//!
//! Label patches come first, in ascending key order, followed by at most one
//! host patch. Operations are only ever `add` or `replace`.

use std::collections::BTreeMap;

use json_patch::{AddOperation, PatchOperation, ReplaceOperation};
use jsonptr::PointerBuf;
use serde_json::Value;

use crate::ownership::OwnedHosts;

/// JSON pointer to the route host
pub fn host_path() -> PointerBuf {
    PointerBuf::from_tokens(["spec", "host"])
}

/// JSON pointer to a single route label; `/` and `~` in the key are escaped
pub fn label_path(key: &str) -> PointerBuf {
    PointerBuf::from_tokens(["metadata", "labels", key])
}

fn labels_path() -> PointerBuf {
    PointerBuf::from_tokens(["metadata", "labels"])
}

/// Build the patches that make `current` carry every `required` label
///
/// A missing key is added, a key with a different value is replaced, and a
/// key already holding the required value is left alone. When the object has
/// no label map at all the whole map is added in one operation, since a JSON
/// patch cannot add into a parent that does not exist.
pub fn label_patches(
    current: Option<&BTreeMap<String, String>>,
    required: &BTreeMap<String, String>,
) -> Vec<PatchOperation> {
    let Some(current) = current else {
        if required.is_empty() {
            return Vec::new();
        }
        let map = required
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        return vec![PatchOperation::Add(AddOperation {
            path: labels_path(),
            value: Value::Object(map),
        })];
    };

    required
        .iter()
        .filter_map(|(key, value)| match current.get(key) {
            None => Some(PatchOperation::Add(AddOperation {
                path: label_path(key),
                value: Value::String(value.clone()),
            })),
            Some(existing) if existing != value => Some(PatchOperation::Replace(ReplaceOperation {
                path: label_path(key),
                value: Value::String(value.clone()),
            })),
            Some(_) => None,
        })
        .collect()
}

/// What to do with a route's host
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostDecision {
    /// Host is empty: set it
    Add(String),
    /// Host is owned and stale: regenerate it
    Replace(String),
    /// Host is already correct
    Unchanged,
    /// Host was chosen by a user: leave it
    UserOwned,
}

impl HostDecision {
    /// Decide what to do with `current`, rendering the desired host on demand
    ///
    /// `render` is only called when the host is empty or owned, so failures
    /// while rendering cannot affect routes with user-chosen hosts.
    pub fn decide<E>(
        current: &str,
        owned: &OwnedHosts,
        render: impl FnOnce() -> Result<String, E>,
    ) -> Result<Self, E> {
        if current.is_empty() {
            return Ok(Self::Add(render()?));
        }
        if !owned.is_owned(current) {
            return Ok(Self::UserOwned);
        }

        let desired = render()?;
        if desired == current {
            Ok(Self::Unchanged)
        } else {
            Ok(Self::Replace(desired))
        }
    }

    /// The patch operation enforcing this decision, if any
    pub fn into_patch(self) -> Option<PatchOperation> {
        match self {
            Self::Add(host) => Some(PatchOperation::Add(AddOperation {
                path: host_path(),
                value: Value::String(host),
            })),
            Self::Replace(host) => Some(PatchOperation::Replace(ReplaceOperation {
                path: host_path(),
                value: Value::String(host),
            })),
            Self::Unchanged | Self::UserOwned => None,
        }
    }
}
