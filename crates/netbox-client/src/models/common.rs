//! Reference shapes shared by every IPAM resource

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unrecognised key/value pairs carried alongside the declared fields
pub type Extra = Map<String, Value>;

/// Pointer to a related object, returned by NetBox as `{"id": 1, "display": "Foo", ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedRef {
    /// ID of the referenced object
    pub id: u64,
    /// Display name
    pub display: String,
    /// Any other keys NetBox sent
    #[serde(flatten)]
    pub extra: Extra,
}

impl NestedRef {
    /// Build a reference with no extra fields
    pub fn new(id: u64, display: impl Into<String>) -> Self {
        Self {
            id,
            display: display.into(),
            extra: Extra::new(),
        }
    }

    /// Human-readable name of the referenced object
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }
}

/// NetBox v4 choice field (status, role, ...): `{"value": "active", "label": "Active"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceRef {
    /// Machine value, e.g. `active`
    pub value: String,
    /// Human label, e.g. `Active`
    pub label: String,
    /// Any other keys NetBox sent
    #[serde(flatten)]
    pub extra: Extra,
}

impl ChoiceRef {
    /// Build a choice with no extra fields
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            extra: Extra::new(),
        }
    }

    /// Label, so choices render the same way as [`NestedRef`]s
    #[must_use]
    pub fn display(&self) -> &str {
        &self.label
    }
}

pub(crate) fn default_true() -> bool {
    true
}
