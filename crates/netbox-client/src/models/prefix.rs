//! IPAM prefix

use serde::{Deserialize, Serialize};

use super::common::{ChoiceRef, Extra, NestedRef};
use super::schema::{FieldSpec, Shape, defaulted, optional, required};

/// NetBox IPAM prefix (`/api/ipam/prefixes/`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prefix {
    /// NetBox ID
    pub id: u64,
    /// Display string
    pub display: String,
    /// Network in CIDR notation
    pub prefix: String, // e.g. "192.168.1.0/24"
    /// Lifecycle status
    #[serde(default)]
    pub status: Option<ChoiceRef>,
    /// VRF, `None` for the global table
    #[serde(default)]
    pub vrf: Option<NestedRef>,
    /// Owning tenant
    #[serde(default)]
    pub tenant: Option<NestedRef>,
    /// Site the prefix is assigned to
    #[serde(default)]
    pub site: Option<NestedRef>,
    /// Associated VLAN
    #[serde(default)]
    pub vlan: Option<NestedRef>,
    /// IPAM role
    #[serde(default)]
    pub role: Option<NestedRef>,
    /// All addresses are usable, including network and broadcast
    #[serde(default)]
    pub is_pool: bool,
    /// Treat as fully utilized
    #[serde(default)]
    pub mark_utilized: bool,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Attached tags
    #[serde(default)]
    pub tags: Vec<NestedRef>,
    /// Undeclared fields, kept as received
    #[serde(flatten)]
    pub extra: Extra,
}

impl Prefix {
    /// Mask length of the CIDR, 0 when it cannot be parsed
    #[must_use]
    pub fn prefix_len(&self) -> u8 {
        self.prefix
            .split_once('/')
            .and_then(|(_, len)| len.parse().ok())
            .unwrap_or(0)
    }

    /// `status.value`, if any
    #[must_use]
    pub fn status_value(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.value.as_str())
    }
}

pub(crate) const FIELDS: &[FieldSpec] = &[
    required("id", Shape::Integer),
    required("display", Shape::String),
    required("prefix", Shape::String),
    optional("status", Shape::Choice),
    optional("vrf", Shape::Nested),
    optional("tenant", Shape::Nested),
    optional("site", Shape::Nested),
    optional("vlan", Shape::Nested),
    optional("role", Shape::Nested),
    defaulted("is_pool", Shape::Bool),
    defaulted("mark_utilized", Shape::Bool),
    defaulted("description", Shape::String),
    defaulted("tags", Shape::NestedList),
];
