//! IPAM VLAN

use serde::{Deserialize, Serialize};

use super::common::{ChoiceRef, Extra, NestedRef};
use super::schema::{FieldSpec, Shape, defaulted, optional, required};

/// NetBox IPAM VLAN (`/api/ipam/vlans/`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vlan {
    /// NetBox ID
    pub id: u64,
    /// Display string
    pub display: String,
    /// 802.1Q VLAN ID
    pub vid: u16,
    /// VLAN name
    pub name: String,
    /// Lifecycle status
    #[serde(default)]
    pub status: Option<ChoiceRef>,
    /// Owning tenant
    #[serde(default)]
    pub tenant: Option<NestedRef>,
    /// Site the VLAN is scoped to
    #[serde(default)]
    pub site: Option<NestedRef>,
    /// VLAN group
    #[serde(default)]
    pub group: Option<NestedRef>,
    /// IPAM role
    #[serde(default)]
    pub role: Option<NestedRef>,
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

pub(crate) const FIELDS: &[FieldSpec] = &[
    required("id", Shape::Integer),
    required("display", Shape::String),
    required("vid", Shape::U16),
    required("name", Shape::String),
    optional("status", Shape::Choice),
    optional("tenant", Shape::Nested),
    optional("site", Shape::Nested),
    optional("group", Shape::Nested),
    optional("role", Shape::Nested),
    defaulted("description", Shape::String),
    defaulted("tags", Shape::NestedList),
];
