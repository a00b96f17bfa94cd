//! IPAM IP address

use serde::{Deserialize, Serialize};

use super::common::{ChoiceRef, Extra, NestedRef};
use super::schema::{FieldSpec, Shape, defaulted, optional, required};

/// NetBox IPAM IP address (`/api/ipam/ip-addresses/`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpAddress {
    /// NetBox ID
    pub id: u64,
    /// Display string
    pub display: String,
    /// Address with mask length
    pub address: String, // e.g. "192.168.1.1/24"
    /// Lifecycle status
    #[serde(default)]
    pub status: Option<ChoiceRef>,
    /// VRF, `None` for the global table
    #[serde(default)]
    pub vrf: Option<NestedRef>,
    /// Owning tenant
    #[serde(default)]
    pub tenant: Option<NestedRef>,
    /// IP roles are choices (loopback, vip, ...), not nested objects
    #[serde(default)]
    pub role: Option<ChoiceRef>,
    /// Content type of the assigned interface, e.g. `dcim.interface`
    #[serde(default)]
    pub assigned_object_type: Option<String>,
    /// ID of the assigned interface
    #[serde(default)]
    pub assigned_object_id: Option<u64>,
    /// DNS name
    #[serde(default)]
    pub dns_name: String,
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
    required("address", Shape::String),
    optional("status", Shape::Choice),
    optional("vrf", Shape::Nested),
    optional("tenant", Shape::Nested),
    optional("role", Shape::Choice),
    optional("assigned_object_type", Shape::String),
    optional("assigned_object_id", Shape::Integer),
    defaulted("dns_name", Shape::String),
    defaulted("description", Shape::String),
    defaulted("tags", Shape::NestedList),
];
