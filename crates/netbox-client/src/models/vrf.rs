//! IPAM VRF

use serde::{Deserialize, Serialize};

use super::common::{Extra, NestedRef, default_true};
use super::schema::{FieldSpec, Shape, defaulted, optional, required};

/// NetBox IPAM VRF (`/api/ipam/vrfs/`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vrf {
    /// NetBox ID
    pub id: u64,
    /// Display string
    pub display: String,
    /// VRF name
    pub name: String,
    /// Route distinguisher
    #[serde(default)]
    pub rd: Option<String>,
    /// Owning tenant
    #[serde(default)]
    pub tenant: Option<NestedRef>,
    /// Prefixes and addresses must be unique within this VRF
    #[serde(default = "default_true")]
    pub enforce_unique: bool,
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
    required("name", Shape::String),
    optional("rd", Shape::String),
    optional("tenant", Shape::Nested),
    defaulted("enforce_unique", Shape::Bool),
    defaulted("description", Shape::String),
    defaulted("tags", Shape::NestedList),
];
