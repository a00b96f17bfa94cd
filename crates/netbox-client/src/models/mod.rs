//! NetBox IPAM models
//!
//! These models follow the NetBox REST API serializers for the four IPAM
//! resources this client reads. Every model keeps the keys it does not
//! declare in an `extra` map and writes them back on serialization, since
//! NetBox adds fields between releases.
//! See: netbox/netbox/ipam/api/serializers_/

mod common;
mod ip_address;
mod prefix;
mod schema;
mod vlan;
mod vrf;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use common::{ChoiceRef, Extra, NestedRef};
pub use ip_address::IpAddress;
pub use prefix::Prefix;
pub use schema::{Problem, SchemaViolation};
pub use vlan::Vlan;
pub use vrf::Vrf;

/// The closed set of resource kinds this client understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// `ipam/prefixes/`
    Prefix,
    /// `ipam/ip-addresses/`
    IpAddress,
    /// `ipam/vlans/`
    Vlan,
    /// `ipam/vrfs/`
    Vrf,
}

impl ResourceKind {
    /// Every kind, in display order
    pub const ALL: [Self; 4] = [Self::Prefix, Self::IpAddress, Self::Vlan, Self::Vrf];

    /// List endpoint relative to `/api/`
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Prefix => "ipam/prefixes/",
            Self::IpAddress => "ipam/ip-addresses/",
            Self::Vlan => "ipam/vlans/",
            Self::Vrf => "ipam/vrfs/",
        }
    }

    /// Plural noun used in summaries ("3 prefixes")
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Prefix => "prefixes",
            Self::IpAddress => "IP addresses",
            Self::Vlan => "VLANs",
            Self::Vrf => "VRFs",
        }
    }

    /// Validate a raw record as this kind
    ///
    /// # Errors
    /// Returns a [`SchemaViolation`] naming the field and problem.
    pub fn validate(self, raw: &Value) -> Result<Record, SchemaViolation> {
        Ok(match self {
            Self::Prefix => Record::Prefix(Prefix::from_raw(raw)?),
            Self::IpAddress => Record::IpAddress(IpAddress::from_raw(raw)?),
            Self::Vlan => Record::Vlan(Vlan::from_raw(raw)?),
            Self::Vrf => Record::Vrf(Vrf::from_raw(raw)?),
        })
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Prefix => "Prefix",
            Self::IpAddress => "IP Address",
            Self::Vlan => "VLAN",
            Self::Vrf => "VRF",
        })
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefix" | "prefixes" => Ok(Self::Prefix),
            "ip" | "ip-address" | "ip-addresses" | "ip_address" | "ip_addresses" => {
                Ok(Self::IpAddress)
            }
            "vlan" | "vlans" => Ok(Self::Vlan),
            "vrf" | "vrfs" => Ok(Self::Vrf),
            other => Err(format!(
                "unknown resource kind '{other}' (expected prefix, ip-address, vlan or vrf)"
            )),
        }
    }
}

/// A typed IPAM resource that can be validated from a raw record
pub trait Resource: Serialize + DeserializeOwned + Into<Record> {
    /// Kind this model represents
    const KIND: ResourceKind;

    /// Validate a raw JSON record into this model
    ///
    /// # Errors
    /// Returns a [`SchemaViolation`] for missing required fields or fields
    /// with the wrong shape. Undeclared fields never fail.
    fn from_raw(raw: &Value) -> Result<Self, SchemaViolation>;
}

fn decode<T: DeserializeOwned>(kind: ResourceKind, raw: &Value) -> Result<T, SchemaViolation> {
    T::deserialize(raw).map_err(|e| SchemaViolation {
        kind,
        field: "<record>".to_string(),
        problem: Problem::Invalid(e.to_string()),
    })
}

macro_rules! impl_resource {
    ($ty:ident, $module:ident) => {
        impl Resource for $ty {
            const KIND: ResourceKind = ResourceKind::$ty;

            fn from_raw(raw: &Value) -> Result<Self, SchemaViolation> {
                schema::check(Self::KIND, raw, $module::FIELDS)?;
                decode(Self::KIND, raw)
            }
        }

        impl From<$ty> for Record {
            fn from(value: $ty) -> Self {
                Record::$ty(value)
            }
        }
    };
}

impl_resource!(Prefix, prefix);
impl_resource!(IpAddress, ip_address);
impl_resource!(Vlan, vlan);
impl_resource!(Vrf, vrf);

/// A validated record of any kind, discriminated by the endpoint it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    /// A prefix
    Prefix(Prefix),
    /// An IP address
    IpAddress(IpAddress),
    /// A VLAN
    Vlan(Vlan),
    /// A VRF
    Vrf(Vrf),
}

impl Record {
    /// Kind of this record
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Prefix(_) => ResourceKind::Prefix,
            Self::IpAddress(_) => ResourceKind::IpAddress,
            Self::Vlan(_) => ResourceKind::Vlan,
            Self::Vrf(_) => ResourceKind::Vrf,
        }
    }

    /// NetBox identifier
    #[must_use]
    pub fn id(&self) -> u64 {
        match self {
            Self::Prefix(r) => r.id,
            Self::IpAddress(r) => r.id,
            Self::Vlan(r) => r.id,
            Self::Vrf(r) => r.id,
        }
    }

    /// NetBox display string
    #[must_use]
    pub fn display(&self) -> &str {
        match self {
            Self::Prefix(r) => &r.display,
            Self::IpAddress(r) => &r.display,
            Self::Vlan(r) => &r.display,
            Self::Vrf(r) => &r.display,
        }
    }

    /// Serialize back to a raw record, including preserved unknown fields
    ///
    /// # Errors
    /// Only fails if a preserved value cannot be represented as JSON.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// Validate a batch of raw records as `kind`, failing on the first bad one
///
/// # Errors
/// Returns the first [`SchemaViolation`] encountered.
pub fn validate_all(kind: ResourceKind, raw: &[Value]) -> Result<Vec<Record>, SchemaViolation> {
    raw.iter().map(|r| kind.validate(r)).collect()
}
