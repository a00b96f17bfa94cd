//! Builders for raw NetBox records shaped like real API payloads

use serde_json::{Value, json};

/// Raw prefix record with a status choice
pub fn prefix_record(id: u64, prefix: &str, status: &str) -> Value {
    json!({
        "id": id,
        "url": format!("http://netbox.test/api/ipam/prefixes/{id}/"),
        "display": prefix,
        "family": {"value": 4, "label": "IPv4"},
        "prefix": prefix,
        "status": choice(status),
        "vrf": null,
        "tenant": null,
        "site": null,
        "vlan": null,
        "role": null,
        "is_pool": false,
        "mark_utilized": false,
        "description": "",
        "tags": [],
        "custom_fields": {},
        "_depth": 0
    })
}

/// Raw IP address record
pub fn ip_address_record(id: u64, address: &str, dns_name: &str) -> Value {
    json!({
        "id": id,
        "url": format!("http://netbox.test/api/ipam/ip-addresses/{id}/"),
        "display": address,
        "address": address,
        "status": choice("active"),
        "vrf": null,
        "tenant": null,
        "role": null,
        "assigned_object_type": null,
        "assigned_object_id": null,
        "dns_name": dns_name,
        "description": "",
        "tags": [],
        "custom_fields": {}
    })
}

/// Raw VLAN record
pub fn vlan_record(id: u64, vid: u16, name: &str) -> Value {
    json!({
        "id": id,
        "url": format!("http://netbox.test/api/ipam/vlans/{id}/"),
        "display": format!("{name} ({vid})"),
        "vid": vid,
        "name": name,
        "status": choice("active"),
        "tenant": null,
        "site": null,
        "group": null,
        "role": null,
        "description": "",
        "tags": [],
        "custom_fields": {}
    })
}

/// Raw VRF record
pub fn vrf_record(id: u64, name: &str, rd: Option<&str>) -> Value {
    json!({
        "id": id,
        "url": format!("http://netbox.test/api/ipam/vrfs/{id}/"),
        "display": name,
        "name": name,
        "rd": rd,
        "tenant": null,
        "enforce_unique": true,
        "description": "",
        "tags": [],
        "custom_fields": {}
    })
}

fn choice(value: &str) -> Value {
    let mut label = value.to_string();
    if let Some(first) = label.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    json!({"value": value, "label": label})
}
