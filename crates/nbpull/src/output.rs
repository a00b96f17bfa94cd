//! Table and JSON renderers.
//!
//! Every renderer writes to a caller-supplied `Write` so tests can capture
//! output in memory.

use std::io::{self, Write};

use netbox_client::{
    ChoiceRef, IpAddress, NestedRef, Prefix, ProbeResult, Record, ResourceKind, Vlan, Vrf,
};
use serde::Serialize;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::commands::{BatchMatch, BatchOutcome, best_matches};
use crate::error::{CliError, CliResult};

const DASH: &str = "-";
const DESCRIPTION_WIDTH: usize = 30;

/// Column-aligned plain-text table
#[derive(Debug)]
pub(crate) struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub(crate) fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub(crate) fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let widths = self.widths();
        writeln!(out, "{}", format_row(self.headers.iter().copied(), &widths))?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(out, "{}", rule.join("  "))?;
        for row in &self.rows {
            writeln!(out, "{}", format_row(row.iter().map(String::as_str), &widths))?;
        }
        Ok(())
    }
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    padded.join("  ").trim_end().to_string()
}

fn nested(value: Option<&NestedRef>) -> String {
    value.map_or_else(|| DASH.to_string(), |r| r.display().to_string())
}

fn choice(value: Option<&ChoiceRef>) -> String {
    value.map_or_else(|| DASH.to_string(), |c| c.display().to_string())
}

fn text(value: &str) -> String {
    if value.is_empty() {
        DASH.to_string()
    } else {
        value.to_string()
    }
}

fn description(value: &str) -> String {
    if value.chars().count() > DESCRIPTION_WIDTH {
        let cut: String = value.chars().take(DESCRIPTION_WIDTH - 3).collect();
        format!("{cut}...")
    } else {
        text(value)
    }
}

fn tags(tags: &[NestedRef]) -> String {
    if tags.is_empty() {
        return DASH.to_string();
    }
    tags.iter()
        .map(NestedRef::display)
        .collect::<Vec<_>>()
        .join(", ")
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(|e| CliError::Failure(e.into()))?;
    writeln!(out, "{rendered}")?;
    Ok(())
}

fn prefix_table<'a>(records: impl Iterator<Item = &'a Prefix>) -> Table {
    let mut table = Table::new(&[
        "ID", "Prefix", "Status", "VRF", "Tenant", "Site", "VLAN", "Role", "Pool", "Description",
        "Tags",
    ]);
    for p in records {
        table.push(vec![
            p.id.to_string(),
            p.prefix.clone(),
            choice(p.status.as_ref()),
            nested(p.vrf.as_ref()),
            nested(p.tenant.as_ref()),
            nested(p.site.as_ref()),
            nested(p.vlan.as_ref()),
            nested(p.role.as_ref()),
            if p.is_pool { "yes".into() } else { DASH.into() },
            description(&p.description),
            tags(&p.tags),
        ]);
    }
    table
}

fn ip_address_table<'a>(records: impl Iterator<Item = &'a IpAddress>) -> Table {
    let mut table = Table::new(&[
        "ID", "Address", "Status", "VRF", "Tenant", "DNS Name", "Role", "Description", "Tags",
    ]);
    for ip in records {
        table.push(vec![
            ip.id.to_string(),
            ip.address.clone(),
            choice(ip.status.as_ref()),
            nested(ip.vrf.as_ref()),
            nested(ip.tenant.as_ref()),
            text(&ip.dns_name),
            choice(ip.role.as_ref()),
            description(&ip.description),
            tags(&ip.tags),
        ]);
    }
    table
}

fn vlan_table<'a>(records: impl Iterator<Item = &'a Vlan>) -> Table {
    let mut table = Table::new(&[
        "ID", "VID", "Name", "Status", "Tenant", "Site", "Group", "Role", "Description", "Tags",
    ]);
    for v in records {
        table.push(vec![
            v.id.to_string(),
            v.vid.to_string(),
            v.name.clone(),
            choice(v.status.as_ref()),
            nested(v.tenant.as_ref()),
            nested(v.site.as_ref()),
            nested(v.group.as_ref()),
            nested(v.role.as_ref()),
            description(&v.description),
            tags(&v.tags),
        ]);
    }
    table
}

fn vrf_table<'a>(records: impl Iterator<Item = &'a Vrf>) -> Table {
    let mut table = Table::new(&[
        "ID", "Name", "RD", "Tenant", "Enforce Unique", "Description", "Tags",
    ]);
    for v in records {
        table.push(vec![
            v.id.to_string(),
            v.name.clone(),
            v.rd.as_deref().map_or_else(|| DASH.to_string(), text),
            nested(v.tenant.as_ref()),
            yes_no(v.enforce_unique),
            description(&v.description),
            tags(&v.tags),
        ]);
    }
    table
}

/// Render validated records of `kind`
pub fn render_records<W: Write>(
    out: &mut W,
    kind: ResourceKind,
    records: &[Record],
    format: OutputFormat,
) -> CliResult<()> {
    if format == OutputFormat::Json {
        return write_json(out, records);
    }

    let table = match kind {
        ResourceKind::Prefix => prefix_table(records.iter().filter_map(|r| match r {
            Record::Prefix(p) => Some(p),
            _ => None,
        })),
        ResourceKind::IpAddress => ip_address_table(records.iter().filter_map(|r| match r {
            Record::IpAddress(ip) => Some(ip),
            _ => None,
        })),
        ResourceKind::Vlan => vlan_table(records.iter().filter_map(|r| match r {
            Record::Vlan(v) => Some(v),
            _ => None,
        })),
        ResourceKind::Vrf => vrf_table(records.iter().filter_map(|r| match r {
            Record::Vrf(v) => Some(v),
            _ => None,
        })),
    };
    table.write_to(out)?;
    writeln!(out, "\n{} {}", records.len(), kind.plural())?;
    Ok(())
}

/// Compact prefix + status table
pub fn render_prefix_status<W: Write>(out: &mut W, prefixes: &[Prefix]) -> CliResult<()> {
    let mut table = Table::new(&["Prefix", "Status"]);
    for p in prefixes {
        table.push(vec![p.prefix.clone(), choice(p.status.as_ref())]);
    }
    table.write_to(out)?;
    writeln!(out, "\n{} {}", prefixes.len(), ResourceKind::Prefix.plural())?;
    Ok(())
}

/// Render a batch run
///
/// JSON output is one object with `results` (query + prefixes per found
/// CIDR) and `not_found`; `status_only` picks a single summary table.
pub fn render_batch<W: Write>(
    out: &mut W,
    outcome: &BatchOutcome,
    format: OutputFormat,
    status_only: bool,
) -> CliResult<()> {
    if format == OutputFormat::Json {
        let results: Vec<_> = outcome
            .found
            .iter()
            .map(|(cidr, prefixes)| json!({"query": cidr, "results": prefixes}))
            .collect();
        return write_json(out, &json!({"results": results, "not_found": outcome.not_found}));
    }

    if status_only {
        batch_summary(outcome).write_to(out)?;
    } else {
        for (cidr, prefixes) in &outcome.found {
            writeln!(out, "== {cidr} ==")?;
            prefix_table(prefixes.iter()).write_to(out)?;
            writeln!(out)?;
        }
        for cidr in &outcome.not_found {
            writeln!(out, "== {cidr} ==")?;
            writeln!(out, "No results found.\n")?;
        }
    }
    writeln!(
        out,
        "\n{} found, {} not found",
        outcome.found.len(),
        outcome.not_found.len()
    )?;
    Ok(())
}

fn batch_summary(outcome: &BatchOutcome) -> Table {
    let mut table = Table::new(&[
        "Queried Prefix",
        "Matched Prefix",
        "Status",
        "Site",
        "Tenant",
        "Description",
    ]);
    for (cidr, prefixes) in &outcome.found {
        for matched in best_matches(cidr, prefixes) {
            let (shown, p) = match matched {
                BatchMatch::Direct(p) => (p.prefix.clone(), p),
                BatchMatch::Parent(p) => (format!("~ {}", p.prefix), p),
            };
            table.push(vec![
                cidr.clone(),
                shown,
                choice(p.status.as_ref()),
                nested(p.site.as_ref()),
                nested(p.tenant.as_ref()),
                description(&p.description),
            ]);
        }
    }
    for cidr in &outcome.not_found {
        table.push(vec![
            cidr.clone(),
            DASH.into(),
            "Not Found".into(),
            DASH.into(),
            DASH.into(),
            DASH.into(),
        ]);
    }
    table
}

/// Render connection probe results
pub fn render_probe<W: Write>(
    out: &mut W,
    base_url: &str,
    results: &[ProbeResult],
    format: OutputFormat,
) -> CliResult<()> {
    if format == OutputFormat::Json {
        let rows: Vec<_> = results
            .iter()
            .map(|r| json!({"endpoint": r.endpoint, "ok": r.ok, "detail": r.detail}))
            .collect();
        return write_json(out, &json!({"url": base_url, "endpoints": rows}));
    }

    writeln!(out, "NetBox: {base_url}\n")?;
    let mut table = Table::new(&["Endpoint", "Result", "Detail"]);
    for r in results {
        table.push(vec![
            r.endpoint.clone(),
            if r.ok { "OK" } else { "FAIL" }.to_string(),
            r.detail.clone(),
        ]);
    }
    table.write_to(out)?;
    let passed = results.iter().filter(|r| r.ok).count();
    writeln!(out, "\n{passed}/{} endpoints reachable", results.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use netbox_client::mock::{ip_address_record, prefix_record, vrf_record};
    use serde_json::Value;

    fn validate(kind: ResourceKind, raw: &Value) -> Record {
        kind.validate(raw).unwrap()
    }

    fn render(kind: ResourceKind, records: &[Record], format: OutputFormat) -> String {
        let mut buf = Vec::new();
        render_records(&mut buf, kind, records, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn table_aligns_columns() {
        let mut table = Table::new(&["A", "Long header"]);
        table.push(vec!["wide cell".into(), "x".into()]);
        let mut buf = Vec::new();
        table.write_to(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "A          Long header");
        assert_eq!(lines[1], "---------  -----------");
        assert_eq!(lines[2], "wide cell  x");
    }

    #[test]
    fn absent_values_render_as_dash() {
        let mut raw = prefix_record(7, "10.7.0.0/16", "active");
        raw["tags"] = serde_json::json!([
            {"id": 1, "display": "core"},
            {"id": 2, "display": "edge"}
        ]);
        raw["site"] = serde_json::json!({"id": 3, "display": "DC1"});
        let out = render(
            ResourceKind::Prefix,
            &[validate(ResourceKind::Prefix, &raw)],
            OutputFormat::Table,
        );

        let row = out.lines().nth(2).unwrap();
        assert!(row.starts_with("7   10.7.0.0/16  Active  -"));
        assert!(row.contains("DC1"));
        assert!(row.ends_with("core, edge"));
        assert!(out.trim_end().ends_with("1 prefixes"));
    }

    #[test]
    fn long_descriptions_are_shortened() {
        let mut raw = ip_address_record(1, "10.0.0.1/24", "");
        raw["description"] = Value::String("a".repeat(50));
        let out = render(
            ResourceKind::IpAddress,
            &[validate(ResourceKind::IpAddress, &raw)],
            OutputFormat::Table,
        );
        assert!(out.contains(&format!("{}...", "a".repeat(27))));
        assert!(!out.contains(&"a".repeat(28)));
    }

    #[test]
    fn json_is_a_pretty_array_with_extra_fields() {
        let records = vec![
            validate(ResourceKind::Vrf, &vrf_record(1, "prod", Some("65000:1"))),
            validate(ResourceKind::Vrf, &vrf_record(2, "lab", None)),
        ];
        let out = render(ResourceKind::Vrf, &records, OutputFormat::Json);

        let parsed: Vec<Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["rd"], "65000:1");
        assert_eq!(parsed[1]["custom_fields"], serde_json::json!({}));
        assert!(out.contains("\n  {"));
    }

    #[test]
    fn vrf_table_shows_missing_rd_as_dash() {
        let records = vec![validate(ResourceKind::Vrf, &vrf_record(2, "lab", None))];
        let out = render(ResourceKind::Vrf, &records, OutputFormat::Table);
        assert!(out.lines().nth(2).unwrap().starts_with("2   lab   -"));
        assert!(out.trim_end().ends_with("1 VRFs"));
    }

    fn prefix(id: u64, cidr: &str) -> Prefix {
        match validate(ResourceKind::Prefix, &prefix_record(id, cidr, "container")) {
            Record::Prefix(p) => p,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn batch_summary_marks_parents_and_missing() {
        let outcome = BatchOutcome {
            found: vec![
                ("10.0.0.0/8".into(), vec![prefix(1, "10.0.0.0/8")]),
                (
                    "10.1.2.0/24".into(),
                    vec![prefix(1, "10.0.0.0/8"), prefix(2, "10.1.0.0/16")],
                ),
            ],
            not_found: vec!["172.16.0.0/12".into()],
        };
        let mut buf = Vec::new();
        render_batch(&mut buf, &outcome, OutputFormat::Table, true).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.contains("~ 10.1.0.0/16"));
        assert!(!out.contains("~ 10.0.0.0/8"));
        assert!(out.contains("Not Found"));
        assert!(out.trim_end().ends_with("2 found, 1 not found"));
    }

    #[test]
    fn batch_json_groups_by_query() {
        let outcome = BatchOutcome {
            found: vec![("10.0.0.0/8".into(), vec![prefix(1, "10.0.0.0/8")])],
            not_found: vec!["172.16.0.0/12".into()],
        };
        let mut buf = Vec::new();
        render_batch(&mut buf, &outcome, OutputFormat::Json, false).unwrap();
        let parsed: Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(parsed["results"][0]["query"], "10.0.0.0/8");
        assert_eq!(parsed["results"][0]["results"][0]["id"], 1);
        assert_eq!(parsed["not_found"][0], "172.16.0.0/12");
    }

    #[test]
    fn probe_table_counts_reachable_endpoints() {
        let results = vec![
            ProbeResult {
                endpoint: "status/".into(),
                ok: true,
                detail: "200 OK".into(),
            },
            ProbeResult {
                endpoint: "ipam/vrfs/".into(),
                ok: false,
                detail: "Timeout".into(),
            },
        ];
        let mut buf = Vec::new();
        render_probe(&mut buf, "https://netbox.example.com", &results, OutputFormat::Table).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.starts_with("NetBox: https://netbox.example.com"));
        assert!(out.contains("FAIL"));
        assert!(out.trim_end().ends_with("1/2 endpoints reachable"));
    }
}
