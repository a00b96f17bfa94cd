//! Query orchestration: turns parsed commands into reader calls and hands
//! the records to the renderers.

use std::io::Write;

use netbox_client::{DEFAULT_PROBE_ENDPOINTS, NetBoxReader, Prefix, Record, ResourceKind};
use tracing::info;

use crate::batch::BatchFile;
use crate::cli::{Command, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output;

/// Run one non-interactive command against `reader`, writing to `out`
///
/// Returns the process exit code for commands that succeed but report a
/// failed check (`probe`).
pub async fn execute<R, W>(
    reader: &R,
    command: &Command,
    format: OutputFormat,
    out: &mut W,
) -> CliResult<i32>
where
    R: NetBoxReader + ?Sized,
    W: Write,
{
    match command {
        Command::Prefixes(args) => {
            let records = list(reader, ResourceKind::Prefix, &args.params(), args.limit.max_results()).await?;
            if args.status_only && format == OutputFormat::Table {
                output::render_prefix_status(out, &into_prefixes(records))?;
            } else {
                output::render_records(out, ResourceKind::Prefix, &records, format)?;
            }
        }
        Command::IpAddresses(args) => {
            let records = list(reader, ResourceKind::IpAddress, &args.params(), args.limit.max_results()).await?;
            output::render_records(out, ResourceKind::IpAddress, &records, format)?;
        }
        Command::Vlans(args) => {
            let records = list(reader, ResourceKind::Vlan, &args.params(), args.limit.max_results()).await?;
            output::render_records(out, ResourceKind::Vlan, &records, format)?;
        }
        Command::Vrfs(args) => {
            let records = list(reader, ResourceKind::Vrf, &args.params(), args.limit.max_results()).await?;
            output::render_records(out, ResourceKind::Vrf, &records, format)?;
        }
        Command::Get(args) => {
            let record = reader.get_record(args.kind, args.id).await?;
            output::render_records(out, args.kind, std::slice::from_ref(&record), format)?;
        }
        Command::BatchPrefixes(args) => {
            let batch = BatchFile::load(&args.file)?;
            let outcome = run_batch(reader, &batch).await?;
            output::render_batch(out, &outcome, format, args.status_only)?;
        }
        Command::Probe => {
            let results = reader.probe(&DEFAULT_PROBE_ENDPOINTS).await;
            output::render_probe(out, reader.base_url(), &results, format)?;
            if results.iter().any(|r| !r.ok) {
                return Ok(crate::error::EXIT_FAILURE);
            }
        }
        Command::Setup => {
            return Err(CliError::Input(
                "setup is interactive and cannot run here".to_string(),
            ));
        }
    }
    Ok(0)
}

/// Fetch and validate records of `kind` with owned filter pairs
pub async fn list<R>(
    reader: &R,
    kind: ResourceKind,
    params: &[(String, String)],
    max_results: Option<usize>,
) -> CliResult<Vec<Record>>
where
    R: NetBoxReader + ?Sized,
{
    let filters: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    info!("Querying {} with {} filter(s)", kind.plural(), filters.len());
    Ok(reader.query_records(kind, &filters, max_results).await?)
}

/// Prefixes found for each queried CIDR of a batch run
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Each query with the prefixes it returned
    pub found: Vec<(String, Vec<Prefix>)>,
    /// Queries that returned nothing
    pub not_found: Vec<String>,
}

/// Query every prefix of `batch` in order, one fetch at a time
///
/// Any fetch or validation failure aborts the whole batch.
pub async fn run_batch<R>(reader: &R, batch: &BatchFile) -> CliResult<BatchOutcome>
where
    R: NetBoxReader + ?Sized,
{
    let filters = batch.filter_pairs().map_err(CliError::Input)?;
    let mut outcome = BatchOutcome::default();

    for cidr in batch.queries() {
        let mut params = filters.clone();
        params.push(("q".to_string(), cidr.to_string()));
        let prefixes = into_prefixes(list(reader, ResourceKind::Prefix, &params, None).await?);
        if prefixes.is_empty() {
            outcome.not_found.push(cidr.to_string());
        } else {
            outcome.found.push((cidr.to_string(), prefixes));
        }
    }

    info!(
        "Batch complete: {} found, {} not found",
        outcome.found.len(),
        outcome.not_found.len()
    );
    Ok(outcome)
}

/// How a queried CIDR was matched in NetBox
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BatchMatch<'a> {
    /// Records whose prefix equals the query
    Direct(&'a Prefix),
    /// Most specific containing prefix when no direct match exists
    Parent(&'a Prefix),
}

/// Direct matches for `cidr`, or else the parent with the longest mask
pub fn best_matches<'a>(cidr: &str, prefixes: &'a [Prefix]) -> Vec<BatchMatch<'a>> {
    let direct: Vec<_> = prefixes
        .iter()
        .filter(|p| p.prefix == cidr)
        .map(BatchMatch::Direct)
        .collect();
    if !direct.is_empty() {
        return direct;
    }
    // first of equally specific parents, in server order
    prefixes
        .iter()
        .rev()
        .max_by_key(|p| p.prefix_len())
        .map(BatchMatch::Parent)
        .into_iter()
        .collect()
}

fn into_prefixes(records: Vec<Record>) -> Vec<Prefix> {
    records
        .into_iter()
        .filter_map(|record| match record {
            Record::Prefix(prefix) => Some(prefix),
            _ => None,
        })
        .collect()
}
