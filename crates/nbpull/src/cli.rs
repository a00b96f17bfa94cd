//! Argument parsing, logging setup and command dispatch.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use netbox_client::{NetBoxClient, ResourceKind};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::batch::DEFAULT_BATCH_FILE;
use crate::commands;
use crate::error::CliResult;
use crate::settings::Settings;
use crate::setup;

const DEFAULT_LIMIT: usize = 50;

/// Top-level arguments
#[derive(Debug, Parser)]
#[command(
    name = "nbpull",
    version,
    about = "Read-only CLI to pull IPAM data from NetBox"
)]
pub struct Cli {
    /// Output format
    #[arg(
        long,
        short = 'f',
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table
    )]
    pub format: OutputFormat,
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
    /// Env file holding NETBOX_URL and NETBOX_TOKEN
    #[arg(long, global = true, default_value = ".env")]
    pub env_file: PathBuf,
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Column-aligned text
    Table,
    /// Pretty-printed JSON
    Json,
}

/// nbpull subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List IPAM prefixes
    Prefixes(PrefixArgs),
    /// List IP addresses
    IpAddresses(IpAddressArgs),
    /// List VLANs
    Vlans(VlanArgs),
    /// List VRFs
    Vrfs(VrfArgs),
    /// Fetch a single record by ID
    Get(GetArgs),
    /// Look up every prefix listed in a TOML batch file
    BatchPrefixes(BatchArgs),
    /// Check connectivity and read permission per endpoint
    Probe,
    /// Interactive wizard that writes .env and an optional batch file
    Setup,
}

/// Result cap shared by the list commands
#[derive(Debug, Clone, Args)]
pub struct LimitArgs {
    /// Maximum number of results
    #[arg(
        long,
        short = 'l',
        default_value_t = DEFAULT_LIMIT,
        value_parser = parse_positive
    )]
    pub limit: usize,
    /// Fetch every matching record
    #[arg(long)]
    pub all: bool,
}

impl LimitArgs {
    /// Result cap; `None` when `--all` is given
    #[must_use]
    pub fn max_results(&self) -> Option<usize> {
        (!self.all).then_some(self.limit)
    }
}

/// Filters for `prefixes`
#[derive(Debug, Clone, Args)]
pub struct PrefixArgs {
    /// Filter by status (active, reserved, deprecated, container)
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by VRF name
    #[arg(long)]
    pub vrf: Option<String>,
    /// Filter by tenant slug
    #[arg(long)]
    pub tenant: Option<String>,
    /// Filter by site slug
    #[arg(long)]
    pub site: Option<String>,
    /// Filter by tag slug
    #[arg(long)]
    pub tag: Option<String>,
    /// Free-text search
    #[arg(long, short = 's')]
    pub search: Option<String>,
    /// Result cap
    #[command(flatten)]
    pub limit: LimitArgs,
    /// Compact status table
    #[arg(long)]
    pub status_only: bool,
}

/// Filters for `ip-addresses`
#[derive(Debug, Clone, Args)]
pub struct IpAddressArgs {
    /// Filter by status
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by VRF name
    #[arg(long)]
    pub vrf: Option<String>,
    /// Filter by tenant slug
    #[arg(long)]
    pub tenant: Option<String>,
    /// Filter by site slug
    #[arg(long)]
    pub site: Option<String>,
    /// Filter by tag slug
    #[arg(long)]
    pub tag: Option<String>,
    /// Only addresses inside this parent prefix
    #[arg(long)]
    pub prefix: Option<String>,
    /// Free-text search
    #[arg(long, short = 's')]
    pub search: Option<String>,
    /// Result cap
    #[command(flatten)]
    pub limit: LimitArgs,
}

/// Filters for `vlans`
#[derive(Debug, Clone, Args)]
pub struct VlanArgs {
    /// Filter by status
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by tenant slug
    #[arg(long)]
    pub tenant: Option<String>,
    /// Filter by site slug
    #[arg(long)]
    pub site: Option<String>,
    /// Filter by tag slug
    #[arg(long)]
    pub tag: Option<String>,
    /// Free-text search
    #[arg(long, short = 's')]
    pub search: Option<String>,
    /// Result cap
    #[command(flatten)]
    pub limit: LimitArgs,
}

/// Filters for `vrfs`
#[derive(Debug, Clone, Args)]
pub struct VrfArgs {
    /// Filter by tenant slug
    #[arg(long)]
    pub tenant: Option<String>,
    /// Filter by tag slug
    #[arg(long)]
    pub tag: Option<String>,
    /// Free-text search
    #[arg(long, short = 's')]
    pub search: Option<String>,
    /// Result cap
    #[command(flatten)]
    pub limit: LimitArgs,
}

/// Arguments for `get`
#[derive(Debug, Clone, Args)]
pub struct GetArgs {
    /// prefix, ip-address, vlan or vrf
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,
    /// NetBox record ID
    pub id: u64,
}

/// Arguments for `batch-prefixes`
#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// Path to the TOML batch file
    #[arg(long, default_value = DEFAULT_BATCH_FILE)]
    pub file: PathBuf,
    /// One summary row per queried prefix
    #[arg(long)]
    pub status_only: bool,
}

/// Query parameters with unset filters dropped
pub(crate) fn build_params(pairs: &[(&str, Option<&String>)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .filter_map(|(key, value)| value.map(|v| ((*key).to_string(), v.clone())))
        .collect()
}

impl PrefixArgs {
    pub(crate) fn params(&self) -> Vec<(String, String)> {
        build_params(&[
            ("status", self.status.as_ref()),
            ("vrf", self.vrf.as_ref()),
            ("tenant", self.tenant.as_ref()),
            ("site", self.site.as_ref()),
            ("tag", self.tag.as_ref()),
            ("q", self.search.as_ref()),
        ])
    }
}

impl IpAddressArgs {
    pub(crate) fn params(&self) -> Vec<(String, String)> {
        build_params(&[
            ("status", self.status.as_ref()),
            ("vrf", self.vrf.as_ref()),
            ("tenant", self.tenant.as_ref()),
            ("site", self.site.as_ref()),
            ("tag", self.tag.as_ref()),
            ("parent", self.prefix.as_ref()),
            ("q", self.search.as_ref()),
        ])
    }
}

impl VlanArgs {
    pub(crate) fn params(&self) -> Vec<(String, String)> {
        build_params(&[
            ("status", self.status.as_ref()),
            ("tenant", self.tenant.as_ref()),
            ("site", self.site.as_ref()),
            ("tag", self.tag.as_ref()),
            ("q", self.search.as_ref()),
        ])
    }
}

impl VrfArgs {
    pub(crate) fn params(&self) -> Vec<(String, String)> {
        build_params(&[
            ("tenant", self.tenant.as_ref()),
            ("tag", self.tag.as_ref()),
            ("q", self.search.as_ref()),
        ])
    }
}

fn parse_positive(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("expected a positive integer, got '{raw}'")),
    }
}

fn parse_kind(raw: &str) -> Result<ResourceKind, String> {
    raw.parse()
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Parses CLI arguments, executes the requested command and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match dispatch(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            if let Some(hint) = err.hint() {
                eprintln!("{hint}");
            }
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<i32> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if matches!(cli.command, Command::Setup) {
        let stdin = io::stdin();
        let cwd = std::env::current_dir()?;
        setup::run_setup(&mut stdin.lock(), &mut out, &cwd, |config| {
            NetBoxClient::new(config)
        })
        .await?;
        return Ok(0);
    }

    let settings = Settings::load(&cli.env_file)?;
    let client = NetBoxClient::new(&settings.client_config())?;
    debug!("Using NetBox at {}", settings.url);

    let code = commands::execute(&client, &cli.command, cli.format, &mut out).await?;
    out.flush()?;
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("nbpull").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn prefixes_defaults() {
        let cli = parse(&["prefixes"]);
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.env_file, PathBuf::from(".env"));
        let Command::Prefixes(args) = cli.command else {
            panic!("expected prefixes");
        };
        assert_eq!(args.limit.max_results(), Some(DEFAULT_LIMIT));
        assert!(args.params().is_empty());
    }

    #[test]
    fn prefix_filters_become_params() {
        let cli = parse(&["-f", "json", "prefixes", "--status", "active", "-s", "core", "--all"]);
        assert_eq!(cli.format, OutputFormat::Json);
        let Command::Prefixes(args) = cli.command else {
            panic!("expected prefixes");
        };
        assert_eq!(args.limit.max_results(), None);
        assert_eq!(
            args.params(),
            [
                ("status".to_string(), "active".to_string()),
                ("q".to_string(), "core".to_string())
            ]
        );
    }

    #[test]
    fn ip_prefix_filter_maps_to_parent() {
        let cli = parse(&["ip-addresses", "--prefix", "10.0.0.0/24", "--limit", "5"]);
        let Command::IpAddresses(args) = cli.command else {
            panic!("expected ip-addresses");
        };
        assert_eq!(args.limit.max_results(), Some(5));
        assert_eq!(args.params(), [("parent".to_string(), "10.0.0.0/24".to_string())]);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let err = Cli::try_parse_from(["nbpull", "vlans", "--limit", "0"]);
        assert!(err.is_err());
    }

    #[test]
    fn get_accepts_kind_aliases() {
        let cli = parse(&["get", "ip-address", "12"]);
        let Command::Get(args) = cli.command else {
            panic!("expected get");
        };
        assert_eq!(args.kind, ResourceKind::IpAddress);
        assert_eq!(args.id, 12);
        assert!(Cli::try_parse_from(["nbpull", "get", "device", "1"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["batch-prefixes", "--status-only", "--verbose", "--env-file", "prod.env"]);
        assert!(cli.verbose);
        assert_eq!(cli.env_file, PathBuf::from("prod.env"));
        let Command::BatchPrefixes(args) = cli.command else {
            panic!("expected batch-prefixes");
        };
        assert!(args.status_only);
        assert_eq!(args.file, PathBuf::from(DEFAULT_BATCH_FILE));
    }
}
