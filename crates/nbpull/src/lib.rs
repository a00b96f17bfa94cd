//! Read-only command-line client for pulling IPAM data from NetBox.
//!
//! Layout:
//! - `cli.rs`: argument parsing, logging setup and command dispatch
//! - `settings.rs`: `NETBOX_*` settings from the environment and `.env`
//! - `commands.rs`: query orchestration over a [`netbox_client::NetBoxReader`]
//! - `batch.rs`: TOML batch file of prefixes
//! - `output.rs`: table and JSON renderers
//! - `setup.rs`: interactive first-run wizard
//! - `error.rs`: CLI error type and exit codes
//! - `main.rs`: thin entrypoint delegating to `run()`

pub mod batch;
pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod settings;
pub mod setup;

pub use cli::run;
pub use error::{CliError, CliResult};
