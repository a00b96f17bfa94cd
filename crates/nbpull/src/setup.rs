//! Interactive first-run wizard
//!
//! Writes `.env` with the NetBox URL and token, checks the connection with
//! the probe, and optionally writes a starter batch file. Input and output
//! are injected so the flow can be driven from tests.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::Path;

use netbox_client::{ClientConfig, DEFAULT_PROBE_ENDPOINTS, NetBoxError, NetBoxReader};
use tracing::info;

use crate::batch::{BatchFile, DEFAULT_BATCH_FILE, is_cidr};
use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};
use crate::output;
use crate::settings::{ENV_TOKEN, ENV_URL, Settings, mask_token, read_env_file};

const ENV_FILE: &str = ".env";
const BATCH_FILTER_KEYS: [&str; 3] = ["status", "vrf", "tenant"];

/// Run the wizard in `dir`; `connect` builds the reader used for the probe
pub async fn run_setup<I, O, F, R>(input: &mut I, out: &mut O, dir: &Path, connect: F) -> CliResult<()>
where
    I: BufRead,
    O: Write,
    F: Fn(&ClientConfig) -> Result<R, NetBoxError>,
    R: NetBoxReader,
{
    writeln!(out, "nbpull setup\n")?;

    let env_path = dir.join(ENV_FILE);
    let mut entries = read_env_file(&env_path)?;
    let mut url = String::new();
    let mut token = String::new();
    let mut write_env = true;

    if env_path.exists() {
        let old_url = entries.get(ENV_URL).cloned().unwrap_or_default();
        let old_token = entries.get(ENV_TOKEN).cloned().unwrap_or_default();
        writeln!(out, "Existing {} found:", env_path.display())?;
        writeln!(out, "  URL:   {}", if old_url.is_empty() { "-" } else { old_url.as_str() })?;
        writeln!(out, "  Token: {}", mask_token(&old_token))?;
        if !confirm(input, out, "Overwrite it?", false)? {
            url = old_url;
            token = old_token;
            write_env = false;
        }
    }

    // values entered here must reach disk even when the old file was kept
    if url.is_empty() {
        url = normalize_url(&prompt(input, out, "NetBox URL (e.g. https://netbox.example.com)")?);
        write_env = true;
    }
    if token.is_empty() {
        token = prompt(input, out, "API token")?;
        write_env = true;
    }
    if url.is_empty() || token.is_empty() {
        return Err(CliError::Config(
            "a NetBox URL and API token are required".to_string(),
        ));
    }

    entries.insert(ENV_URL.to_string(), url.clone());
    entries.insert(ENV_TOKEN.to_string(), token);
    if write_env {
        write_env_file(&env_path, &entries)?;
        writeln!(out, "Wrote {}", env_path.display())?;
        info!("Wrote {}", env_path.display());
    }

    writeln!(out, "\nTesting connection to {url} ...")?;
    let settings = Settings::from_sources(|_| None, &entries)?;
    let reader = connect(&settings.client_config())?;
    let results = reader.probe(&DEFAULT_PROBE_ENDPOINTS).await;
    output::render_probe(out, reader.base_url(), &results, OutputFormat::Table)?;
    if results.iter().all(|r| r.ok) {
        writeln!(out, "All endpoints reachable.\n")?;
    } else {
        writeln!(
            out,
            "Some endpoints failed. Check the URL, the token's permissions and network access.\n"
        )?;
    }

    create_batch_file(input, out, &dir.join(DEFAULT_BATCH_FILE))?;

    writeln!(out, "Setup complete. Try: nbpull prefixes --limit 10")?;
    Ok(())
}

fn create_batch_file<I: BufRead, O: Write>(input: &mut I, out: &mut O, path: &Path) -> CliResult<()> {
    if path.exists() {
        writeln!(out, "{} already exists; leaving it unchanged.\n", path.display())?;
        return Ok(());
    }
    if !confirm(input, out, &format!("Create a {DEFAULT_BATCH_FILE} file?"), true)? {
        return Ok(());
    }

    writeln!(out, "Enter prefixes one per line (blank line to finish):")?;
    let mut batch = BatchFile::default();
    loop {
        let prefix = prompt(input, out, "  prefix")?;
        if prefix.is_empty() {
            break;
        }
        if !is_cidr(&prefix) {
            writeln!(out, "  warning: '{prefix}' is not CIDR notation; keeping it anyway")?;
        }
        batch.prefixes.push(prefix);
    }
    if batch.prefixes.is_empty() {
        writeln!(out, "No prefixes entered; skipping {DEFAULT_BATCH_FILE}.\n")?;
        return Ok(());
    }

    if confirm(input, out, "Add global filters (status, vrf, tenant)?", false)? {
        for key in BATCH_FILTER_KEYS {
            let value = prompt(input, out, &format!("  {key} (blank to skip)"))?;
            if !value.is_empty() {
                batch
                    .filters
                    .insert(key.to_string(), toml::Value::String(value));
            }
        }
    }

    std::fs::write(path, batch.to_toml()?)?;
    writeln!(out, "Wrote {}\n", path.display())?;
    Ok(())
}

fn write_env_file(path: &Path, entries: &BTreeMap<String, String>) -> CliResult<()> {
    let contents: String = entries
        .iter()
        .map(|(key, value)| format!("{key}={value}\n"))
        .collect();
    std::fs::write(path, contents)?;
    Ok(())
}

/// Add `https://` when no scheme is given and drop trailing slashes
#[must_use]
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() || trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

fn prompt<I: BufRead, O: Write>(input: &mut I, out: &mut O, question: &str) -> CliResult<String> {
    write!(out, "{question}: ")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn confirm<I: BufRead, O: Write>(
    input: &mut I,
    out: &mut O,
    question: &str,
    default: bool,
) -> CliResult<bool> {
    let hint = if default { "Y/n" } else { "y/N" };
    loop {
        let answer = prompt(input, out, &format!("{question} [{hint}]"))?;
        match answer.to_ascii_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(out, "Please answer y or n.")?,
        }
    }
}
