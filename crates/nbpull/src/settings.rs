//! Connection settings from the environment and a `.env` file
//!
//! Process environment variables win over values read from the `.env` file.
//! Keys are matched case-insensitively.

use crate::error::{CliError, CliResult};
use netbox_client::{ClientConfig, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Base URL of the NetBox instance
pub const ENV_URL: &str = "NETBOX_URL";
/// API token
pub const ENV_TOKEN: &str = "NETBOX_TOKEN";
/// Records per page
pub const ENV_PAGE_SIZE: &str = "NETBOX_PAGE_SIZE";
/// Request timeout in seconds
pub const ENV_TIMEOUT: &str = "NETBOX_TIMEOUT";
/// `false` disables certificate verification
pub const ENV_VERIFY_SSL: &str = "NETBOX_VERIFY_SSL";

/// Resolved connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// NetBox base URL
    pub url: String,
    /// API token
    pub token: String,
    /// Records requested per page
    pub page_size: usize,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Verify the server certificate
    pub verify_ssl: bool,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("url", &self.url)
            .field("token", &mask_token(&self.token))
            .field("page_size", &self.page_size)
            .field("timeout_secs", &self.timeout_secs)
            .field("verify_ssl", &self.verify_ssl)
            .finish()
    }
}

impl Settings {
    /// Load settings from the process environment, falling back to `env_file`
    ///
    /// A missing `env_file` is not an error.
    pub fn load(env_file: &Path) -> CliResult<Self> {
        let file = read_env_file(env_file)?;
        Self::from_sources(|key| std::env::var(key).ok(), &file)
    }

    /// Resolve settings from an environment lookup and parsed `.env` entries
    pub fn from_sources(
        env: impl Fn(&str) -> Option<String>,
        file: &BTreeMap<String, String>,
    ) -> CliResult<Self> {
        let get = |key: &str| {
            env(key)
                .or_else(|| file.get(key).cloned())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let url = get(ENV_URL).ok_or_else(|| CliError::Config(format!("{ENV_URL} is not set")))?;
        let token =
            get(ENV_TOKEN).ok_or_else(|| CliError::Config(format!("{ENV_TOKEN} is not set")))?;

        let page_size = match get(ENV_PAGE_SIZE) {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    CliError::Config(format!("{ENV_PAGE_SIZE} must be a positive integer, got '{raw}'"))
                })?,
            None => DEFAULT_PAGE_SIZE,
        };
        let timeout_secs = match get(ENV_TIMEOUT) {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                CliError::Config(format!("{ENV_TIMEOUT} must be a number of seconds, got '{raw}'"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let verify_ssl = match get(ENV_VERIFY_SSL) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                CliError::Config(format!("{ENV_VERIFY_SSL} must be true or false, got '{raw}'"))
            })?,
            None => true,
        };

        let settings = Self {
            url,
            token,
            page_size,
            timeout_secs,
            verify_ssl,
        };
        debug!("Resolved settings: {:?}", settings);
        Ok(settings)
    }

    /// Client configuration for these settings
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.url.clone(), self.token.clone())
            .with_page_size(self.page_size)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_verify_tls(self.verify_ssl)
    }
}

/// Read a `.env` file; a missing file yields no entries
pub fn read_env_file(path: &Path) -> CliResult<BTreeMap<String, String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(parse_env(&contents)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("No env file at {}", path.display());
            Ok(BTreeMap::new())
        }
        Err(err) => Err(CliError::Config(format!(
            "cannot read {}: {err}",
            path.display()
        ))),
    }
}

/// Parse `KEY=value` lines
///
/// Blank lines and `#` comments are skipped, an `export ` prefix is allowed,
/// and matching single or double quotes around the value are removed. Keys
/// are upper-cased.
#[must_use]
pub fn parse_env(contents: &str) -> BTreeMap<String, String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_ascii_uppercase(), unquote(value.trim()).to_string()))
        })
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Show only the last four characters of a token
#[must_use]
pub fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = token.chars().skip(count - 4).collect();
    format!("{}{tail}", "*".repeat(count - 4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn environment_wins_over_file() {
        let file = parse_env("NETBOX_URL=https://file.example.com\nNETBOX_TOKEN=file-token\n");
        let settings = Settings::from_sources(
            env_of(&[("NETBOX_URL", "https://env.example.com")]),
            &file,
        )
        .unwrap();

        assert_eq!(settings.url, "https://env.example.com");
        assert_eq!(settings.token, "file-token");
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(settings.verify_ssl);
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let err = Settings::from_sources(
            env_of(&[("NETBOX_URL", "https://netbox.example.com")]),
            &BTreeMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(err.exit_code(), crate::error::EXIT_CONFIG);
    }

    #[test]
    fn optional_values_are_parsed() {
        let settings = Settings::from_sources(
            env_of(&[
                ("NETBOX_URL", "https://netbox.example.com"),
                ("NETBOX_TOKEN", "abc"),
                ("NETBOX_PAGE_SIZE", "250"),
                ("NETBOX_TIMEOUT", "5"),
                ("NETBOX_VERIFY_SSL", "no"),
            ]),
            &BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(settings.page_size, 250);
        assert_eq!(settings.timeout_secs, 5);
        assert!(!settings.verify_ssl);

        let config = settings.client_config();
        assert_eq!(config.page_size, 250);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.verify_tls);
    }

    #[test]
    fn bad_numbers_are_rejected() {
        for (key, value) in [("NETBOX_PAGE_SIZE", "0"), ("NETBOX_TIMEOUT", "soon"), ("NETBOX_VERIFY_SSL", "maybe")] {
            let err = Settings::from_sources(
                env_of(&[("NETBOX_URL", "https://n.example.com"), ("NETBOX_TOKEN", "t"), (key, value)]),
                &BTreeMap::new(),
            )
            .unwrap_err();
            assert!(matches!(err, CliError::Config(_)), "{key}={value}");
        }
    }

    #[test]
    fn env_file_syntax() {
        let parsed = parse_env(
            "# NetBox\n\nexport netbox_url = \"https://netbox.example.com\"\nNETBOX_TOKEN='abc=def'\nbroken line\n",
        );
        assert_eq!(parsed.get("NETBOX_URL").map(String::as_str), Some("https://netbox.example.com"));
        assert_eq!(parsed.get("NETBOX_TOKEN").map(String::as_str), Some("abc=def"));
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn missing_env_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let parsed = read_env_file(&dir.path().join(".env")).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn debug_output_masks_token() {
        let settings = Settings {
            url: "https://netbox.example.com".into(),
            token: "0123456789abcdef".into(),
            page_size: 100,
            timeout_secs: 30,
            verify_ssl: true,
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("0123456789abcdef"));
        assert!(rendered.contains("************cdef"));
    }

    #[test]
    fn short_tokens_are_fully_masked() {
        assert_eq!(mask_token("abc"), "***");
        assert_eq!(mask_token("abcdef"), "**cdef");
    }
}
