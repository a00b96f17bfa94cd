//! TOML batch file listing prefixes to look up in one run
//!
//! ```toml
//! prefixes = ["10.0.0.0/8", "192.168.1.0/24"]
//!
//! [filters]
//! status = "active"
//! vrf = "production"
//! ```

use crate::error::{CliError, CliResult};
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default batch file name, resolved against the working directory
pub const DEFAULT_BATCH_FILE: &str = "batch_prefixes.toml";

/// Parsed batch file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchFile {
    /// Prefixes to look up, one query each
    pub prefixes: Vec<String>,
    /// Extra query filters applied to every lookup
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, toml::Value>,
}

impl BatchFile {
    /// Load and validate a batch file
    pub fn load(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                CliError::Input(format!(
                    "File not found: {}\nCreate a {DEFAULT_BATCH_FILE} file or pass --file <path>.",
                    path.display()
                ))
            } else {
                CliError::Input(format!("cannot read {}: {err}", path.display()))
            }
        })?;
        Self::parse(&contents)
            .map_err(|err| CliError::Input(format!("{}: {err}", path.display())))
    }

    /// Parse and validate batch file contents
    pub fn parse(contents: &str) -> Result<Self, String> {
        let batch: Self = toml::from_str(contents).map_err(|e| e.to_string())?;
        if batch.prefixes.iter().all(|p| p.trim().is_empty()) {
            return Err("'prefixes' must list at least one prefix".to_string());
        }
        batch.filter_pairs()?;
        Ok(batch)
    }

    /// Filters as query pairs; only scalar values are accepted
    pub fn filter_pairs(&self) -> Result<Vec<(String, String)>, String> {
        self.filters
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    toml::Value::String(s) => s.clone(),
                    toml::Value::Integer(i) => i.to_string(),
                    toml::Value::Float(f) => f.to_string(),
                    toml::Value::Boolean(b) => b.to_string(),
                    _ => return Err(format!("filter '{key}' must be a string, number or boolean")),
                };
                Ok((key.clone(), text))
            })
            .collect()
    }

    /// Non-blank prefixes, trimmed
    pub fn queries(&self) -> impl Iterator<Item = &str> {
        self.prefixes
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Failure(e.into()))
    }
}

/// Whether `text` is an IPv4 or IPv6 network in CIDR notation
#[must_use]
pub fn is_cidr(text: &str) -> bool {
    let text = text.trim();
    text.contains('/') && text.parse::<IpNetwork>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prefixes_and_filters() {
        let batch = BatchFile::parse(
            r#"
prefixes = ["10.0.0.0/8", " 192.168.1.0/24 ", ""]

[filters]
status = "active"
vrf = "production"
"#,
        )
        .unwrap();

        assert_eq!(batch.queries().collect::<Vec<_>>(), ["10.0.0.0/8", "192.168.1.0/24"]);
        assert_eq!(
            batch.filter_pairs().unwrap(),
            [
                ("status".to_string(), "active".to_string()),
                ("vrf".to_string(), "production".to_string())
            ]
        );
    }

    #[test]
    fn filters_are_optional() {
        let batch = BatchFile::parse("prefixes = [\"10.0.0.0/8\"]").unwrap();
        assert!(batch.filters.is_empty());
    }

    #[test]
    fn empty_prefix_list_is_rejected() {
        assert!(BatchFile::parse("prefixes = []").is_err());
        assert!(BatchFile::parse("[filters]\nstatus = \"active\"").is_err());
    }

    #[test]
    fn nested_filter_values_are_rejected() {
        let err = BatchFile::parse("prefixes = [\"10.0.0.0/8\"]\n[filters]\nsite = [\"a\", \"b\"]")
            .unwrap_err();
        assert!(err.contains("site"));
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BatchFile::load(&dir.path().join(DEFAULT_BATCH_FILE)).unwrap_err();
        assert!(matches!(err, CliError::Input(ref msg) if msg.contains("File not found")));
    }

    #[test]
    fn written_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_BATCH_FILE);
        let mut batch = BatchFile {
            prefixes: vec!["10.1.0.0/16".into()],
            filters: BTreeMap::new(),
        };
        batch
            .filters
            .insert("status".into(), toml::Value::String("active".into()));
        std::fs::write(&path, batch.to_toml().unwrap()).unwrap();

        assert_eq!(BatchFile::load(&path).unwrap(), batch);
    }

    #[test]
    fn cidr_detection() {
        assert!(is_cidr("10.0.0.0/8"));
        assert!(is_cidr("2001:db8::/32"));
        assert!(!is_cidr("10.0.0.0"));
        assert!(!is_cidr("10.0.0.0/33"));
        assert!(!is_cidr("core-net"));
    }
}
