//! NetBox API client
//!
//! Read-only client for the NetBox IPAM endpoints under `/api/ipam/`.
//! Every operation issues HTTP GET and nothing else; the type exposes no
//! method that could create, change or delete data in NetBox.
//!
//! The underlying connection pool lives exactly as long as the client value
//! and is released when it is dropped, on success and error paths alike.

use crate::common::HttpClient;
use crate::common::query::{FetchRequest, fetch_all};
use crate::config::ClientConfig;
use crate::error::NetBoxError;
use crate::netbox_trait::NetBoxReader;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Endpoints checked by [`NetBoxClient::probe`] when none are given
pub const DEFAULT_PROBE_ENDPOINTS: [&str; 5] = [
    "status/",
    "ipam/prefixes/",
    "ipam/ip-addresses/",
    "ipam/vlans/",
    "ipam/vrfs/",
];

/// Outcome of probing one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// Endpoint path that was probed
    pub endpoint: String,
    /// Whether the endpoint answered with a success status
    pub ok: bool,
    /// `"200 OK"`, `"403 Forbidden"`, `"Timeout"`, ...
    pub detail: String,
}

/// Read-only NetBox API client
#[derive(Debug)]
pub struct NetBoxClient {
    http: HttpClient,
    base_url: String,
    page_size: usize,
}

impl NetBoxClient {
    /// Create a new NetBox client
    ///
    /// # Arguments
    /// * `config` - base URL, token, page size, timeout and TLS policy
    ///
    /// # Errors
    /// Returns [`NetBoxError::InvalidConfig`] before any network activity
    /// when the configuration is unusable.
    pub fn new(config: &ClientConfig) -> Result<Self, NetBoxError> {
        let http = HttpClient::new(config)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }

    /// Configured page size
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Fetch records from a list endpoint, following pagination
    ///
    /// # Arguments
    /// * `endpoint` - API path relative to `/api/` (e.g. `ipam/prefixes/`)
    /// * `filters` - Query parameters (e.g., `[("status", "active")]`)
    /// * `max_results` - Stop after this many records; `None` fetches all pages
    ///
    /// # Errors
    /// The first failing request aborts the fetch and is returned as-is.
    pub async fn fetch_many(
        &self,
        endpoint: &str,
        filters: &[(&str, &str)],
        max_results: Option<usize>,
    ) -> Result<Vec<Value>, NetBoxError> {
        let request = FetchRequest::new(endpoint, filters, self.page_size).with_max_results(max_results);
        fetch_all(&self.http, &request).await
    }

    /// Fetch a single object by ID
    ///
    /// # Returns
    /// * `Ok(Value)` - The raw object
    /// * `Err(NetBoxError::NotFound)` - NetBox answered 404
    /// * `Err(NetBoxError)` - Any other failure
    pub async fn fetch_one(&self, endpoint: &str, id: u64) -> Result<Value, NetBoxError> {
        let base = endpoint.trim_matches('/');
        if base.is_empty() {
            return Err(NetBoxError::InvalidRequest("endpoint must not be empty".to_string()));
        }
        let path = format!("{base}/{id}/");
        debug!("Fetching {} {} from NetBox", base, id);

        let body = self.http.get_json(&path, &[]).await.map_err(|e| match e {
            NetBoxError::Status { status: 404, .. } => NetBoxError::NotFound {
                endpoint: format!("{base}/"),
                id,
            },
            other => other,
        })?;

        if !body.is_object() {
            return Err(NetBoxError::MalformedResponse {
                endpoint: path,
                message: "expected a single JSON object".to_string(),
            });
        }
        Ok(body)
    }

    /// Probe endpoints to verify connectivity and token permissions
    ///
    /// `status/` is requested without parameters, every other endpoint with
    /// `limit=1`. Failures are reported per endpoint instead of aborting.
    pub async fn probe(&self, endpoints: &[&str]) -> Vec<ProbeResult> {
        let mut results = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            debug!("PROBE GET {}", endpoint);
            let query: Vec<(String, String)> = if endpoint.trim_matches('/') == "status" {
                Vec::new()
            } else {
                vec![("limit".to_string(), "1".to_string())]
            };

            let (ok, detail) = match self.http.check(endpoint, &query).await {
                Ok(status) => (true, format!("{} {}", status.as_u16(), status.canonical_reason().unwrap_or("OK"))),
                Err(err) => (false, probe_failure(&err)),
            };
            results.push(ProbeResult {
                endpoint: (*endpoint).to_string(),
                ok,
                detail,
            });
        }
        results
    }
}

fn probe_failure(err: &NetBoxError) -> String {
    match err {
        NetBoxError::Status { status, .. } => {
            let reason = reqwest::StatusCode::from_u16(*status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Error");
            format!("{status} {reason}")
        }
        NetBoxError::Connection(e) if e.is_timeout() => "Timeout".to_string(),
        NetBoxError::Connection(e) if e.is_connect() => "Connection refused".to_string(),
        other => other.to_string(),
    }
}

#[async_trait]
impl NetBoxReader for NetBoxClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_many(
        &self,
        endpoint: &str,
        filters: &[(&str, &str)],
        max_results: Option<usize>,
    ) -> Result<Vec<Value>, NetBoxError> {
        NetBoxClient::fetch_many(self, endpoint, filters, max_results).await
    }

    async fn fetch_one(&self, endpoint: &str, id: u64) -> Result<Value, NetBoxError> {
        NetBoxClient::fetch_one(self, endpoint, id).await
    }

    async fn probe(&self, endpoints: &[&str]) -> Vec<ProbeResult> {
        NetBoxClient::probe(self, endpoints).await
    }
}
