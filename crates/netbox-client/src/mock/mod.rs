//! Mock NetBox reader for unit testing
//!
//! This module provides an in-memory implementation of [`NetBoxReader`] that can be used
//! in unit tests without requiring a running NetBox instance.
//!
//! Seeded records are served through the same paginated fetch engine as the
//! real client, so `limit`/`offset` handling and result caps behave exactly
//! as they would against NetBox. Every page request is recorded.
//!
//! - `helpers.rs` - Builders for raw NetBox records

mod helpers;

pub use helpers::{ip_address_record, prefix_record, vlan_record, vrf_record};

use crate::client::ProbeResult;
use crate::common::PaginatedResponse;
use crate::common::query::{FetchRequest, PageSource, fetch_all};
use crate::error::NetBoxError;
use crate::models::ResourceKind;
use crate::netbox_trait::NetBoxReader;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One page request seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Normalised endpoint path
    pub endpoint: String,
    /// Query pairs sent with the request
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Value of a query parameter, if sent
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Mock NetBox reader for testing
///
/// This mock stores raw records per endpoint and can be configured to fail
/// specific endpoints with an HTTP status.
#[derive(Debug, Clone)]
pub struct MockNetBoxClient {
    pub(crate) base_url: String,
    page_size: usize,
    records: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    failures: Arc<Mutex<HashMap<String, (u16, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn normalize(endpoint: &str) -> String {
    format!("{}/", endpoint.trim_matches('/'))
}

impl MockNetBoxClient {
    /// Create a new mock client with the default page size
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            page_size: crate::config::DEFAULT_PAGE_SIZE,
            records: Arc::new(Mutex::new(HashMap::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Override the page size used when paging seeded records
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Add a raw record to the list behind `kind`'s endpoint (for test setup)
    pub fn add_record(&self, kind: ResourceKind, record: Value) {
        self.add_records(kind.endpoint(), vec![record]);
    }

    /// Append raw records to an endpoint (for test setup)
    pub fn add_records(&self, endpoint: &str, records: Vec<Value>) {
        lock(&self.records)
            .entry(normalize(endpoint))
            .or_default()
            .extend(records);
    }

    /// Make every request to `endpoint` fail with `status`
    pub fn fail_endpoint(&self, endpoint: &str, status: u16, body: impl Into<String>) {
        lock(&self.failures).insert(normalize(endpoint), (status, body.into()));
    }

    /// Page requests seen so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    fn failure(&self, endpoint: &str) -> Option<NetBoxError> {
        lock(&self.failures)
            .get(&normalize(endpoint))
            .map(|(status, body)| NetBoxError::Status {
                endpoint: endpoint.to_string(),
                status: *status,
                body: body.clone(),
            })
    }

    fn matching(&self, endpoint: &str, query: &[(String, String)]) -> Vec<Value> {
        lock(&self.records)
            .get(&normalize(endpoint))
            .map(|records| {
                records
                    .iter()
                    .filter(|r| {
                        query
                            .iter()
                            .filter(|(k, _)| k != "limit" && k != "offset")
                            .all(|(k, v)| matches_filter(r, k, v))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Loose stand-in for NetBox filtering: `q` searches the display string,
/// other keys compare against the field or a reference's value/display/name/slug.
fn matches_filter(record: &Value, key: &str, wanted: &str) -> bool {
    let eq = |v: &Value| v.as_str().is_some_and(|s| s.eq_ignore_ascii_case(wanted));
    if key == "q" {
        return record["display"].as_str().is_some_and(|d| d.contains(wanted));
    }
    match record.get(key) {
        Some(Value::Object(obj)) => ["value", "display", "name", "slug"]
            .iter()
            .any(|member| obj.get(*member).is_some_and(eq)),
        Some(Value::Number(n)) => n.to_string() == wanted,
        Some(Value::Bool(b)) => b.to_string() == wanted,
        Some(v) => eq(v),
        None => false,
    }
}

#[async_trait]
impl PageSource for MockNetBoxClient {
    async fn get_page(&self, endpoint: &str, query: &[(String, String)]) -> Result<PaginatedResponse<Value>, NetBoxError> {
        lock(&self.requests).push(RecordedRequest {
            endpoint: endpoint.to_string(),
            query: query.to_vec(),
        });
        if let Some(err) = self.failure(endpoint) {
            return Err(err);
        }

        let param = |key: &str| {
            query
                .iter()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| v.parse::<usize>().ok())
        };
        let limit = param("limit").unwrap_or(self.page_size);
        let offset = param("offset").unwrap_or(0);

        let all = self.matching(endpoint, query);
        let end = offset.saturating_add(limit).min(all.len());
        let results = all.get(offset..end).map(<[Value]>::to_vec).unwrap_or_default();
        let next = (end < all.len()).then(|| {
            format!(
                "{}/api/{}?limit={}&offset={}",
                self.base_url,
                normalize(endpoint),
                limit,
                end
            )
        });

        Ok(PaginatedResponse {
            count: all.len() as u64,
            next,
            previous: None,
            results,
        })
    }
}

#[async_trait]
impl NetBoxReader for MockNetBoxClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_many(
        &self,
        endpoint: &str,
        filters: &[(&str, &str)],
        max_results: Option<usize>,
    ) -> Result<Vec<Value>, NetBoxError> {
        let request = FetchRequest::new(endpoint, filters, self.page_size).with_max_results(max_results);
        fetch_all(self, &request).await
    }

    async fn fetch_one(&self, endpoint: &str, id: u64) -> Result<Value, NetBoxError> {
        lock(&self.requests).push(RecordedRequest {
            endpoint: format!("{}{}/", normalize(endpoint), id),
            query: Vec::new(),
        });
        match self.failure(endpoint) {
            Some(NetBoxError::Status { status: 404, .. }) => {
                return Err(NetBoxError::NotFound {
                    endpoint: normalize(endpoint),
                    id,
                });
            }
            Some(err) => return Err(err),
            None => {}
        }
        lock(&self.records)
            .get(&normalize(endpoint))
            .and_then(|records| records.iter().find(|r| r["id"].as_u64() == Some(id)).cloned())
            .ok_or_else(|| NetBoxError::NotFound {
                endpoint: normalize(endpoint),
                id,
            })
    }

    async fn probe(&self, endpoints: &[&str]) -> Vec<ProbeResult> {
        endpoints
            .iter()
            .map(|endpoint| match self.failure(endpoint) {
                Some(NetBoxError::Status { status, .. }) => ProbeResult {
                    endpoint: (*endpoint).to_string(),
                    ok: false,
                    detail: format!("{status} Error"),
                },
                _ => ProbeResult {
                    endpoint: (*endpoint).to_string(),
                    ok: true,
                    detail: "200 OK".to_string(),
                },
            })
            .collect()
    }
}
