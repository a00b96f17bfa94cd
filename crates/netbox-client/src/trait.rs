//! NetBoxReader trait for mocking
//!
//! This trait abstracts the NetBoxClient to enable mocking in unit tests.
//! The concrete NetBoxClient implements this trait, and tests can use mock implementations.
//! It is read-only by construction: there is no operation that writes.

use crate::client::ProbeResult;
use crate::error::NetBoxError;
use crate::models::{Record, ResourceKind, validate_all};
use serde_json::Value;

/// Trait for read-only NetBox API operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait NetBoxReader: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// Fetch raw records from a list endpoint, following pagination up to `max_results`
    async fn fetch_many(
        &self,
        endpoint: &str,
        filters: &[(&str, &str)],
        max_results: Option<usize>,
    ) -> Result<Vec<Value>, NetBoxError>;

    /// Fetch one raw record by ID; 404 becomes [`NetBoxError::NotFound`]
    async fn fetch_one(&self, endpoint: &str, id: u64) -> Result<Value, NetBoxError>;

    /// Check connectivity and permissions per endpoint
    async fn probe(&self, endpoints: &[&str]) -> Vec<ProbeResult>;

    /// Fetch and validate records of `kind`
    ///
    /// A single invalid record fails the whole query with
    /// [`NetBoxError::Schema`].
    async fn query_records(
        &self,
        kind: ResourceKind,
        filters: &[(&str, &str)],
        max_results: Option<usize>,
    ) -> Result<Vec<Record>, NetBoxError> {
        let raw = self.fetch_many(kind.endpoint(), filters, max_results).await?;
        Ok(validate_all(kind, &raw)?)
    }

    /// Fetch and validate one record of `kind`
    async fn get_record(&self, kind: ResourceKind, id: u64) -> Result<Record, NetBoxError> {
        let raw = self.fetch_one(kind.endpoint(), id).await?;
        Ok(kind.validate(&raw)?)
    }
}
