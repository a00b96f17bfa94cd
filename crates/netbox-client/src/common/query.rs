//! Paginated fetch engine
//!
//! Walks a limit/offset paginated list endpoint page by page, strictly in
//! order, until the server reports no further page or the caller's result
//! cap is met. The cap is checked before every follow-up request so no page
//! is fetched that the caller cannot use.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::common::PaginatedResponse;
use crate::error::NetBoxError;

/// Anything that can serve one page of a list endpoint
///
/// Implemented by [`HttpClient`](crate::HttpClient) for real requests and by
/// the in-memory mock for tests.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page; `query` already carries `limit` and `offset`
    async fn get_page(&self, endpoint: &str, query: &[(String, String)]) -> Result<PaginatedResponse<Value>, NetBoxError>;
}

/// One logical list query
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    /// Endpoint relative to `/api/`, e.g. `ipam/prefixes/`
    pub endpoint: &'a str,
    /// Filter key/value pairs sent with every page
    pub filters: &'a [(&'a str, &'a str)],
    /// Stop after this many records; `None` fetches everything
    pub max_results: Option<usize>,
    /// Configured page size
    pub page_size: usize,
}

impl<'a> FetchRequest<'a> {
    /// Request every record of `endpoint` matching `filters`
    pub fn new(endpoint: &'a str, filters: &'a [(&'a str, &'a str)], page_size: usize) -> Self {
        Self {
            endpoint,
            filters,
            max_results: None,
            page_size,
        }
    }

    /// Cap the number of records returned
    #[must_use]
    pub fn with_max_results(mut self, max_results: Option<usize>) -> Self {
        self.max_results = max_results;
        self
    }

    /// Page size actually requested: the configured size, narrowed to
    /// `max_results` when fewer records are wanted than one page holds.
    #[must_use]
    pub fn effective_page_size(&self) -> usize {
        match self.max_results {
            Some(max) => max.min(self.page_size),
            None => self.page_size,
        }
    }

    fn check(&self) -> Result<(), NetBoxError> {
        if self.endpoint.trim_matches('/').is_empty() {
            return Err(NetBoxError::InvalidRequest("endpoint must not be empty".to_string()));
        }
        if self.page_size == 0 {
            return Err(NetBoxError::InvalidRequest("page size must be greater than zero".to_string()));
        }
        if self.max_results == Some(0) {
            return Err(NetBoxError::InvalidRequest("max_results must be positive".to_string()));
        }
        Ok(())
    }

    fn page_query(&self, limit: usize, offset: usize) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = self
            .filters
            .iter()
            .filter(|(k, _)| *k != "limit" && *k != "offset")
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        query.push(("limit".to_string(), limit.to_string()));
        query.push(("offset".to_string(), offset.to_string()));
        query
    }
}

/// Fetch all pages of a paginated list, honouring `max_results`
///
/// Records are returned in server order. With `max_results = Some(k)` the
/// result holds exactly `min(total, k)` records.
///
/// # Errors
/// The first failing page aborts the whole fetch and its error is returned
/// unchanged; no partial result is handed back.
pub async fn fetch_all<S>(source: &S, request: &FetchRequest<'_>) -> Result<Vec<Value>, NetBoxError>
where
    S: PageSource + ?Sized,
{
    request.check()?;

    let page_size = request.effective_page_size();
    let mut results: Vec<Value> = Vec::new();
    let mut offset = 0;
    let mut pages = 0usize;

    loop {
        let query = request.page_query(page_size, offset);
        debug!("Fetching page {} of {} (limit={}, offset={})", pages + 1, request.endpoint, page_size, offset);

        let page = source.get_page(request.endpoint, &query).await?;
        pages += 1;
        let received = page.results.len();
        results.extend(page.results);

        if let Some(max) = request.max_results {
            if results.len() >= max {
                results.truncate(max);
                break;
            }
        }

        if page.next.is_none() {
            break;
        }

        // A server that keeps advertising `next` with empty pages would loop forever.
        if received == 0 {
            debug!("Empty page with a next link from {}, stopping", request.endpoint);
            break;
        }

        offset += page_size;
    }

    info!("Fetched {} records from {} in {} request(s)", results.len(), request.endpoint, pages);
    Ok(results)
}
