//! Common utilities for NetBox API client
//!
//! Provides the GET-only HTTP transport shared by every read operation.
//! No other HTTP verb is exposed.

pub mod query;

use crate::config::ClientConfig;
use crate::error::NetBoxError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use self::query::PageSource;

/// Paginated response wrapper from NetBox API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Total matching records on the server
    #[serde(default)]
    pub count: u64,
    /// URL of the next page, `None` on the last page
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page
    #[serde(default)]
    pub previous: Option<String>,
    /// Records on this page
    pub results: Vec<T>,
}

/// Authenticated, read-only HTTP client wrapper
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    api_root: String,
}

impl HttpClient {
    /// Build the underlying `reqwest` client from connection settings
    ///
    /// # Errors
    /// Returns [`NetBoxError::InvalidConfig`] when the settings are unusable
    /// and [`NetBoxError::Connection`] if the TLS backend fails to initialise.
    pub fn new(config: &ClientConfig) -> Result<Self, NetBoxError> {
        let api_root = config.api_root()?;

        let mut auth = HeaderValue::from_str(&format!("Token {}", config.token.trim()))
            .map_err(|e| NetBoxError::InvalidConfig(format!("token is not a valid header value: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .default_headers(headers)
            .build()
            .map_err(NetBoxError::Connection)?;

        Ok(Self { client, api_root })
    }

    /// API root, e.g. `https://netbox.example.com/api`
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Build a full URL from an endpoint relative to the API root
    pub fn build_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_root, endpoint.trim_start_matches('/'))
    }

    /// Issue a GET and return the status and body without judging either.
    async fn send(&self, endpoint: &str, query: &[(String, String)]) -> Result<(StatusCode, String), NetBoxError> {
        let url = self.build_url(endpoint);
        debug!("GET {} params={:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// GET an endpoint and only check that it answered with a success status
    ///
    /// # Errors
    /// [`NetBoxError::Connection`] on transport failure,
    /// [`NetBoxError::Status`] on a non-success status.
    pub async fn check(&self, endpoint: &str, query: &[(String, String)]) -> Result<StatusCode, NetBoxError> {
        let (status, body) = self.send(endpoint, query).await?;
        if !status.is_success() {
            return Err(status_error(endpoint, status, body));
        }
        Ok(status)
    }

    /// GET an endpoint and parse the body as JSON
    ///
    /// # Errors
    /// [`NetBoxError::Connection`] on transport failure,
    /// [`NetBoxError::Status`] on a non-success status,
    /// [`NetBoxError::MalformedResponse`] when the body is not JSON.
    pub async fn get_json(&self, endpoint: &str, query: &[(String, String)]) -> Result<Value, NetBoxError> {
        let (status, body) = self.send(endpoint, query).await?;
        if !status.is_success() {
            return Err(status_error(endpoint, status, body));
        }

        serde_json::from_str(&body).map_err(|e| NetBoxError::MalformedResponse {
            endpoint: endpoint.to_string(),
            message: format!(
                "error decoding response body: {} - Response (first 500 chars): {}",
                e,
                body.chars().take(500).collect::<String>()
            ),
        })
    }
}

fn status_error(endpoint: &str, status: StatusCode, body: String) -> NetBoxError {
    NetBoxError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body,
    }
}

/// Interpret a JSON body as one page of a list endpoint
pub(crate) fn parse_page(endpoint: &str, body: Value) -> Result<PaginatedResponse<Value>, NetBoxError> {
    if !body.is_object() {
        return Err(NetBoxError::MalformedResponse {
            endpoint: endpoint.to_string(),
            message: "expected a JSON object with a `results` list".to_string(),
        });
    }
    serde_json::from_value(body).map_err(|e| NetBoxError::MalformedResponse {
        endpoint: endpoint.to_string(),
        message: format!("not a paginated list: {e}"),
    })
}

#[async_trait]
impl PageSource for HttpClient {
    async fn get_page(&self, endpoint: &str, query: &[(String, String)]) -> Result<PaginatedResponse<Value>, NetBoxError> {
        let body = self.get_json(endpoint, query).await?;
        parse_page(endpoint, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn build_url_joins_endpoint() {
        let http = HttpClient::new(&ClientConfig::new("https://netbox.example.com/", "token"))
            .expect("valid config");
        assert_eq!(http.api_root(), "https://netbox.example.com/api");
        assert_eq!(
            http.build_url("/ipam/prefixes/"),
            "https://netbox.example.com/api/ipam/prefixes/"
        );
    }

    #[test]
    fn token_with_newline_is_a_config_error() {
        let err = HttpClient::new(&ClientConfig::new("https://nb", "abc\ndef")).expect_err("bad header");
        assert!(err.is_config());
    }

    #[test]
    fn parse_page_requires_results() {
        let err = parse_page("ipam/vlans/", json!({"count": 0, "next": null})).expect_err("no results");
        assert!(matches!(err, NetBoxError::MalformedResponse { .. }));

        let err = parse_page("ipam/vlans/", json!([1, 2])).expect_err("array body");
        assert!(matches!(err, NetBoxError::MalformedResponse { .. }));
    }

    #[test]
    fn parse_page_tolerates_missing_next() {
        let page = parse_page("ipam/vlans/", json!({"results": [{"id": 1}]})).expect("page");
        assert!(page.next.is_none());
        assert_eq!(page.results.len(), 1);
    }
}
