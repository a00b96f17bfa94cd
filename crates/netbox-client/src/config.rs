//! Connection settings consumed by [`NetBoxClient`](crate::NetBoxClient)
//!
//! Loading these values (environment, `.env`, flags) is the caller's job;
//! this type only holds and checks them.

use std::time::Duration;

use reqwest::Url;

use crate::error::NetBoxError;

/// Default number of records requested per page
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Plain connection values for a NetBox instance
#[derive(Clone)]
pub struct ClientConfig {
    /// NetBox base URL without the `/api` suffix (e.g. `https://netbox.example.com`)
    pub base_url: String,
    /// API token sent as `Authorization: Token <token>`
    pub token: String,
    /// Records requested per page
    pub page_size: usize,
    /// Timeout applied to each individual HTTP call
    pub timeout: Duration,
    /// Verify the server's TLS certificate
    pub verify_tls: bool,
}

impl ClientConfig {
    /// Create a config with default page size, timeout and TLS verification
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verify_tls: true,
        }
    }

    /// Override the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Override the per-request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable TLS certificate verification
    #[must_use]
    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    /// Check the values and return the normalised API root (`<base>/api`).
    ///
    /// # Errors
    /// Returns [`NetBoxError::InvalidConfig`] when the URL is not an
    /// `http(s)` URL, the token is blank, or the page size is zero.
    pub fn api_root(&self) -> Result<String, NetBoxError> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(NetBoxError::InvalidConfig("NetBox URL is required".to_string()));
        }
        let parsed = Url::parse(trimmed).map_err(|e| {
            NetBoxError::InvalidConfig(format!("NetBox URL '{trimmed}' is not valid: {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(NetBoxError::InvalidConfig(format!(
                "NetBox URL '{trimmed}' must use http or https"
            )));
        }
        if self.token.trim().is_empty() {
            return Err(NetBoxError::InvalidConfig("NetBox token is required".to_string()));
        }
        if self.page_size == 0 {
            return Err(NetBoxError::InvalidConfig(
                "page size must be greater than zero".to_string(),
            ));
        }
        Ok(format!("{trimmed}/api"))
    }
}

// The token stays out of debug output.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}
