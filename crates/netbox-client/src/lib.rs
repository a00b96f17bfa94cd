//! Read-only NetBox REST API Client
//!
//! A Rust client library for reading IPAM data from the NetBox REST API.
//! Provides tolerant, typed models and a paginated fetch engine.
//!
//! # Example
//!
//! ```no_run
//! use netbox_client::{ClientConfig, NetBoxClient, NetBoxReader, Record, ResourceKind};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("https://netbox.example.com", "your-api-token");
//! let client = NetBoxClient::new(&config)?;
//!
//! // Raw records, following pagination, capped at 50
//! let raw = client.fetch_many("ipam/prefixes/", &[("status", "active")], Some(50)).await?;
//!
//! // Validated records
//! let vlans = client.query_records(ResourceKind::Vlan, &[("site", "dc1")], None).await?;
//! for vlan in &vlans {
//!     if let Record::Vlan(v) = vlan {
//!         println!("{} {}", v.vid, v.name);
//!     }
//! }
//!
//! // One record by ID; a 404 comes back as NetBoxError::NotFound
//! let prefix = client.get_record(ResourceKind::Prefix, 42).await?;
//! # let _ = (raw, prefix);
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Read-only**: only HTTP GET is ever issued
//! - **Pagination**: limit/offset paging with result caps and page-size narrowing
//! - **Schema tolerance**: unknown fields are preserved and re-emitted
//! - **Mocking**: `test-util` feature provides an in-memory [`MockNetBoxClient`]

pub mod client;
pub mod common;
pub mod config;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod netbox_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::{DEFAULT_PROBE_ENDPOINTS, NetBoxClient, ProbeResult};
pub use common::query::{FetchRequest, PageSource, fetch_all};
pub use common::{HttpClient, PaginatedResponse};
pub use config::{ClientConfig, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS};
pub use error::NetBoxError;
pub use models::*;
pub use netbox_trait::NetBoxReader;
#[cfg(feature = "test-util")]
pub use mock::MockNetBoxClient;
