//! solradmin Client - HTTP client for Solr core administration
//!
//! - [`solr`] - per-core delete, commit, reload and ping
//! - [`registry`] - wiring the configured cores into a connection registry
//!
//! # Overview
//!
//! The client handles request building, retries on transient failures and
//! mapping of Solr error responses.

pub mod registry;
pub mod solr;

// Re-export main client types
pub use registry::registry_from_config;
pub use solr::{build_http_client, SolrCoreClient};
