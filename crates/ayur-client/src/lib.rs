//! # ayur-client
//!
//! Talks to the AyurSutra REST backend.
//!
//! - `transport` - the `Transport` seam (request/response values)
//! - `http` - `HttpTransport`, the reqwest implementation with bearer auth
//! - `client` - `ApiClient`, typed JSON helpers on top of a transport
//! - `endpoints` - every path the portal calls
//! - `export` - saving CSV exports to disk

pub mod client;
pub mod endpoints;
pub mod export;
pub mod http;
pub mod transport;

pub use client::ApiClient;
pub use export::{export_file_name, save_export};
pub use http::HttpTransport;
pub use transport::{ApiRequest, ApiResponse, Method, Transport};
