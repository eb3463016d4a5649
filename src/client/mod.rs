//! HTTP client and request pipeline for the CertForge API.
//!
//! This module provides the main entry point [`CertforgeClient`] for
//! interacting with the CertForge API. Every request runs through the
//! same pipeline: credential validation, an optional concurrency
//! throttle, retry with backoff for transient failures, and error
//! classification.
//!
//! # Example
//!
//! ```no_run
//! use certforge_rs::{CertforgeClient, ClientConfig};
//!
//! # async fn example() -> certforge_rs::Result<()> {
//! let config = ClientConfig::new("https://hub.certforge.com/api", "my-customer")
//!     .with_concurrency_limit(8);
//! let client = CertforgeClient::login(config, "api-user", "api-password")?;
//!
//! // List organizations
//! let organizations = client.organizations().list().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod etag;
mod http;
pub mod paginated;
mod retry;
mod throttle;

pub use config::{ClientConfig, RetryConfig, TransportHook};
pub use etag::Conditional;
pub use http::CertforgeClient;
pub use paginated::{PagedStream, DEFAULT_PAGE_SIZE};
pub(crate) use http::ClientInner;
