//! # certforge-rs
//!
//! A production-grade Rust client for the CertForge certificate management
//! REST API.
//!
//! This crate wraps every call in the same request pipeline: credential
//! handling with automatic token refresh, a configurable concurrency
//! throttle, retries with exponential backoff for transient failures, and
//! classification of server errors into typed variants.
//!
//! ## Features
//!
//! - **Authentication**: login/password headers or bearer tokens with
//!   single-flight refresh
//! - **Certificate Lifecycle**: enroll, renew, and revoke certificates
//! - **Inventory**: lazily stream certificates and orders page by page
//! - **Conditional Fetching**: opt-in `ETag` validator cache turns repeat
//!   fetches into cheap 304s
//! - **Resilience**: `Retry-After`-aware backoff, bounded concurrency,
//!   fail-fast after close
//! - **Type Safety**: strongly-typed IDs and models with compile-time
//!   guarantees
//! - **Async-first**: built on Tokio for high-performance async I/O
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use certforge_rs::{CertforgeClient, ClientConfig, EnrollmentRequest};
//!
//! #[tokio::main]
//! async fn main() -> certforge_rs::Result<()> {
//!     let config = ClientConfig::new("https://hub.certforge.com/api", "my-customer");
//!     let client = CertforgeClient::login(config, "api-user", "api-password")?;
//!
//!     // Find an enrollment profile
//!     let profiles = client.profiles().list().await?;
//!     let profile = profiles.first().expect("no profiles available");
//!
//!     // Find the organization to enroll under
//!     let organizations = client.organizations().list().await?;
//!     let organization = organizations.first().expect("no organizations");
//!
//!     // Enroll a certificate from a CSR
//!     let request = EnrollmentRequest::new(
//!         "-----BEGIN CERTIFICATE REQUEST-----...",
//!         profile.id,
//!         organization.id,
//!     )
//!     .with_common_name("www.example.com")
//!     .with_term_months(12);
//!
//!     let enrollment = client.certificates().enroll(&request).await?;
//!     println!("enrolled certificate {}", enrollment.certificate_id);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming Large Inventories
//!
//! ```rust,no_run
//! use certforge_rs::{CertforgeClient, ClientConfig};
//! use futures_util::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> certforge_rs::Result<()> {
//!     let config = ClientConfig::new("https://hub.certforge.com/api", "my-customer")
//!         .with_concurrency_limit(8);
//!     let client = CertforgeClient::login(config, "api-user", "api-password")?;
//!
//!     // Pages are fetched lazily as the stream is consumed
//!     let mut certificates = client.certificates().list_stream(None);
//!
//!     while let Some(result) = certificates.next().await {
//!         let certificate = result?;
//!         println!("{:?} {:?}", certificate.common_name, certificate.valid_to);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Refreshing Tokens and Conditional Fetches
//!
//! ```rust,no_run
//! use certforge_rs::{CertforgeClient, ClientConfig, Conditional, IssuedToken, ProfileId};
//! use chrono::{Duration, Utc};
//!
//! #[tokio::main]
//! async fn main() -> certforge_rs::Result<()> {
//!     let config = ClientConfig::new("https://hub.certforge.com/api", "my-customer")
//!         .with_validator_cache(true);
//!
//!     // The callback runs once per expiry, no matter how many requests race it
//!     let client = CertforgeClient::with_refreshing_token(
//!         config,
//!         "initial-token",
//!         Utc::now() + Duration::minutes(15),
//!         || {
//!             Box::pin(async {
//!                 // exchange a long-lived grant for a fresh token here
//!                 Ok(IssuedToken::new("fresh-token", Utc::now() + Duration::minutes(15)))
//!             })
//!         },
//!     )?;
//!
//!     // Second fetch revalidates with If-None-Match
//!     let _first = client.profiles().get_conditional(ProfileId::new(12)).await?;
//!     match client.profiles().get_conditional(ProfileId::new(12)).await? {
//!         Conditional::Fresh(profile) => println!("profile changed: {}", profile.name),
//!         Conditional::NotModified => println!("profile unchanged"),
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use auth::{Credentials, IssuedToken};
pub use client::{
    CertforgeClient, ClientConfig, Conditional, PagedStream, RetryConfig, TransportHook,
    DEFAULT_PAGE_SIZE,
};
pub use error::{Error, Result};
pub use models::{
    AcmeAccountId, Certificate, CertificateId, CertificateStatus, EnrollmentRequest,
    EnrollmentResult, OrderNumber, OrganizationId, ProfileId, RevocationReason,
};

// Re-export the HTTP method type used by `CertforgeClient::send`
pub use reqwest::Method;

/// Prelude module for convenient imports.
///
/// ```rust
/// use certforge_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::{Credentials, IssuedToken};
    pub use crate::client::{
        CertforgeClient, ClientConfig, Conditional, PagedStream, RetryConfig,
    };
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        // Primitives
        AcmeAccountId, CertificateId, OrderNumber, OrganizationId, ProfileId,
        // Certificate models
        Certificate, CertificateStatus, EnrollmentRequest, EnrollmentResult, RevocationReason,
        // Other resources
        AcmeAccount, AcmeAccountStatus, Order, OrderStatus, Organization, OrganizationUpdate,
        Profile,
    };
}
