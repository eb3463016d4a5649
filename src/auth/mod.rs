//! Authentication for the CertForge API.
//!
//! Two schemes are supported, mirroring what the API accepts:
//!
//! 1. **Login/password** - static credentials sent as the `login` and
//!    `password` headers on every request.
//! 2. **Bearer token** - an `Authorization: Bearer` token with a known
//!    expiry, optionally paired with an async refresh callback that is
//!    invoked automatically when the token nears expiry.
//!
//! Exactly one scheme is active per client; a bearer token always takes
//! priority if both happen to be present.
//!
//! # Login/password
//!
//! ```no_run
//! use certforge_rs::{CertforgeClient, ClientConfig};
//!
//! # fn example() -> certforge_rs::Result<()> {
//! let client = CertforgeClient::login(
//!     ClientConfig::new("https://hub.certforge.com/api", "my-customer"),
//!     "api-user",
//!     "api-password",
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! # Bearer token with refresh
//!
//! ```no_run
//! use certforge_rs::{CertforgeClient, ClientConfig, IssuedToken};
//! use chrono::{Duration, Utc};
//!
//! # fn example() -> certforge_rs::Result<()> {
//! let client = CertforgeClient::with_refreshing_token(
//!     ClientConfig::new("https://hub.certforge.com/api", "my-customer"),
//!     "initial-token",
//!     Utc::now() + Duration::minutes(15),
//!     || Box::pin(async {
//!         Ok(IssuedToken::new("fresh-token", Utc::now() + Duration::minutes(15)))
//!     }),
//! )?;
//! # Ok(())
//! # }
//! ```

mod credentials;

pub use credentials::{Credentials, IssuedToken, RefreshFn};
