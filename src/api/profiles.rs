//! Certificate profiles service.

use std::sync::Arc;

use crate::client::{ClientInner, Conditional};
use crate::models::{Profile, ProfileId};
use crate::Result;

/// Service for certificate profile operations.
///
/// Profiles are near-static configuration, so this service also offers a
/// conditional fetch that plays with the client's validator cache.
pub struct ProfilesService {
    inner: Arc<ClientInner>,
}

impl ProfilesService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List all profiles available to the customer.
    pub async fn list(&self) -> Result<Vec<Profile>> {
        self.inner.get("profile/v1").await
    }

    /// Get a profile by ID.
    pub async fn get(&self, id: ProfileId) -> Result<Profile> {
        self.inner.get(&format!("profile/v1/{id}")).await
    }

    /// Get a profile by ID, revalidating a previously seen version.
    ///
    /// With the validator cache enabled
    /// ([`ClientConfig::with_validator_cache`](crate::ClientConfig::with_validator_cache)),
    /// a repeat fetch sends `If-None-Match` and an unchanged profile comes
    /// back as [`Conditional::NotModified`] without a response body.
    /// Without the cache this behaves like [`get`](Self::get), always
    /// returning [`Conditional::Fresh`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use certforge_rs::{Conditional, ProfileId};
    ///
    /// # async fn example(client: certforge_rs::CertforgeClient) -> certforge_rs::Result<()> {
    /// match client.profiles().get_conditional(ProfileId::new(12)).await? {
    ///     Conditional::Fresh(profile) => println!("changed: {}", profile.name),
    ///     Conditional::NotModified => println!("still current"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_conditional(&self, id: ProfileId) -> Result<Conditional<Profile>> {
        self.inner.get_conditional(&format!("profile/v1/{id}")).await
    }
}
