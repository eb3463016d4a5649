//! Organizations service.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::{Organization, OrganizationId, OrganizationUpdate};
use crate::Result;

/// Service for organization operations.
pub struct OrganizationsService {
    inner: Arc<ClientInner>,
}

impl OrganizationsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List all organizations visible to the customer.
    pub async fn list(&self) -> Result<Vec<Organization>> {
        self.inner.get("organization/v1").await
    }

    /// Get an organization by ID.
    pub async fn get(&self, id: OrganizationId) -> Result<Organization> {
        self.inner.get(&format!("organization/v1/{id}")).await
    }

    /// Update an organization.
    ///
    /// Only the fields set on `changes` are modified; the updated
    /// organization is returned.
    pub async fn update(
        &self,
        id: OrganizationId,
        changes: &OrganizationUpdate,
    ) -> Result<Organization> {
        self.inner
            .put(&format!("organization/v1/{id}"), changes)
            .await
    }
}
