//! ACME accounts service (administrative).

use std::sync::Arc;

use serde::Serialize;

use crate::client::ClientInner;
use crate::models::{AcmeAccount, AcmeAccountId, AcmeAccountStatus, OrganizationId, ProfileId};
use crate::Result;

/// Service for managing ACME accounts.
pub struct AcmeService {
    inner: Arc<ClientInner>,
}

/// Query parameters for listing ACME accounts.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcmeAccountsQuery {
    /// Filter by account status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AcmeAccountStatus>,
    /// Filter by organization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    /// Filter by profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<ProfileId>,
    /// Results per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i32>,
    /// Item offset of the first result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

impl AcmeService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List ACME accounts, optionally filtered.
    pub async fn list_accounts(&self, query: Option<AcmeAccountsQuery>) -> Result<Vec<AcmeAccount>> {
        match query {
            Some(q) => self.inner.get_with_query("acme/v1/account", &q).await,
            None => self.inner.get("acme/v1/account").await,
        }
    }

    /// Get an ACME account by ID.
    pub async fn get_account(&self, id: AcmeAccountId) -> Result<AcmeAccount> {
        self.inner.get(&format!("acme/v1/account/{id}")).await
    }

    /// Deactivate an ACME account.
    ///
    /// Deactivation is permanent; clients keyed to the account stop being
    /// able to order certificates.
    pub async fn deactivate_account(&self, id: AcmeAccountId) -> Result<()> {
        self.inner
            .delete_no_content(&format!("acme/v1/account/{id}"))
            .await
    }
}
