//! ACME account models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AcmeAccountId, OrganizationId, ProfileId};

/// Status of an ACME account (RFC 8555 wire names).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcmeAccountStatus {
    /// Account is usable.
    Valid,
    /// Account deactivated by the customer or an admin.
    Deactivated,
    /// Account revoked by the server.
    Revoked,
    /// Any status this client version does not know about.
    #[serde(other)]
    Unknown,
}

/// An ACME account bound to a profile and organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcmeAccount {
    /// Unique account ID
    pub id: AcmeAccountId,
    /// Current account status
    pub status: AcmeAccountStatus,
    /// Contact addresses registered with the account
    #[serde(default)]
    pub contacts: Vec<String>,
    /// Profile the account enrolls against
    #[serde(default)]
    pub profile_id: Option<ProfileId>,
    /// Organization the account belongs to
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,
    /// When the account was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
