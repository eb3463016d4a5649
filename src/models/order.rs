//! Certificate order models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CertificateId, OrderNumber, OrganizationId, ProfileId};

/// Processing status of a certificate order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Order received, waiting on validation or approval.
    Pending,
    /// Order fulfilled, certificate issued.
    Completed,
    /// Order cancelled before completion.
    Cancelled,
    /// Order rejected by an approver or validation.
    Rejected,
    /// Any status this client version does not know about.
    #[serde(other)]
    Unknown,
}

/// A certificate order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order number
    pub order_number: OrderNumber,
    /// Current processing status
    pub status: OrderStatus,
    /// Certificate produced by the order, once issued
    #[serde(default)]
    pub certificate_id: Option<CertificateId>,
    /// Profile the order was placed against
    #[serde(default)]
    pub profile_id: Option<ProfileId>,
    /// Organization that placed the order
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,
    /// Subject common name requested
    #[serde(default)]
    pub common_name: Option<String>,
    /// When the order was placed
    #[serde(default)]
    pub ordered_at: Option<DateTime<Utc>>,
    /// When the order completed
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}
