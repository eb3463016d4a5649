//! Certificate and enrollment models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CertificateId, OrderNumber, OrganizationId, ProfileId};

/// Lifecycle status of a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CertificateStatus {
    /// Enrollment received, not yet processed.
    Requested,
    /// Request accepted and queued for issuance.
    Applied,
    /// Certificate issued and available for download.
    Issued,
    /// Certificate revoked.
    Revoked,
    /// Certificate past its expiry date.
    Expired,
    /// Certificate replaced by a reissue.
    Replaced,
    /// Enrollment rejected by an approver.
    Rejected,
    /// Request invalid and discarded.
    Invalid,
    /// Any status this client version does not know about.
    #[serde(other)]
    Unknown,
}

/// Reason reported when revoking a certificate (RFC 5280 subset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RevocationReason {
    /// No particular reason given.
    Unspecified,
    /// The private key was compromised.
    KeyCompromise,
    /// The subject's affiliation changed.
    AffiliationChanged,
    /// The certificate has been replaced.
    Superseded,
    /// The certified entity ceased operation.
    CessationOfOperation,
}

/// An issued or in-flight certificate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    /// Unique certificate ID
    pub id: CertificateId,
    /// Current lifecycle status
    pub status: CertificateStatus,
    /// Subject common name
    #[serde(default)]
    pub common_name: Option<String>,
    /// Serial number, present once issued
    #[serde(default)]
    pub serial_number: Option<String>,
    /// Issuing CA name
    #[serde(default)]
    pub issuer: Option<String>,
    /// Profile the certificate was enrolled against
    #[serde(default)]
    pub profile_id: Option<ProfileId>,
    /// Organization owning the certificate
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,
    /// Order the certificate came from
    #[serde(default)]
    pub order_number: Option<OrderNumber>,
    /// Subject alternative names
    #[serde(default)]
    pub subject_alternative_names: Vec<String>,
    /// When the certificate becomes valid
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    /// When the certificate expires
    #[serde(default)]
    pub valid_to: Option<DateTime<Utc>>,
}

/// Request body for enrolling a new certificate.
///
/// # Example
///
/// ```
/// use certforge_rs::{EnrollmentRequest, OrganizationId, ProfileId};
///
/// let request = EnrollmentRequest::new("-----BEGIN CERTIFICATE REQUEST-----...",
///     ProfileId::new(12), OrganizationId::new(3))
///     .with_common_name("www.example.com")
///     .with_term_months(12);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    /// PEM-encoded certificate signing request
    pub csr: String,
    /// Profile to enroll against
    pub profile_id: ProfileId,
    /// Organization the certificate belongs to
    pub organization_id: OrganizationId,
    /// Subject common name, defaults to the CSR's
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    /// Additional subject alternative names
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subject_alternative_names: Vec<String>,
    /// Requested validity in months
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_months: Option<i32>,
    /// Free-form comment shown to approvers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl EnrollmentRequest {
    /// Create an enrollment request from a CSR, profile, and organization.
    pub fn new(
        csr: impl Into<String>,
        profile_id: ProfileId,
        organization_id: OrganizationId,
    ) -> Self {
        Self {
            csr: csr.into(),
            profile_id,
            organization_id,
            common_name: None,
            subject_alternative_names: Vec::new(),
            term_months: None,
            comment: None,
        }
    }

    /// Set the subject common name.
    pub fn with_common_name(mut self, common_name: impl Into<String>) -> Self {
        self.common_name = Some(common_name.into());
        self
    }

    /// Set the subject alternative names.
    pub fn with_subject_alternative_names(
        mut self,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.subject_alternative_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the requested validity in months.
    pub fn with_term_months(mut self, term_months: i32) -> Self {
        self.term_months = Some(term_months);
        self
    }

    /// Attach a comment for approvers.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Outcome of an enrollment or renewal call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResult {
    /// ID of the certificate being produced
    pub certificate_id: CertificateId,
    /// Order tracking the request
    #[serde(default)]
    pub order_number: Option<OrderNumber>,
    /// Status the certificate entered
    #[serde(default)]
    pub status: Option<CertificateStatus>,
}
