//! Certificates service for enrollment and lifecycle management.

use std::sync::Arc;

use serde::Serialize;

use crate::client::paginated::{PagedStream, PagedStreamBuilder, DEFAULT_PAGE_SIZE};
use crate::client::ClientInner;
use crate::models::{
    Certificate, CertificateId, CertificateStatus, EnrollmentRequest, EnrollmentResult,
    OrganizationId, ProfileId, RevocationReason,
};
use crate::Result;

/// Service for certificate operations.
///
/// # Example
///
/// ```no_run
/// use certforge_rs::{EnrollmentRequest, OrganizationId, ProfileId};
///
/// # async fn example(client: certforge_rs::CertforgeClient) -> certforge_rs::Result<()> {
/// let request = EnrollmentRequest::new(
///     "-----BEGIN CERTIFICATE REQUEST-----...",
///     ProfileId::new(12),
///     OrganizationId::new(3),
/// )
/// .with_term_months(12);
///
/// let enrollment = client.certificates().enroll(&request).await?;
/// let certificate = client.certificates().get(enrollment.certificate_id).await?;
/// println!("{:?}", certificate.status);
/// # Ok(())
/// # }
/// ```
pub struct CertificatesService {
    inner: Arc<ClientInner>,
}

/// Query parameters for listing certificates.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificatesQuery {
    /// Filter by lifecycle status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CertificateStatus>,
    /// Filter by subject common name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
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

impl CertificatesService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List certificates, optionally filtered.
    ///
    /// Returns a single page; use [`list_stream`](Self::list_stream) to
    /// walk the whole collection.
    pub async fn list(&self, query: Option<CertificatesQuery>) -> Result<Vec<Certificate>> {
        match query {
            Some(q) => self.inner.get_with_query("ssl/v1", &q).await,
            None => self.inner.get("ssl/v1").await,
        }
    }

    /// Get a certificate by ID.
    pub async fn get(&self, id: CertificateId) -> Result<Certificate> {
        self.inner.get(&format!("ssl/v1/{id}")).await
    }

    /// Enroll a new certificate from a CSR.
    pub async fn enroll(&self, request: &EnrollmentRequest) -> Result<EnrollmentResult> {
        self.inner.post("ssl/v1/enroll", request).await
    }

    /// Renew a certificate, producing a new one under a fresh order.
    pub async fn renew(&self, id: CertificateId) -> Result<EnrollmentResult> {
        self.inner
            .post_without_body(&format!("ssl/v1/renew/{id}"))
            .await
    }

    /// Revoke a certificate.
    pub async fn revoke(
        &self,
        id: CertificateId,
        reason: RevocationReason,
        comment: Option<&str>,
    ) -> Result<()> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct RevocationBody<'a> {
            reason: RevocationReason,
            #[serde(skip_serializing_if = "Option::is_none")]
            comment: Option<&'a str>,
        }

        self.inner
            .post_no_content(
                &format!("ssl/v1/revoke/{id}"),
                &RevocationBody { reason, comment },
            )
            .await
    }

    /// Stream all certificates matching a filter.
    ///
    /// This method returns a stream that lazily fetches pages of
    /// certificates as you iterate, which is more memory-efficient than
    /// [`list`](Self::list) for large inventories.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use futures_util::StreamExt;
    /// use certforge_rs::api::CertificatesQueryStream;
    /// use certforge_rs::CertificateStatus;
    ///
    /// # async fn example(client: certforge_rs::CertforgeClient) -> certforge_rs::Result<()> {
    /// let filter = CertificatesQueryStream {
    ///     status: Some(CertificateStatus::Issued),
    ///     ..Default::default()
    /// };
    /// let mut stream = client.certificates().list_stream(Some(filter));
    ///
    /// while let Some(result) = stream.next().await {
    ///     let certificate = result?;
    ///     println!("{:?}", certificate.common_name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn list_stream(&self, query: Option<CertificatesQueryStream>) -> PagedStream<Certificate> {
        PagedStreamBuilder::<Certificate>::new(self.inner.clone(), "ssl/v1")
            .page_size(
                query
                    .as_ref()
                    .and_then(|q| q.size)
                    .unwrap_or(DEFAULT_PAGE_SIZE),
            )
            .build_with_query(query)
    }
}

/// Query parameters for streaming certificates (without cursor fields).
///
/// Use this with `list_stream()`. Pagination is handled automatically by
/// the stream.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificatesQueryStream {
    /// Filter by lifecycle status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CertificateStatus>,
    /// Filter by subject common name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    /// Filter by organization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    /// Filter by profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<ProfileId>,
    /// Results per page (controls fetch batch size)
    #[serde(skip_serializing)]
    pub size: Option<i32>,
}
