//! API service modules for CertForge endpoints.
//!
//! Each service provides methods for interacting with a specific
//! subset of the CertForge API.

mod acme;
mod certificates;
mod orders;
mod organizations;
mod profiles;

pub use acme::{AcmeAccountsQuery, AcmeService};
pub use certificates::{CertificatesQuery, CertificatesQueryStream, CertificatesService};
pub use orders::{OrdersQuery, OrdersQueryStream, OrdersService};
pub use organizations::OrganizationsService;
pub use profiles::ProfilesService;
