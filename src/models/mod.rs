//! Data models for the CertForge API.
//!
//! This module contains all the strongly-typed data structures used to
//! interact with the CertForge API. Models are organized by domain:
//!
//! - [`primitives`] - ID newtypes like `CertificateId`, `OrderNumber`, etc.
//! - [`certificate`] - Certificate, enrollment, and revocation models
//! - [`order`] - Certificate order models
//! - [`organization`] - Organization models
//! - [`profile`] - Certificate profile models
//! - [`acme`] - ACME account models

pub mod primitives;
pub mod certificate;
pub mod order;
pub mod organization;
pub mod profile;
pub mod acme;

// Re-export commonly used types
pub use primitives::*;
pub use certificate::*;
pub use order::*;
pub use organization::*;
pub use profile::*;
pub use acme::*;
