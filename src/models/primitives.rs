//! Primitive types and newtypes for type-safe API interactions.
//!
//! This module provides strongly-typed wrappers around numeric identifiers
//! to prevent mixing up different types of IDs at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A strongly-typed certificate ID.
///
/// # Example
///
/// ```
/// use certforge_rs::CertificateId;
///
/// let id = CertificateId::new(123456);
/// println!("Certificate: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateId(i64);

impl CertificateId {
    /// Create a new certificate ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the numeric value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CertificateId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A strongly-typed order number.
///
/// # Example
///
/// ```
/// use certforge_rs::OrderNumber;
///
/// let order: OrderNumber = 990051.into();
/// assert_eq!(order.value(), 990051);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(i64);

impl OrderNumber {
    /// Create a new order number.
    pub fn new(number: i64) -> Self {
        Self(number)
    }

    /// Get the numeric value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for OrderNumber {
    fn from(number: i64) -> Self {
        Self(number)
    }
}

/// A strongly-typed organization ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(i32);

impl OrganizationId {
    /// Create a new organization ID.
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Get the numeric value.
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for OrganizationId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// A strongly-typed certificate profile ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(i32);

impl ProfileId {
    /// Create a new profile ID.
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Get the numeric value.
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ProfileId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// A strongly-typed ACME account ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcmeAccountId(i64);

impl AcmeAccountId {
    /// Create a new ACME account ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the numeric value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for AcmeAccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for AcmeAccountId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_id() {
        let id = CertificateId::new(123456);
        assert_eq!(id.value(), 123456);
        assert_eq!(id.to_string(), "123456");
    }

    #[test]
    fn test_order_number() {
        let order: OrderNumber = 990051.into();
        assert_eq!(order.value(), 990051);
    }

    #[test]
    fn test_ids_serialize_as_bare_numbers() {
        let id = ProfileId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");

        let parsed: CertificateId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, CertificateId::new(42));
    }
}
