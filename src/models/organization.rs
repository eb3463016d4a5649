//! Organization models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::OrganizationId;

/// An organization registered with the CA.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Unique organization ID
    pub id: OrganizationId,
    /// Legal name
    pub name: String,
    /// Trading or assumed name, if different
    #[serde(default)]
    pub assumed_name: Option<String>,
    /// City of the registered address
    #[serde(default)]
    pub city: Option<String>,
    /// State or province of the registered address
    #[serde(default)]
    pub state_or_province: Option<String>,
    /// Two-letter country code
    #[serde(default)]
    pub country: Option<String>,
    /// When the organization's validation lapses
    #[serde(default)]
    pub validated_until: Option<DateTime<Utc>>,
}

/// Changes to apply to an organization.
///
/// Unset fields are left untouched by the server.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationUpdate {
    /// New legal name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New assumed name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assumed_name: Option<String>,
    /// New city
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// New state or province
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_or_province: Option<String>,
    /// New country code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl OrganizationUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the legal name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the assumed name.
    pub fn with_assumed_name(mut self, assumed_name: impl Into<String>) -> Self {
        self.assumed_name = Some(assumed_name.into());
        self
    }

    /// Set the city.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Set the state or province.
    pub fn with_state_or_province(mut self, state_or_province: impl Into<String>) -> Self {
        self.state_or_province = Some(state_or_province.into());
        self
    }

    /// Set the country code.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}
