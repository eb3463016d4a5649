//! Certificate profile models.

use serde::{Deserialize, Serialize};

use super::ProfileId;

/// A certificate profile describing what kind of certificate can be
/// enrolled and under which constraints.
///
/// Profiles change rarely, which makes them the natural candidates for
/// conditional fetching via
/// [`ProfilesService::get_conditional`](crate::api::ProfilesService::get_conditional).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Unique profile ID
    pub id: ProfileId,
    /// Human-readable profile name
    pub name: String,
    /// What the profile is for
    #[serde(default)]
    pub description: Option<String>,
    /// Validity terms offered, in months
    #[serde(default)]
    pub term_months: Vec<i32>,
    /// Key algorithms accepted in CSRs (e.g. "RSA-2048", "EC-P256")
    #[serde(default)]
    pub key_types: Vec<String>,
    /// Whether new enrollments are accepted
    #[serde(default)]
    pub enabled: bool,
}
