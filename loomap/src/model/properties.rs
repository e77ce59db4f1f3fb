//! The optional facility attribute bag.

use serde::{Deserialize, Serialize};

/// Facility attributes carried by both reports and canonical loos.
///
/// Every field is optional: `None` means "unknown", which is distinct from
/// any concrete value (a facility with `baby_change: None` has not been
/// surveyed for a changing table; `Some(false)` means someone checked and
/// there isn't one). Serialized names are camelCase to match the
/// registry's document schema; `kind` persists as `type`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LooProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Access level, e.g. "public" or "customers only"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    /// Compact weekly opening-hours string, see [`crate::hours`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening: Option<String>,
    /// Facility type, e.g. "female", "male", "unisex"
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessible_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baby_change: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baby_change_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changing_place: Option<bool>,
    /// Accessible via RADAR key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radar: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attended: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automatic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architectural_interest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historical_interest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geocoded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geocoding_method: Option<String>,
}
