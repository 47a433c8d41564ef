use serde::{Deserialize, Serialize};

// ============ Dataset Models ============

/// One higher-education institution from the CHED registry snapshot.
///
/// Source snapshots disagree on column headers, so ingestion normalizes them
/// into this canonical field set. Only the name is guaranteed; rows without
/// one are dropped at load time. Absent fields are omitted from JSON output,
/// matching what the original API served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Institution {
    /// Institution name.
    pub name: String,
    /// Institution type (e.g., "Public", "Private HEI").
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub institution_type: Option<String>,
    /// City or municipality.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Province.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    /// Administrative region (e.g., "Region VII").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Website address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Telephone contact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

// ============ API Request Models ============

/// Query parameters for `GET /api/institutions`.
#[derive(Debug, Default, Deserialize)]
pub struct InstitutionQuery {
    /// Optional case-insensitive substring filter on the institution name.
    pub search: Option<String>,
}
