/// API response types

use serde::{Deserialize, Serialize};

/// Art generation response.
///
/// The shape is structurally identical whether or not the hidden
/// authentication succeeded: only the `authenticated` flag and the
/// presence of `faviconData`/`configData` differ. No error field may
/// ever appear here.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtGenerationResponse {
    /// SVG art as a data URL
    pub art_data: String,
    /// Whether the hidden credentials matched
    pub authenticated: bool,
    /// Favicon for the subscription host, present only when authenticated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon_data: Option<FaviconData>,
    /// Assembled routing configuration, present only when authenticated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_data: Option<ConfigData>,
    pub metadata: ArtMetadata,
}

/// Favicon payload attached to authenticated responses
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaviconData {
    pub favicon_base64: String,
    pub mime_type: String,
    /// data URL form, ready for embedding
    pub encoded: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

/// Routing configuration payload attached to authenticated responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigData {
    /// Merged sing-box configuration
    pub singbox: serde_json::Value,
    /// First raw subscription document, when one was fetched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clash: Option<String>,
}

/// Generation metadata
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtMetadata {
    pub style: String,
    pub complexity: String,
    pub auth_status: bool,
    /// RFC 3339 generation timestamp
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<String>>,
}
