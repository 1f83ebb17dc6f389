use serde::{Deserialize, Serialize};

/// Visible art parameters plus the disguise fields carried alongside them.
///
/// The visible fields are validated against fixed palettes; the disguise
/// fields are passed through opaquely and only interpreted by
/// `extract_hidden_auth`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,

    // Disguise fields. Names are deliberately artistic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub brush_stroke: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas_texture: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_mode: Option<String>,
}

/// Outcome of validating the visible art parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Credentials recovered from the disguise fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HiddenAuth {
    pub password: Option<String>,
    pub subscription_url: Option<String>,
}

/// One entry from a Clash-style subscription document.
///
/// Only the shadowsocks-shaped subset is guaranteed end to end; other
/// proxy types pass through as raw field values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyNode {
    pub name: String,
    pub server: String,
    pub port: u16,
    #[serde(rename = "type")]
    pub proxy_type: String,
    pub cipher: String,
    pub password: String,
}

/// One sing-box outbound in the merged routing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundDescriptor {
    pub tag: String,
    #[serde(rename = "type")]
    pub outbound_type: String,
    pub server: String,
    pub server_port: u16,
    pub method: String,
    pub password: String,
    pub domain_resolver: String,
    pub tcp_fast_open: bool,
}

/// A selector entry grouping outbound tags by region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionGroup {
    pub tag: String,
    #[serde(rename = "type")]
    pub group_type: String,
    pub outbounds: Vec<String>,
}

impl RegionGroup {
    pub fn new(label: &str, members: Vec<String>) -> Self {
        Self {
            tag: format!("{label} Region"),
            group_type: "selector".to_string(),
            outbounds: members,
        }
    }
}
