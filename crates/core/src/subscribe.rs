//! Subscription document parsing and translation into sing-box outbounds.

use artcanvas_common::error::ArtCanvasError;
use artcanvas_common::types::{OutboundDescriptor, ProxyNode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const SUPPORTED_SCHEME: &str = "https://";

#[derive(Deserialize)]
struct ClashDoc {
    #[serde(default)]
    proxies: Vec<serde_yaml::Value>,
}

/// Parse Clash-style documents into proxy nodes.
///
/// A document that fails to parse contributes zero nodes; results are
/// flattened preserving per-document and overall input order. Entries of
/// other proxy types pass through with their raw field values.
pub fn parse_nodes(documents: &[String]) -> Vec<ProxyNode> {
    documents
        .iter()
        .flat_map(|text| match serde_yaml::from_str::<ClashDoc>(text) {
            Ok(doc) => doc.proxies.iter().filter_map(node_from_entry).collect(),
            Err(e) => {
                debug!(error = %e, "skipping unparseable subscription document");
                Vec::new()
            }
        })
        .collect()
}

fn node_from_entry(entry: &serde_yaml::Value) -> Option<ProxyNode> {
    let field = |key: &str| {
        entry
            .get(key)
            .and_then(serde_yaml::Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    // Anything without a mapping shape carries no usable fields
    entry.as_mapping()?;

    Some(ProxyNode {
        name: field("name"),
        server: field("server"),
        port: entry
            .get("port")
            .and_then(serde_yaml::Value::as_u64)
            .and_then(|p| u16::try_from(p).ok())
            .unwrap_or_default(),
        proxy_type: field("type"),
        cipher: field("cipher"),
        password: field("password"),
    })
}

/// Translate proxy nodes into sing-box shadowsocks outbounds.
///
/// Tags are the node names verbatim; uniqueness is deferred to the
/// template merger.
pub fn translate_nodes(nodes: Vec<ProxyNode>, resolver_tag: &str) -> Vec<OutboundDescriptor> {
    nodes
        .into_iter()
        .map(|node| OutboundDescriptor {
            tag: node.name,
            outbound_type: "shadowsocks".to_string(),
            server: node.server,
            server_port: node.port,
            method: node.cipher,
            password: node.password,
            domain_resolver: resolver_tag.to_string(),
            tcp_fast_open: true,
        })
        .collect()
}

/// Extract fetch targets from a decrypted request payload.
///
/// The `urls` field may be a list or a map; string values carrying the
/// supported scheme are kept. An absent field is an empty target list,
/// any other shape is an error.
pub fn params_to_urls(params: &Value) -> Result<Vec<String>, ArtCanvasError> {
    let urls_field = match params.get("urls") {
        None => return Ok(Vec::new()),
        Some(field) => field,
    };

    let values: Vec<&Value> = match urls_field {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map.values().collect(),
        _ => return Err(ArtCanvasError::parse("urls field must be an object or array")),
    };

    Ok(values
        .into_iter()
        .filter_map(Value::as_str)
        .filter(|value| value.starts_with(SUPPORTED_SCHEME))
        .map(str::to_string)
        .collect())
}
