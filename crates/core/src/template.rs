//! Base routing template handling and outbound merging.
//!
//! The base template is read-only input; merging always yields a new
//! value. Tag dedup happens only within the newly added batch, never
//! against tags already present in the base.

use crate::region;
use artcanvas_common::types::OutboundDescriptor;
use serde_json::{json, Value};
use std::collections::HashSet;

pub use artcanvas_common::config::routing::REQUIRED_SELECTOR_GROUPS;

const BUILTIN_TEMPLATE: &str = include_str!("../assets/singbox-1-12.json");

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template is not a routing config: {0}")]
    InvalidTemplate(String),

    #[error("Base template is missing required selector group \"{0}\"")]
    MissingSelectorGroup(String),
}

/// Read-only store for the base routing template
pub struct TemplateStore {
    template: Value,
}

impl TemplateStore {
    /// Load the built-in sing-box base template.
    pub fn builtin() -> Result<Self, TemplateError> {
        let template = serde_json::from_str(BUILTIN_TEMPLATE)
            .map_err(|e| TemplateError::InvalidTemplate(e.to_string()))?;
        Ok(Self { template })
    }

    /// Load a base template from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, TemplateError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TemplateError::InvalidTemplate(e.to_string()))?;
        let template = serde_json::from_str(&contents)
            .map_err(|e| TemplateError::InvalidTemplate(e.to_string()))?;
        Ok(Self { template })
    }

    pub fn get_base_template(&self) -> &Value {
        &self.template
    }
}

/// Make tags unique within the new batch, in input order.
///
/// On collision the tag gets `_1`, `_2`, ... appended, with the counter
/// restarting for each colliding base name. Tags already present in the
/// base template are deliberately not considered.
pub fn resolve_tag_conflicts(mut outbounds: Vec<OutboundDescriptor>) -> Vec<OutboundDescriptor> {
    let mut seen: HashSet<String> = HashSet::new();

    for outbound in &mut outbounds {
        let mut unique = outbound.tag.clone();
        let mut suffix = 1;

        while seen.contains(&unique) {
            unique = format!("{}_{}", outbound.tag, suffix);
            suffix += 1;
        }

        seen.insert(unique.clone());
        outbound.tag = unique;
    }

    outbounds
}

/// Merge new outbounds into the base template.
///
/// The merged outbound list is base outbounds, then the deduped batch,
/// then the region groups built from it. Region group tags (not
/// individual outbound tags) are appended to the member lists of the
/// "PROXY", "auto" and "AI" selectors. A base missing any of those three
/// is unusable and the merge fails.
pub fn merge_into_template(
    base: &Value,
    new_outbounds: Vec<OutboundDescriptor>,
) -> Result<Value, TemplateError> {
    let base_outbounds = base
        .get("outbounds")
        .and_then(Value::as_array)
        .ok_or_else(|| TemplateError::InvalidTemplate("missing outbounds array".to_string()))?;

    for group in REQUIRED_SELECTOR_GROUPS {
        if !base_outbounds.iter().any(|o| o.get("tag") == Some(&json!(group))) {
            return Err(TemplateError::MissingSelectorGroup(group.to_string()));
        }
    }

    let deduped = resolve_tag_conflicts(new_outbounds);
    let region_groups = region::build_default_region_groups(region::classify(&deduped));
    let region_tags: Vec<String> = region_groups.iter().map(|g| g.tag.clone()).collect();

    let mut merged_outbounds = base_outbounds.clone();
    for outbound in &deduped {
        merged_outbounds.push(json!(outbound));
    }
    for group in &region_groups {
        merged_outbounds.push(json!(group));
    }

    if !region_tags.is_empty() {
        for entry in merged_outbounds.iter_mut() {
            let is_required = entry
                .get("tag")
                .and_then(Value::as_str)
                .map(|tag| REQUIRED_SELECTOR_GROUPS.contains(&tag))
                .unwrap_or(false);
            if !is_required {
                continue;
            }

            let members = entry
                .get_mut("outbounds")
                .and_then(Value::as_array_mut)
                .ok_or_else(|| {
                    TemplateError::InvalidTemplate("selector group has no member list".to_string())
                })?;
            members.extend(region_tags.iter().map(|tag| json!(tag)));
        }
    }

    let mut merged = base.clone();
    merged["outbounds"] = Value::Array(merged_outbounds);
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outbound(tag: &str) -> OutboundDescriptor {
        OutboundDescriptor {
            tag: tag.to_string(),
            outbound_type: "shadowsocks".to_string(),
            server: "example.com".to_string(),
            server_port: 8388,
            method: "aes-128-gcm".to_string(),
            password: "pw".to_string(),
            domain_resolver: "dns_local".to_string(),
            tcp_fast_open: true,
        }
    }

    fn tags(outbounds: &[OutboundDescriptor]) -> Vec<&str> {
        outbounds.iter().map(|o| o.tag.as_str()).collect()
    }

    #[test]
    fn test_dedup_appends_counter_per_base_name() {
        let deduped = resolve_tag_conflicts(vec![
            outbound("A"),
            outbound("A"),
            outbound("A"),
            outbound("B"),
        ]);

        assert_eq!(tags(&deduped), vec!["A", "A_1", "A_2", "B"]);
    }

    #[test]
    fn test_dedup_counter_restarts_per_name() {
        let deduped = resolve_tag_conflicts(vec![
            outbound("A"),
            outbound("B"),
            outbound("A"),
            outbound("B"),
        ]);

        assert_eq!(tags(&deduped), vec!["A", "B", "A_1", "B_1"]);
    }

    #[test]
    fn test_dedup_ignores_base_template_tags() {
        // "direct" exists in the builtin template but must not trigger a rename
        let deduped = resolve_tag_conflicts(vec![outbound("direct")]);
        assert_eq!(tags(&deduped), vec!["direct"]);
    }

    #[test]
    fn test_builtin_template_carries_required_groups() {
        let store = TemplateStore::builtin().unwrap();
        let outbounds = store.get_base_template()["outbounds"].as_array().unwrap();

        for group in REQUIRED_SELECTOR_GROUPS {
            assert!(outbounds.iter().any(|o| o["tag"] == group), "missing {group}");
        }
    }

    #[test]
    fn test_merge_appends_outbounds_and_groups() {
        let store = TemplateStore::builtin().unwrap();
        let base = store.get_base_template();
        let base_len = base["outbounds"].as_array().unwrap().len();

        let merged =
            merge_into_template(base, vec![outbound("HK-01"), outbound("HK-02")]).unwrap();
        let merged_outbounds = merged["outbounds"].as_array().unwrap();

        // two outbounds plus one region group
        assert_eq!(merged_outbounds.len(), base_len + 3);
        assert!(merged_outbounds.iter().any(|o| o["tag"] == "HK-01"));
        assert!(merged_outbounds.iter().any(|o| o["tag"] == "🇭🇰 Region"));

        // the base value is untouched
        assert_eq!(base["outbounds"].as_array().unwrap().len(), base_len);
    }

    #[test]
    fn test_merge_wires_region_tags_into_selectors() {
        let store = TemplateStore::builtin().unwrap();
        let merged =
            merge_into_template(store.get_base_template(), vec![outbound("US-01")]).unwrap();

        for group in REQUIRED_SELECTOR_GROUPS {
            let members = merged["outbounds"]
                .as_array()
                .unwrap()
                .iter()
                .find(|o| o["tag"] == group)
                .and_then(|o| o["outbounds"].as_array())
                .unwrap();

            assert!(members.iter().any(|m| m == "🇺🇸 Region"), "{group} not wired");
            // individual outbound tags are not wired in directly
            assert!(!members.iter().any(|m| m == "US-01"));
        }
    }

    #[test]
    fn test_merge_without_region_matches_leaves_selectors_alone() {
        let store = TemplateStore::builtin().unwrap();
        let base = store.get_base_template();
        let before: Value = base["outbounds"]
            .as_array()
            .unwrap()
            .iter()
            .find(|o| o["tag"] == "PROXY")
            .cloned()
            .unwrap();

        let merged = merge_into_template(base, vec![outbound("mystery-node")]).unwrap();
        let after = merged["outbounds"]
            .as_array()
            .unwrap()
            .iter()
            .find(|o| o["tag"] == "PROXY")
            .cloned()
            .unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn test_missing_selector_group_is_fatal() {
        let base = serde_json::json!({
            "outbounds": [
                {"tag": "PROXY", "type": "selector", "outbounds": []},
                {"tag": "auto", "type": "urltest", "outbounds": []},
            ]
        });

        let err = merge_into_template(&base, vec![outbound("HK-01")]).unwrap_err();
        assert!(matches!(err, TemplateError::MissingSelectorGroup(g) if g == "AI"));
    }

    #[test]
    fn test_template_without_outbounds_is_invalid() {
        let base = serde_json::json!({"log": {}});
        let err = merge_into_template(&base, vec![]).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidTemplate(_)));
    }
}
