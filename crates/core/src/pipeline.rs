//! The fetch → parse → translate pipeline shared by both request handlers.
//!
//! Best-effort end to end: unreachable sources and unparseable documents
//! shrink the output instead of failing it. Only the caller decides what
//! an empty result means.

use crate::{fetch, subscribe};
use artcanvas_common::types::OutboundDescriptor;
use tracing::info;

/// What one pipeline run produced
#[derive(Debug)]
pub struct PipelineOutput {
    /// Translated outbounds, tags not yet deduplicated
    pub outbounds: Vec<OutboundDescriptor>,
    /// Successfully fetched documents, in input order
    pub raw_documents: Vec<String>,
    pub attempted: usize,
    pub fetched: usize,
}

/// Fetch all subscription URLs, parse what arrived and translate it.
pub async fn run_subscription_pipeline(
    client: &reqwest::Client,
    urls: &[String],
    resolver_tag: &str,
) -> PipelineOutput {
    let outcomes = fetch::fetch_many(client, urls).await;
    let raw_documents: Vec<String> = outcomes
        .into_iter()
        .filter(|outcome| outcome.success)
        .filter_map(|outcome| outcome.body)
        .collect();

    let fetched = raw_documents.len();
    info!(attempted = urls.len(), fetched, "subscription fetch settled");

    let nodes = subscribe::parse_nodes(&raw_documents);
    let outbounds = subscribe::translate_nodes(nodes, resolver_tag);

    PipelineOutput {
        outbounds,
        raw_documents,
        attempted: urls.len(),
        fetched,
    }
}
