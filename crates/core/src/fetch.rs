//! Resilient HTTP fetching for subscription documents.
//!
//! Every function here returns an outcome value instead of an error:
//! a failed or timed-out fetch degrades to `success = false` and never
//! aborts sibling fetches.

use artcanvas_common::config::fetch::{ATTEMPT_TIMEOUT_SECS, MAX_ATTEMPTS, RETRY_DELAY_MS};
use futures::future::join_all;
use std::time::Duration;
use tracing::debug;

/// Retry policy for one URL
#[derive(Debug, Clone, Copy)]
pub struct FetchPolicy {
    pub attempts: u32,
    pub timeout: Duration,
    pub retry_delay: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            attempts: MAX_ATTEMPTS,
            timeout: Duration::from_secs(ATTEMPT_TIMEOUT_SECS),
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }
}

/// Result of fetching one document
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub success: bool,
    pub body: Option<String>,
}

impl FetchOutcome {
    fn failure() -> Self {
        Self {
            success: false,
            body: None,
        }
    }
}

/// Fetch one URL with bounded retries. Non-2xx responses, network errors
/// and timeouts all count as a failed attempt; this never returns an error.
pub async fn fetch_with_retry(client: &reqwest::Client, url: &str) -> FetchOutcome {
    fetch_with_policy(client, url, FetchPolicy::default()).await
}

pub async fn fetch_with_policy(
    client: &reqwest::Client,
    url: &str,
    policy: FetchPolicy,
) -> FetchOutcome {
    for attempt in 1..=policy.attempts {
        match tokio::time::timeout(policy.timeout, try_fetch(client, url)).await {
            Ok(Ok(body)) => {
                return FetchOutcome {
                    success: true,
                    body: Some(body),
                }
            }
            Ok(Err(reason)) => {
                debug!(url, attempt, %reason, "fetch attempt failed");
            }
            Err(_) => {
                debug!(url, attempt, "fetch attempt timed out");
            }
        }

        if attempt < policy.attempts {
            tokio::time::sleep(policy.retry_delay).await;
        }
    }

    FetchOutcome::failure()
}

async fn try_fetch(client: &reqwest::Client, url: &str) -> Result<String, String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        return Err(format!("status {}", response.status()));
    }

    response.text().await.map_err(|e| e.to_string())
}

/// Fetch all URLs concurrently. Settle-all semantics: the result vector
/// is in input order and a failing fetch never cancels its siblings.
pub async fn fetch_many(client: &reqwest::Client, urls: &[String]) -> Vec<FetchOutcome> {
    let futures = urls
        .iter()
        .map(|url| fetch_with_retry(client, url))
        .collect::<Vec<_>>();

    join_all(futures).await
}
