//! Favicon lookups for the steganographic response.
//!
//! This is the binary variant of the resilient fetcher: it rejects text
//! content, sniffs image bytes when the content-type header is absent or
//! untrustworthy, and always produces a result so the caller never has to
//! branch on failure.

use artcanvas_common::config::fetch::{FAVICON_TIMEOUT_SECS, MAX_ATTEMPTS, RETRY_DELAY_MS};
use data_encoding::BASE64;
use std::time::Duration;
use tracing::debug;

/// A 16x16 transparent PNG used whenever no real favicon can be fetched
const DEFAULT_FAVICON_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAABAAAAAQCAYAAAAf8/9hAAAABGdBTUEAALGPC/xhBQAAACBjSFJNAAB6JgAAgIQAAPoAAACA6AAAdTAAAOpgAAA6mAAAF3CculE8AAAABmJLR0QA/wD/AP+gvaeTAAAAB3RJTUUH5wkTBwgJ9q3CgAAAAB9JREFUOMtjYBgFo2AUjIJRMApGwSgYBaNgFAwPAAAFEAABr8G/kgAAAABJRU5ErkJggg==";

/// One fetched (or defaulted) favicon
#[derive(Debug, Clone)]
pub struct FaviconResult {
    pub favicon_base64: String,
    pub mime_type: String,
    pub is_default: bool,
}

impl FaviconResult {
    /// The fixed default favicon, used when there is nothing to fetch
    /// or nothing fetchable.
    pub fn fallback() -> Self {
        Self {
            favicon_base64: DEFAULT_FAVICON_BASE64.to_string(),
            mime_type: "image/png".to_string(),
            is_default: true,
        }
    }
}

/// Fetch the favicon for a site, trying the usual well-known locations
/// before a favicon-service fallback. Total failure yields the default
/// favicon, never an error.
pub async fn fetch_favicon(client: &reqwest::Client, url: &str) -> FaviconResult {
    let candidates = candidate_urls(url);
    fetch_from_candidates(client, &candidates).await
}

async fn fetch_from_candidates(client: &reqwest::Client, candidates: &[String]) -> FaviconResult {
    for candidate in candidates {
        if let Some((bytes, content_type)) = fetch_bytes(client, candidate).await {
            match resolve_mime(&bytes, content_type.as_deref()) {
                Some(mime_type) => {
                    return FaviconResult {
                        favicon_base64: BASE64.encode(&bytes),
                        mime_type,
                        is_default: false,
                    }
                }
                None => {
                    debug!(url = candidate, "candidate served text content, skipping");
                }
            }
        }
    }

    FaviconResult::fallback()
}

/// Well-known favicon locations for a site, most specific first
fn candidate_urls(url: &str) -> Vec<String> {
    match reqwest::Url::parse(url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or_default().to_string();
            let base = format!("{}://{}", parsed.scheme(), host);
            vec![
                format!("{base}/favicon.ico"),
                format!("{base}/favicon.png"),
                format!("{base}/apple-touch-icon.png"),
                format!("{base}/apple-touch-icon-180x180.png"),
                format!("{base}/apple-touch-icon-152x152.png"),
                format!("{base}/android-chrome-192x192.png"),
                format!("https://www.google.com/s2/favicons?domain={host}&sz=64"),
            ]
        }
        Err(_) => vec![format!(
            "https://www.google.com/s2/favicons?domain={url}&sz=64"
        )],
    }
}

async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Option<(Vec<u8>, Option<String>)> {
    let timeout = Duration::from_secs(FAVICON_TIMEOUT_SECS);

    for attempt in 1..=MAX_ATTEMPTS {
        match tokio::time::timeout(timeout, try_fetch_bytes(client, url)).await {
            Ok(Ok(result)) => return Some(result),
            Ok(Err(reason)) => debug!(url, attempt, %reason, "favicon attempt failed"),
            Err(_) => debug!(url, attempt, "favicon attempt timed out"),
        }

        if attempt < MAX_ATTEMPTS {
            tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS)).await;
        }
    }

    None
}

async fn try_fetch_bytes(
    client: &reqwest::Client,
    url: &str,
) -> Result<(Vec<u8>, Option<String>), String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        return Err(format!("status {}", response.status()));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let bytes = response.bytes().await.map_err(|e| e.to_string())?;
    Ok((bytes.to_vec(), content_type))
}

/// Decide the mime type for fetched bytes. `None` means the content is
/// text and the candidate must be skipped; an image/* header is trusted,
/// anything else falls back to magic-byte sniffing.
fn resolve_mime(bytes: &[u8], content_type: Option<&str>) -> Option<String> {
    if let Some(header) = content_type {
        let essence = header.split(';').next().unwrap_or(header).trim();
        if essence.starts_with("text/") {
            return None;
        }
        if essence.starts_with("image/") {
            return Some(essence.to_string());
        }
    }

    Some(sniff_mime(bytes))
}

fn sniff_mime(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        return "image/png".to_string();
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg".to_string();
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return "image/gif".to_string();
    }

    // Generic SVG/XML text probe on the leading bytes
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(512)]);
    if head.contains("<?xml") || head.contains("<svg") {
        return "image/svg+xml".to_string();
    }

    // .ico files have no better signature than this
    "image/x-icon".to_string()
}

/// Encode a favicon as a data URL for embedding into the art response
pub fn encode_favicon_for_art(favicon: &FaviconResult) -> String {
    format!(
        "data:{};base64,{}",
        favicon.mime_type, favicon.favicon_base64
    )
}
