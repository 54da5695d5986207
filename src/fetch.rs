//! Node page fetching
//!
//! This module downloads the HTML page that publishes the daily node list and
//! extracts the raw descriptor blob from its `<code>` block. Some mirrors
//! reject non-browser clients with 403, so a 403 on the default client is
//! retried with browser user agents before giving up.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::get_version;

/// Per-request timeout; a stalled mirror must not hang the run
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Browser user agents tried when the default client gets a 403
const FALLBACK_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

// ============================================================================
// HTTP Fetching
// ============================================================================

/// Fetch the node page and extract the descriptor blob from its code block
pub async fn fetch_node_blob(url: &str) -> Result<String> {
    let html = fetch_page(url).await?;
    extract_code_block(&html)
        .with_context(|| format!("No node code block found in page: {}", url))
}

/// Fetch the raw HTML of the node page, falling back to browser user agents
/// when the server refuses the default client
async fn fetch_page(url: &str) -> Result<String> {
    debug!("Fetching URL: {}", url);

    let response = fetch_with_agent(url, &format!("gleaner/{}", get_version())).await?;

    let status = response.status();
    if status == StatusCode::FORBIDDEN {
        warn!("Got 403 from {}, retrying with browser user agents", url);
        return fetch_with_browser_agents(url).await;
    }
    if !status.is_success() {
        bail!("HTTP request failed with status {}: {}", status, url);
    }

    response
        .text()
        .await
        .with_context(|| format!("Failed to read response body from: {}", url))
}

async fn fetch_with_browser_agents(url: &str) -> Result<String> {
    for user_agent in FALLBACK_USER_AGENTS {
        debug!("Retrying {} with user agent: {}", url, user_agent);
        match fetch_with_agent(url, user_agent).await {
            Ok(response) if response.status().is_success() => {
                return response
                    .text()
                    .await
                    .with_context(|| format!("Failed to read response body from: {}", url));
            }
            Ok(response) => {
                debug!("User agent fallback got status {}", response.status());
            }
            Err(e) => {
                debug!("User agent fallback request failed: {:#}", e);
            }
        }
    }
    bail!("All user agent fallbacks failed for: {}", url)
}

async fn fetch_with_agent(url: &str, user_agent: &str) -> Result<reqwest::Response> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch URL: {}", url))
}

// ============================================================================
// HTML Extraction
// ============================================================================

/// Extract the descriptor blob from the first `<code>` element in the page,
/// stripping any nested markup
pub fn extract_code_block(html: &str) -> Result<String> {
    let code_re =
        regex::Regex::new(r"(?s)<code[^>]*>(.*?)</code>").context("Invalid code block pattern")?;
    let captures = code_re
        .captures(html)
        .context("Page contains no <code> element")?;

    let inner = captures
        .get(1)
        .map(|m| m.as_str())
        .unwrap_or_default();

    let tag_re = regex::Regex::new(r"<[^>]+>").context("Invalid tag pattern")?;
    let blob = tag_re.replace_all(inner, "").trim().to_string();

    if blob.is_empty() {
        bail!("Code block is empty");
    }
    Ok(blob)
}
