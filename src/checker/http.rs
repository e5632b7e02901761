// src/checker/http.rs
// =============================================================================
// This module resolves URLs to a definitive verdict by making HTTP requests.
//
// Key functionality:
// - Makes HTTP HEAD requests (lightweight, no body download)
// - Falls back to GET when a server rejects HEAD (403/405)
// - Follows redirects manually, up to a fixed hop budget
// - Converts transport failures (timeout, DNS, TLS) into verdicts instead of
//   letting one bad link abort the whole run
// - Checks many links concurrently with a bounded worker count
// =============================================================================

use futures::stream::{self, StreamExt};
use reqwest::header::LOCATION;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::normalize::normalize_links;

/// Redirect hop budget per link. A fixed depth bounds worst-case latency and
/// protects against loops without needing cycle detection.
const MAX_REDIRECTS: usize = 3;

/// How many links we resolve at once. High enough to hide network latency,
/// low enough not to hammer anyone's server from a maintenance bot.
const MAX_CONCURRENT_CHECKS: usize = 8;

/// How long we wait to establish a connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// How long we wait for the server to send its response.
const READ_TIMEOUT: Duration = Duration::from_secs(10);

// The outcome of checking a single link.
//
// `url` is the final URL reached after following redirects, which is not
// necessarily the URL we started from. On a transport failure it is the
// originally supplied link, since we may not know how far the chain got.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkVerdict {
    /// The final URL reached (after following any redirects)
    pub url: String,
    /// The final HTTP status code, absent if no response was obtained
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// True iff a response was obtained and its status is 2xx
    pub ok: bool,
    /// Failure description, set only for transport failures and
    /// redirect-limit exhaustion. A definitive 404 is not an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LinkVerdict {
    fn terminal(url: String, status: u16) -> Self {
        Self {
            url,
            status: Some(status),
            ok: (200..300).contains(&status),
            error: None,
        }
    }

    fn failed(url: String, error: String) -> Self {
        Self {
            url,
            status: None,
            ok: false,
            error: Some(error),
        }
    }
}

// Everything one pipeline run needs to decide whether to act:
// the per-link detail plus the aggregate signal that gates publishing.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub verdicts: Vec<LinkVerdict>,
    pub any_failures: bool,
}

// Verifies a set of candidate links and reports one verdict per distinct
// normalized link.
//
// This is the single entry point of the verification engine. Raw strings go
// in: non-web targets (mailto: etc.) are excluded, bare domains get https://
// prepended, and duplicates collapse to one check. Resolution of distinct
// links is independent, so we fan out concurrently and join before computing
// the aggregate signal.
pub async fn verify_links(urls: Vec<String>) -> VerificationReport {
    let links = normalize_links(&urls);

    // One client for all requests (connection pooling). Redirects are
    // followed by hand in resolve_link so we can count hops and report the
    // last URL reached.
    let client = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .read_timeout(READ_TIMEOUT)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client");

    let checks = links.into_iter().map(|link| {
        let client = client.clone();
        async move { resolve_link(&client, link).await }
    });

    // Run up to MAX_CONCURRENT_CHECKS at once; results arrive as they
    // complete. Order across links carries no meaning.
    let verdicts: Vec<LinkVerdict> = stream::iter(checks)
        .buffer_unordered(MAX_CONCURRENT_CHECKS)
        .collect()
        .await;

    let any_failures = verdicts.iter().any(|v| !v.ok);

    VerificationReport {
        verdicts,
        any_failures,
    }
}

// Resolves one link to a terminal verdict, following redirects.
//
// The loop carries the current URL and the remaining hop budget. Each hop
// depends on the previous response, so resolution of one link is inherently
// sequential; it never blocks resolution of other links.
async fn resolve_link(client: &Client, link: String) -> LinkVerdict {
    let mut current = link.clone();
    let mut remaining = MAX_REDIRECTS;

    loop {
        if remaining == 0 {
            // Structural problem with the target chain, not a network
            // condition. Report the last URL we were about to fetch.
            return LinkVerdict::failed(
                current,
                format!("Max redirects ({MAX_REDIRECTS}) reached"),
            );
        }

        let response = match probe(client, &current).await {
            Ok(response) => response,
            Err(e) => {
                let description = describe_error(&e);
                warn!(link = %link, error = %description, "link check failed");
                // Transport failures carry the originally supplied link.
                return LinkVerdict::failed(link, description);
            }
        };

        let status = response.status();

        if status.is_redirection() {
            if let Some(location) = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
            {
                match resolve_location(&current, location) {
                    Ok(next) => {
                        debug!(from = %current, to = %next, "following redirect");
                        current = next;
                        remaining -= 1;
                        continue;
                    }
                    Err(e) => {
                        let description = format!("Bad redirect location: {e}");
                        warn!(link = %link, error = %description, "link check failed");
                        return LinkVerdict::failed(link, description);
                    }
                }
            }
            // A 3xx without a Location header is as terminal as it gets;
            // fall through and report it like any other non-success status.
        }

        return LinkVerdict::terminal(current, status.as_u16());
    }
}

// Issues the verification request for one URL.
//
// HEAD first because we only care about the status line, not the body. Many
// servers reject HEAD but happily serve GET, so a 403 or 405 probe response
// is retried as GET and that response is used instead.
async fn probe(client: &Client, url: &str) -> reqwest::Result<Response> {
    let response = client.head(url).send().await?;

    if matches!(response.status().as_u16(), 403 | 405) {
        return client.get(url).send().await;
    }

    Ok(response)
}

// Resolves a Location header value against the URL that produced it.
// Absolute locations are used as-is; relative ones are joined onto the
// current request URL.
fn resolve_location(base: &str, location: &str) -> anyhow::Result<String> {
    if let Ok(absolute) = Url::parse(location) {
        return Ok(absolute.to_string());
    }

    let base = Url::parse(base)?;
    Ok(base.join(location)?.to_string())
}

// Turns a reqwest error into a short human-readable description for the
// verdict's error field.
//
// Classification reads the whole source chain: reqwest's top-level Display
// is generic ("error sending request") and the interesting detail (dns
// lookup, tls certificate) sits in the nested errors.
fn describe_error(error: &reqwest::Error) -> String {
    let chain = error_chain(error);

    if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_connect() {
        if chain.contains("dns") || chain.contains("lookup") || chain.contains("resolve") {
            "Could not resolve hostname".to_string()
        } else {
            "Connection failed".to_string()
        }
    } else if chain.contains("certificate") || chain.contains("tls") || chain.contains("ssl") {
        "SSL certificate error".to_string()
    } else {
        error.to_string()
    }
}

// Flattens an error and all its sources into one lowercased string for
// keyword matching.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_ascii_lowercase()
}
