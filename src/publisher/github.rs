// src/publisher/github.rs
// =============================================================================
// This module opens pull requests through the GitHub REST API.
//
// One call: POST /repos/{owner}/{repo}/pulls with the pushed branch as head.
// GitHub requires a User-Agent header on every API request, and the token
// goes in a bearer Authorization header.
// =============================================================================

use anyhow::{bail, Context, Result};
use reqwest::header;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const API_BASE: &str = "https://api.github.com";

#[derive(Debug, Serialize)]
struct NewPullRequest<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
    body: &'a str,
}

// The one field we need back out of GitHub's (large) PR object.
#[derive(Debug, Deserialize)]
struct PullRequest {
    html_url: String,
}

/// Opens a pull request and returns its web URL.
pub async fn create_pull_request(
    token: &str,
    repo: &str,
    base: &str,
    head: &str,
    title: &str,
    body: &str,
) -> Result<String> {
    let client = Client::new();

    let response = client
        .post(format!("{API_BASE}/repos/{repo}/pulls"))
        .bearer_auth(token)
        .header(header::USER_AGENT, "post-guardian")
        .header(header::ACCEPT, "application/vnd.github+json")
        .json(&NewPullRequest {
            title,
            head,
            base,
            body,
        })
        .send()
        .await
        .context("GitHub pull request call failed")?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        bail!("GitHub error {status}: {detail}");
    }

    let pr: PullRequest = response
        .json()
        .await
        .context("GitHub returned an unexpected pull request payload")?;

    Ok(pr.html_url)
}
