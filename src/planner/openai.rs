// src/planner/openai.rs
// =============================================================================
// Minimal client for the OpenAI Responses API.
//
// One capability only: send a prompt, force JSON output, return the text of
// the first output item. Anything fancier (tools, streaming, embeddings)
// belongs in a real client crate, not a blog maintenance bot.
// =============================================================================

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

// Just enough of the Responses API reply to pull the text out of
// output[0].content[0].text.
#[derive(Debug, Deserialize)]
struct ResponsesReply {
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentItem>,
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    #[serde(default)]
    text: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client somewhere else (a proxy, or a stub in tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Sends `input` to `model` with JSON output forced, and returns the
    /// model's text verbatim. The caller decides what that JSON means.
    pub async fn json_response(&self, model: &str, input: &str) -> Result<String> {
        let payload = json!({
            "model": model,
            "input": input,
            "text": { "format": { "type": "json_object" } },
        });

        debug!(model, "requesting check plan from OpenAI");

        let response = self
            .http
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("OpenAI request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("OpenAI error {status}: {body}");
        }

        let reply: ResponsesReply = response
            .json()
            .await
            .context("OpenAI response was not valid JSON")?;

        let text = reply
            .output
            .first()
            .and_then(|item| item.content.first())
            .map(|content| content.text.clone())
            .context("OpenAI response contained no output text")?;

        Ok(text)
    }
}
