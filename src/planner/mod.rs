// src/planner/mod.rs
// =============================================================================
// This module turns post content into a structured check plan.
//
// Submodules:
// - openai: Minimal client for the OpenAI Responses API
//
// The model reads the post's Markdown and proposes verification checks as
// JSON. This core only executes link checks; claim extraction is parsed so
// a plan containing it still round-trips, but no checker runs for it.
//
// Planning failures are fatal to the pipeline run: if the API call errors
// or the model returns something that is not a valid plan, we surface that
// instead of verifying a half-understood plan.
// =============================================================================

pub mod openai;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::AgentConfig;
use openai::OpenAiClient;

/// The structured result of planning: a list of typed checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckPlan {
    #[serde(default)]
    pub checks: Vec<Check>,
}

/// One proposed verification check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Check {
    /// Verify that these URLs still resolve
    LinkCheck {
        #[serde(default)]
        urls: Vec<String>,
    },
    /// Factual claims that may have gone stale. Reserved: parsed but not
    /// executed by this agent yet.
    ClaimExtract {
        #[serde(default)]
        claims: Vec<String>,
    },
}

impl CheckPlan {
    /// All URLs the plan wants verified. A plan without a link_check entry
    /// is a valid plan with nothing to verify.
    pub fn link_urls(&self) -> Vec<String> {
        self.checks
            .iter()
            .filter_map(|check| match check {
                Check::LinkCheck { urls } => Some(urls.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

/// Asks the model which checks the post needs.
pub struct Planner {
    client: OpenAiClient,
    model: String,
}

impl Planner {
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            client: OpenAiClient::new(&config.openai_api_key),
            model: config.model.clone(),
        }
    }

    /// Submits the post content and parses the returned plan.
    pub async fn plan(&self, post_content: &str) -> Result<CheckPlan> {
        let response = self
            .client
            .json_response(&self.model, &build_prompt(post_content))
            .await
            .context("check planning request failed")?;

        serde_json::from_str(&response)
            .with_context(|| format!("planner returned an invalid check plan: {response}"))
    }
}

fn build_prompt(post_content: &str) -> String {
    format!(
        r#"You are an agent that maintains a Hugo blog post by appending an Update section (do not rewrite existing paragraphs).

Return ONLY valid JSON with this schema:
{{
  "checks": [
    {{ "type": "link_check", "urls": ["..."] }},
    {{ "type": "claim_extract", "claims": ["..."] }}
  ]
}}

Rules:
- Prefer a small number of high-signal checks.
- Include only URLs that appear in the post.
- Claims should be concrete statements likely to become outdated.
- If there are no URLs, omit link_check.
- If there are no clear claims, return an empty claims list.

POST MARKDOWN:
{post_content}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plan_with_link_check() {
        let json = r#"{
            "checks": [
                { "type": "link_check", "urls": ["https://a.test", "https://b.test"] },
                { "type": "claim_extract", "claims": ["Rust 1.0 shipped in 2015"] }
            ]
        }"#;

        let plan: CheckPlan = serde_json::from_str(json).unwrap();
        assert_eq!(
            plan.link_urls(),
            vec!["https://a.test".to_string(), "https://b.test".to_string()]
        );
    }

    #[test]
    fn missing_link_check_means_no_urls() {
        let json = r#"{
            "checks": [
                { "type": "claim_extract", "claims": [] }
            ]
        }"#;

        let plan: CheckPlan = serde_json::from_str(json).unwrap();
        assert!(plan.link_urls().is_empty());
    }

    #[test]
    fn empty_plan_is_valid() {
        let plan: CheckPlan = serde_json::from_str(r#"{"checks": []}"#).unwrap();
        assert!(plan.link_urls().is_empty());

        // A bare object also parses: checks defaults to empty.
        let plan: CheckPlan = serde_json::from_str("{}").unwrap();
        assert!(plan.link_urls().is_empty());
    }

    #[test]
    fn multiple_link_checks_are_concatenated() {
        let json = r#"{
            "checks": [
                { "type": "link_check", "urls": ["https://a.test"] },
                { "type": "link_check", "urls": ["https://b.test"] }
            ]
        }"#;

        let plan: CheckPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.link_urls().len(), 2);
    }

    #[test]
    fn garbage_is_not_a_plan() {
        assert!(serde_json::from_str::<CheckPlan>("the post looks fine to me").is_err());
        assert!(serde_json::from_str::<CheckPlan>(r#"{"checks": "none"}"#).is_err());
    }

    #[test]
    fn prompt_embeds_the_post() {
        let prompt = build_prompt("# My Post\n\nBody text.");
        assert!(prompt.contains("# My Post"));
        assert!(prompt.contains("link_check"));
    }
}
