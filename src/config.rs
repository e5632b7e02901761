// src/config.rs
// =============================================================================
// This module builds the agent's configuration from the environment.
//
// Everything the full pipeline needs is gathered once, here, and passed
// around explicitly. No other module reads the process environment.
//
// A .env file is honored when present (local runs); in CI the variables
// come from the workflow's secrets/env blocks.
// =============================================================================

use anyhow::{Context, Result};

/// Configuration for one full pipeline run.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// GitHub repository in "owner/name" form
    pub repo: String,
    /// Post file path relative to the repository root,
    /// e.g. "content/posts/detecting-drum-hits/index.md"
    pub post_path: String,
    /// Token used both for the authenticated clone and the PR API call
    pub github_token: String,
    /// Branch the update PR targets
    pub base_branch: String,
    /// Commit author identity for the update commit
    pub author_name: String,
    pub author_email: String,
    /// OpenAI credentials and model for check planning
    pub openai_api_key: String,
    pub model: String,
}

impl AgentConfig {
    /// Reads the configuration from the environment (and .env, if present).
    ///
    /// Required: REPO, POST_PATH, GITHUB_TOKEN, OPENAI_API_KEY.
    /// Optional with defaults: BASE_BRANCH, OPENAI_MODEL,
    /// GIT_AUTHOR_NAME, GIT_AUTHOR_EMAIL.
    pub fn from_env() -> Result<Self> {
        // Ignore the error: a missing .env file is the normal CI case.
        dotenvy::dotenv().ok();

        Ok(Self {
            repo: require("REPO")?,
            post_path: require("POST_PATH")?,
            github_token: require("GITHUB_TOKEN")?,
            base_branch: or_default("BASE_BRANCH", "main"),
            author_name: or_default("GIT_AUTHOR_NAME", "Post Guardian"),
            author_email: or_default(
                "GIT_AUTHOR_EMAIL",
                "post-guardian@users.noreply.github.com",
            ),
            openai_api_key: require("OPENAI_API_KEY")?,
            model: or_default("OPENAI_MODEL", "gpt-4.1-mini"),
        })
    }
}

fn require(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{key} must be set"))
}

fn or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
