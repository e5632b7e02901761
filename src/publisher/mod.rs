// src/publisher/mod.rs
// =============================================================================
// This module turns a failed verification run into a pull request.
//
// Submodules:
// - github: Opens the pull request through the GitHub REST API
//
// Flow:
// 1. Clone the target repository into a scratch directory (token-auth HTTPS)
// 2. Branch off the base branch
// 3. Append a dated "## Update (<Mon YYYY>)" section listing the broken
//    links to the post file
// 4. Commit, push, open the PR, report its URL
//
// Guard: one update per calendar month. If the post already carries this
// month's heading the publish fails, and the pipeline surfaces that as a
// run failure. No retry and no override.
// =============================================================================

mod github;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use crate::checker::LinkVerdict;
use crate::config::AgentConfig;

/// What a successful publish produced.
#[derive(Debug)]
pub struct PublishOutcome {
    pub branch: String,
    pub pr_url: String,
}

pub struct Publisher {
    config: AgentConfig,
}

impl Publisher {
    pub fn new(config: AgentConfig) -> Self {
        Self { config }
    }

    /// Publishes the findings as a pull request.
    ///
    /// Receives the full verdict list and filters to broken entries itself;
    /// the caller only decided that there is something worth publishing.
    pub async fn publish(&self, verdicts: &[LinkVerdict]) -> Result<PublishOutcome> {
        let broken: Vec<&LinkVerdict> = verdicts.iter().filter(|v| !v.ok).collect();
        if broken.is_empty() {
            bail!("publish called with no broken links");
        }

        let now = Utc::now();
        let branch = format!("post-guardian/update-{}", now.format("%Y%m%d-%H%M%S"));
        let period = now.format("%b %Y").to_string();

        let workdir = tempfile::tempdir().context("failed to create scratch directory")?;
        let repo_dir = workdir.path().join("repo");

        info!(repo = %self.config.repo, branch = %branch, "preparing update branch");

        let clone_url = format!(
            "https://x-access-token:{}@github.com/{}.git",
            self.config.github_token, self.config.repo
        );
        self.run_git(workdir.path(), &["clone", &clone_url, "repo"])?;
        self.run_git(&repo_dir, &["checkout", &self.config.base_branch])?;
        self.run_git(&repo_dir, &["checkout", "-b", &branch])?;

        let post_file = repo_dir.join(&self.config.post_path);
        if !post_file.exists() {
            bail!("POST_PATH not found in repository: {}", self.config.post_path);
        }

        append_update(&post_file, &broken, &period)?;

        let author_name = format!("user.name={}", self.config.author_name);
        let author_email = format!("user.email={}", self.config.author_email);
        let message = format!("Append {period} update with broken-link findings");

        self.run_git(&repo_dir, &["add", &self.config.post_path])?;
        self.run_git(
            &repo_dir,
            &["-c", &author_name, "-c", &author_email, "commit", "-m", &message],
        )?;
        self.run_git(&repo_dir, &["push", "origin", &branch])?;

        let pr_url = github::create_pull_request(
            &self.config.github_token,
            &self.config.repo,
            &self.config.base_branch,
            &branch,
            &pr_title(&self.config.post_path),
            "Automated update appended by post-guardian.\n\n\
             The scheduled check found broken links in this post; \
             see the appended Update section for the list.",
        )
        .await?;

        info!(pr = %pr_url, "opened pull request");

        Ok(PublishOutcome { branch, pr_url })
    }

    // Runs one git command in `dir`, failing loudly on a non-zero exit.
    // The token never reaches the logs.
    fn run_git(&self, dir: &Path, args: &[&str]) -> Result<()> {
        let shown = args
            .join(" ")
            .replace(&self.config.github_token, "***");
        debug!("+ git {shown}");

        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .status()
            .with_context(|| format!("failed to run git {shown}"))?;

        if !status.success() {
            bail!("git {shown} exited with {status}");
        }

        Ok(())
    }
}

// Appends the dated update section, refusing a second update for the same
// calendar month.
fn append_update(path: &Path, broken: &[&LinkVerdict], period: &str) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read post at {}", path.display()))?;

    let heading = format!("## Update ({period})");
    if content.contains(&heading) {
        bail!("post already has an update for {period}");
    }

    let mut block = format!("\n{heading}\n\nAutomated check found broken links in this post:\n\n");
    for verdict in broken {
        block.push_str(&format!("- {} ({})\n", verdict.url, describe(verdict)));
    }

    fs::write(path, content + &block)
        .with_context(|| format!("failed to write post at {}", path.display()))
}

fn describe(verdict: &LinkVerdict) -> String {
    match (verdict.status, verdict.error.as_deref()) {
        (Some(status), _) => format!("HTTP {status}"),
        (None, Some(error)) => error.to_string(),
        (None, None) => "unreachable".to_string(),
    }
}

fn pr_title(post_path: &str) -> String {
    // Hugo posts live at .../<slug>/index.md; the slug names the PR.
    let slug = Path::new(post_path)
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or(post_path);

    format!("Post update: {slug}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn verdict(url: &str, status: Option<u16>, error: Option<&str>) -> LinkVerdict {
        LinkVerdict {
            url: url.to_string(),
            status,
            ok: false,
            error: error.map(String::from),
        }
    }

    #[test]
    fn appends_dated_section_with_broken_links() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# Post\n\nBody.").unwrap();

        let v1 = verdict("https://gone.test", Some(404), None);
        let v2 = verdict("https://dark.test", None, Some("Connection failed"));
        append_update(file.path(), &[&v1, &v2], "Aug 2026").unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert!(content.starts_with("# Post"));
        assert!(content.contains("## Update (Aug 2026)"));
        assert!(content.contains("- https://gone.test (HTTP 404)"));
        assert!(content.contains("- https://dark.test (Connection failed)"));
    }

    #[test]
    fn refuses_second_update_same_month() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# Post\n\n## Update (Aug 2026)\n\nOld findings.").unwrap();

        let v = verdict("https://gone.test", Some(404), None);
        let err = append_update(file.path(), &[&v], "Aug 2026").unwrap_err();
        assert!(err.to_string().contains("already has an update"));

        // A different month is fine.
        append_update(file.path(), &[&v], "Sep 2026").unwrap();
        let content = fs::read_to_string(file.path()).unwrap();
        assert!(content.contains("## Update (Sep 2026)"));
    }

    #[test]
    fn pr_title_uses_post_slug() {
        assert_eq!(
            pr_title("content/posts/detecting-drum-hits/index.md"),
            "Post update: detecting-drum-hits"
        );
        assert_eq!(pr_title("post.md"), "Post update: post.md");
    }
}
