// src/pipeline.rs
// =============================================================================
// This module sequences one full agent run:
//
//   read post -> plan checks -> extract URLs -> verify links -> decide
//
// The stages are strictly sequential; each consumes the previous stage's
// output. Only the final publish step touches anything outside this
// process, so re-running everything up to the gate is harmless.
//
// The planner and publisher are consumed through traits, matching how they
// face the pipeline: opaque collaborators with one operation each. The
// production implementations talk to OpenAI and GitHub; tests substitute
// in-memory ones.
//
// Failure policy: a broken link is a finding, not an error. A failed
// planning call or a failed publish is an error and aborts the run.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;
use tracing::info;

use crate::checker::{self, LinkVerdict, VerificationReport};
use crate::config::AgentConfig;
use crate::planner::{CheckPlan, Planner};
use crate::publisher::{PublishOutcome, Publisher};

/// Produces a check plan from post content. Errors are fatal to the run.
#[async_trait]
pub trait CheckPlanner: Send + Sync {
    async fn plan(&self, post_content: &str) -> Result<CheckPlan>;
}

#[async_trait]
impl CheckPlanner for Planner {
    async fn plan(&self, post_content: &str) -> Result<CheckPlan> {
        Planner::plan(self, post_content).await
    }
}

/// Publishes the findings of a failed verification run. Receives the full
/// verdict list; filtering to broken entries is the publisher's business.
#[async_trait]
pub trait UpdatePublisher: Send + Sync {
    async fn publish(&self, verdicts: &[LinkVerdict]) -> Result<PublishOutcome>;
}

#[async_trait]
impl UpdatePublisher for Publisher {
    async fn publish(&self, verdicts: &[LinkVerdict]) -> Result<PublishOutcome> {
        Publisher::publish(self, verdicts).await
    }
}

/// How one pipeline run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Every link verified fine; nothing was published.
    Clean(VerificationReport),
    /// Failures were found and a pull request was opened.
    Published(VerificationReport, PublishOutcome),
    /// Failures were found but --dry-run stopped short of publishing.
    DryRun(VerificationReport),
}

/// Runs the whole check-plan-act pipeline once with the production
/// collaborators.
pub async fn run(config: &AgentConfig, dry_run: bool) -> Result<RunOutcome> {
    // 1. Acquire content. The workflow checks the blog repo out before
    // running us, so POST_PATH resolves locally as well as in the clone
    // the publisher makes later.
    let content = fs::read_to_string(&config.post_path)
        .with_context(|| format!("failed to read post at {}", config.post_path))?;
    info!(post = %config.post_path, bytes = content.len(), "read post");

    let planner = Planner::new(config);
    let publisher = Publisher::new(config.clone());
    run_with(&planner, &publisher, &content, dry_run).await
}

/// The pipeline proper, generic over its collaborators.
pub async fn run_with(
    planner: &impl CheckPlanner,
    publisher: &impl UpdatePublisher,
    content: &str,
    dry_run: bool,
) -> Result<RunOutcome> {
    // 2. Plan. Fatal if the model call errors or returns a non-plan.
    let plan = planner.plan(content).await?;

    // 3. Extract URLs. A plan without a link_check entry is simply a run
    // with nothing to verify.
    let urls = plan.link_urls();
    info!(count = urls.len(), "planner proposed link checks");

    // 4. Verify.
    let report = checker::verify_links(urls).await;

    // 5. Decide.
    if !report.any_failures {
        info!("all links verified, nothing to publish");
        return Ok(RunOutcome::Clean(report));
    }

    let broken = report.verdicts.iter().filter(|v| !v.ok).count();

    if dry_run {
        info!(broken, "dry run: would open a pull request");
        return Ok(RunOutcome::DryRun(report));
    }

    info!(broken, "broken links found, publishing update");
    let outcome = publisher.publish(&report.verdicts).await?;

    Ok(RunOutcome::Published(report, outcome))
}
