// src/main.rs
// =============================================================================
// This is the entry point of the post-guardian agent.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Dispatch to the appropriate subcommand handler
// 3. Print verdicts (table or JSON) and exit with a meaningful code
//
// Exit codes: 0 = clean, 1 = broken links found, 2 = error
// (planning failure, publish failure, unreadable post, bad config).
// =============================================================================

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use post_guardian::checker::{self, LinkVerdict, VerificationReport};
use post_guardian::cli::{Cli, Commands};
use post_guardian::config::AgentConfig;
use post_guardian::pipeline::{self, RunOutcome};

#[tokio::main]
async fn main() {
    // RUST_LOG controls verbosity; default to our own info-level events.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("post_guardian=info")),
        )
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { dry_run, json } => handle_run(dry_run, json).await,
        Commands::Check { post_path, json } => handle_check(&post_path, json).await,
    }
}

// Handles the 'run' subcommand: the full check-plan-act pipeline.
async fn handle_run(dry_run: bool, json: bool) -> Result<i32> {
    let config = AgentConfig::from_env()?;

    match pipeline::run(&config, dry_run).await? {
        RunOutcome::Clean(report) => {
            print_report(&report, json)?;
            println!("✅ All links verified, no update needed");
            Ok(0)
        }
        RunOutcome::DryRun(report) => {
            print_report(&report, json)?;
            println!("🔍 [dry run] Broken links found; would open a pull request");
            Ok(1)
        }
        RunOutcome::Published(report, outcome) => {
            print_report(&report, json)?;
            println!("📬 Opened pull request: {}", outcome.pr_url);
            Ok(1)
        }
    }
}

// Handles the 'check' subcommand: offline verification of a local post.
async fn handle_check(post_path: &str, json: bool) -> Result<i32> {
    let content = std::fs::read_to_string(post_path)
        .map_err(|e| anyhow::anyhow!("could not read {post_path}: {e}"))?;

    let links = checker::extract_post_links(&content);
    if links.is_empty() {
        println!("✅ No links found in {post_path}");
        return Ok(0);
    }

    println!("🌐 Checking {} link(s) from {post_path}...\n", links.len());

    let report = checker::verify_links(links).await;
    print_report(&report, json)?;

    if report.any_failures {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Prints the verdicts either as a table or as JSON.
fn print_report(report: &VerificationReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_table(&report.verdicts);
    }
    Ok(())
}

// Prints verdicts as a human-readable table in the terminal.
fn print_table(verdicts: &[LinkVerdict]) {
    if verdicts.is_empty() {
        return;
    }

    println!("{:<60} {:<10} {:<30}", "URL", "STATUS", "DETAIL");
    println!("{}", "=".repeat(100));

    for verdict in verdicts {
        let status = verdict
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let detail = match (verdict.ok, verdict.error.as_deref()) {
            (true, _) => "✅ OK".to_string(),
            (false, Some(error)) => format!("❌ {error}"),
            (false, None) => "❌ Broken".to_string(),
        };

        let url = truncate_for_display(&verdict.url);

        println!("{url:<60} {status:<10} {detail:<30}");
    }

    let ok_count = verdicts.iter().filter(|v| v.ok).count();
    println!();
    println!("📊 Summary: ✅ {} ok, ❌ {} broken, 📋 {} total",
        ok_count,
        verdicts.len() - ok_count,
        verdicts.len()
    );
}

// Shortens long URLs for the table. Counts characters, not bytes: URLs come
// straight from Location headers and post markdown, and slicing a multibyte
// character in half would panic.
fn truncate_for_display(url: &str) -> String {
    match url.char_indices().nth(57) {
        Some((idx, _)) => format!("{}...", &url[..idx]),
        None => url.to_string(),
    }
}
