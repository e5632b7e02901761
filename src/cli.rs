// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI structure is described with Rust structs
// and attributes, and clap generates the parsing code.
// =============================================================================

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "post-guardian",
    version = "0.1.0",
    about = "Keeps published blog posts honest by verifying their links",
    long_about = "post-guardian reads a published post, asks a language model which checks \
                  it needs, verifies the post's links, and opens a pull request with an \
                  appended Update section when something broke. Designed to run on a \
                  schedule in CI."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full agent pipeline (plan, verify, publish)
    ///
    /// Configuration comes from the environment: REPO, POST_PATH,
    /// GITHUB_TOKEN, OPENAI_API_KEY, and optionally BASE_BRANCH,
    /// OPENAI_MODEL, GIT_AUTHOR_NAME, GIT_AUTHOR_EMAIL.
    Run {
        /// Verify and report, but never open a pull request
        #[arg(long)]
        dry_run: bool,

        /// Output verdicts in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Verify the links of a local post file, no LLM and no publishing
    ///
    /// Example: post-guardian check content/posts/my-post/index.md
    Check {
        /// Path to the Markdown post to scan
        post_path: String,

        /// Output verdicts in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },
}
