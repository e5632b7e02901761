// src/checker/mod.rs
// =============================================================================
// This module contains all link verification logic.
//
// Submodules:
// - normalize: Canonicalizes raw link strings into fetchable URLs
// - http: Resolves URLs to verdicts (redirects, method fallback, timeouts)
// - markdown: Extracts candidate links from a post's Markdown source
//
// This file (mod.rs) is the module root - it re-exports the public API so
// callers can write `checker::verify_links()` without knowing the internal
// layout.
// =============================================================================

mod http;
mod markdown;
mod normalize;

pub use http::{verify_links, LinkVerdict, VerificationReport};
pub use markdown::extract_post_links;
