// src/lib.rs
// =============================================================================
// Library root for post-guardian.
//
// The binary in main.rs is a thin CLI over these modules; they are exposed
// as a library so integration tests (and any other orchestration layer) can
// drive the verification engine directly.
// =============================================================================

pub mod checker;
pub mod cli;
pub mod config;
pub mod pipeline;
pub mod planner;
pub mod publisher;
