//! API Verification Harness
//!
//! Sends a fixed, ordered sequence of HTTP requests to the service under
//! test and records one pass/fail result per check:
//! - Registry of named checks grouped into suites (core, extended)
//! - One shared sequential runner, no short-circuit on failure
//! - Console reporter with per-check diagnostics and a summary

pub mod checks;
pub mod client;
pub mod fixtures;
pub mod parsing;
pub mod registry;
pub mod report;
pub mod runner;
pub mod types;
pub mod url;

// Re-export public API
pub use checks::ProbeContext;
pub use client::{ApiClient, ApiResponse, IsahcApiClient, Method};
pub use fixtures::RecordFixture;
pub use registry::{suite_checks, CheckKind, CheckSpec};
pub use report::Reporter;
pub use runner::run_checks;
pub use types::{CheckError, ProbeError, RunSummary, TestResult};
