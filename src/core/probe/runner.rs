//! Shared sequential runner
//!
//! Executes every registered check in declared order, never stopping
//! early, and collects exactly one `TestResult` per check.

use std::time::Instant;

use uuid::Uuid;

use super::checks::{run_check, ProbeContext};
use super::registry::CheckSpec;
use super::types::{RunSummary, TestResult};

/// Run `checks` in order and return the aggregated summary
pub async fn run_checks(checks: &[CheckSpec], ctx: &mut ProbeContext<'_>) -> RunSummary {
    let run_start = Instant::now();
    let started_at = chrono::Local::now().to_rfc3339();
    let suite = ctx.config().suite;
    let base_url = ctx.config().base_url.clone();

    ctx.logger()
        .run_start(&suite.to_string(), &base_url, checks.len());
    ctx.reporter()
        .suite_start(&format!("{} checks ({})", suite, checks.len()));

    let mut results = Vec::with_capacity(checks.len());
    for spec in checks {
        let correlation_id = Uuid::new_v4().simple().to_string()[..8].to_string();
        ctx.set_correlation_id(correlation_id.clone());
        ctx.logger().check_start(spec.name, &correlation_id);
        ctx.reporter().check_start(spec.name);

        let start = Instant::now();
        let outcome = run_check(&spec.kind, ctx).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(created_id) => TestResult {
                name: spec.name.to_string(),
                passed: true,
                detail: None,
                created_id,
                duration_ms,
            },
            Err(error) => TestResult {
                name: spec.name.to_string(),
                passed: false,
                detail: Some(error.to_string()),
                created_id: None,
                duration_ms,
            },
        };

        ctx.logger().check_end(
            &result.name,
            result.passed,
            duration_ms,
            result.detail.as_deref(),
            &correlation_id,
        );
        ctx.reporter().check_end(&result);
        results.push(result);
    }

    let summary = RunSummary {
        suite,
        base_url,
        started_at,
        duration_ms: run_start.elapsed().as_millis() as u64,
        results,
    };

    ctx.logger()
        .run_end(summary.passed(), summary.total(), summary.duration_ms);
    ctx.reporter().summary(&summary);
    summary
}
