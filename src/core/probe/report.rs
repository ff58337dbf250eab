// Console reporting for check runs
use serde_json::Value;

use super::types::{RunSummary, TestResult};
use crate::config::ProbeConfig;

enum Sink {
    Stdout,
    Buffer(Vec<String>),
}

/// Writes per-check diagnostics and the run summary
///
/// Diagnostics (status codes, bodies, notes) are suppressed in quiet mode;
/// headers, verdicts and the summary are always written.
pub struct Reporter {
    sink: Sink,
    verbose: bool,
}

impl Reporter {
    pub fn console(quiet: bool) -> Self {
        Self {
            sink: Sink::Stdout,
            verbose: true,
        }
        .quiet(quiet)
    }

    /// Collects lines in memory instead of printing them
    pub fn buffered() -> Self {
        Self {
            sink: Sink::Buffer(Vec::new()),
            verbose: true,
        }
    }

    /// Suppress diagnostics, keeping headers, verdicts and the summary
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.verbose = !quiet;
        self
    }

    /// Lines collected by a buffered reporter
    pub fn lines(&self) -> &[String] {
        match &self.sink {
            Sink::Buffer(lines) => lines.as_slice(),
            Sink::Stdout => &[],
        }
    }

    fn emit(&mut self, line: String) {
        match &mut self.sink {
            Sink::Stdout => println!("{}", line),
            Sink::Buffer(lines) => lines.push(line),
        }
    }

    fn diagnostic(&mut self, line: String) {
        if self.verbose {
            self.emit(line);
        }
    }

    pub fn banner(&mut self, config: &ProbeConfig) {
        self.emit(format!(
            "Using API URL: {}",
            super::url::build_api_url(&config.base_url, &config.api_prefix)
        ));
    }

    pub fn suite_start(&mut self, label: &str) {
        self.emit(format!("\n=== Running {} ===", label));
    }

    pub fn check_start(&mut self, name: &str) {
        self.emit(format!("\n=== Testing {} ===", name));
    }

    pub fn status_code(&mut self, code: u16) {
        self.diagnostic(format!("Status Code: {}", code));
    }

    pub fn body(&mut self, body: &Value) {
        self.diagnostic(format!("Response: {}", body));
    }

    pub fn record_count(&mut self, count: usize) {
        self.diagnostic(format!("Response contains {} records", count));
    }

    pub fn header(&mut self, name: &str, value: Option<&str>) {
        self.diagnostic(format!("{}: {}", name, value.unwrap_or("<missing>")));
    }

    pub fn note(&mut self, message: &str) {
        self.diagnostic(message.to_string());
    }

    pub fn check_end(&mut self, result: &TestResult) {
        match &result.detail {
            None => self.emit(format!("✅ {} passed", result.name)),
            Some(detail) => self.emit(format!("❌ {} failed: {}", result.name, detail)),
        }
    }

    pub fn summary(&mut self, summary: &RunSummary) {
        self.emit("\n=== Test Summary ===".to_string());
        for result in &summary.results {
            let verdict = if result.passed { "PASSED" } else { "FAILED" };
            self.emit(format!("Test {}: {}", result.name, verdict));
        }
        self.emit(format!("Passed: {}/{} tests", summary.passed(), summary.total()));

        if summary.all_passed() {
            self.emit("✅ All tests passed!".to_string());
        } else {
            self.emit("❌ Some tests failed.".to_string());
            let failed: Vec<&str> = summary.failed().map(|r| r.name.as_str()).collect();
            self.emit(format!("Failed: {}", failed.join(", ")));
        }
    }
}
