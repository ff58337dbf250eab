// Core types for the verification harness
use crate::config::Suite;
use serde::Serialize;

/// Why a single check failed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CheckError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Expected status code {expected}, got {actual}")]
    UnexpectedStatus { expected: u16, actual: u16 },
    #[error("Response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("Response is not a JSON object")]
    NotAnObject,
    #[error("Response is not a list")]
    NotAnArray,
    #[error("Response list contains a non-object element")]
    NonObjectRecord,
    #[error("Response does not contain '{0}' field")]
    MissingField(String),
    #[error("Expected {field} to be {expected}, got {actual}")]
    FieldMismatch {
        field: String,
        expected: String,
        actual: String,
    },
    #[error("Could not find status with ID {0} in the response")]
    RecordNotFound(String),
    #[error("{0} header not found")]
    MissingHeader(String),
    #[error("Expected '*' or '{sent}', got '{received}'")]
    OriginNotAllowed { sent: String, received: String },
}

/// Failures that prevent a run from starting
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Failed to create HTTP client: {0}")]
    ClientInit(String),
}

/// Outcome of one executed check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    /// Failure description, None when passed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Record id produced by create checks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_id: Option<String>,
    pub duration_ms: u64,
}

/// Aggregated results of one run, in execution order
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub suite: Suite,
    pub base_url: String,
    /// Local timestamp at run start (RFC 3339)
    pub started_at: String,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }

    /// 0 when every check passed, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }

    pub fn failed(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}
