//! Check registry
//!
//! Each suite is an ordered list of `(name, kind)` pairs. The kind selects
//! the check operation and carries its parameters, so the core and extended
//! suites share the same check implementations.

use super::fixtures::RecordFixture;
use crate::config::Suite;

/// Fields the core create check requires in the response
pub const CORE_RECORD_FIELDS: &[&str] = &["id", "client_name", "timestamp"];

#[derive(Debug, Clone, PartialEq)]
pub enum CheckKind {
    /// GET {api}/ returns {"message": "Hello World"}
    RootGreeting,
    /// POST {api}/status with a fixture, requiring the listed response fields
    CreateRecord {
        fixture: RecordFixture,
        required_fields: &'static [&'static str],
    },
    /// GET {api}/status returns a list containing the last created id (if any)
    ListRecords,
    /// GET {api}/ with an Origin header returns a matching allow-origin header
    CorsHeaders,
    /// Create a record, then find it in the list
    Persistence { fixture: RecordFixture },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckSpec {
    pub name: &'static str,
    pub kind: CheckKind,
}

impl CheckSpec {
    pub const fn new(name: &'static str, kind: CheckKind) -> Self {
        Self { name, kind }
    }
}

pub fn core_checks() -> Vec<CheckSpec> {
    vec![
        CheckSpec::new("Root Endpoint", CheckKind::RootGreeting),
        CheckSpec::new(
            "Status POST Endpoint",
            CheckKind::CreateRecord {
                fixture: RecordFixture::Basic,
                required_fields: CORE_RECORD_FIELDS,
            },
        ),
        CheckSpec::new("Status GET Endpoint", CheckKind::ListRecords),
        CheckSpec::new("CORS Configuration", CheckKind::CorsHeaders),
        CheckSpec::new(
            "Data Persistence",
            CheckKind::Persistence {
                fixture: RecordFixture::PersistenceProbe,
            },
        ),
    ]
}

pub fn extended_checks() -> Vec<CheckSpec> {
    vec![
        CheckSpec::new(
            "Blended Income Data Handling",
            CheckKind::CreateRecord {
                fixture: RecordFixture::BlendedIncome,
                required_fields: &["id", "client_name"],
            },
        ),
        CheckSpec::new(
            "Complex Strategy Data Handling",
            CheckKind::CreateRecord {
                fixture: RecordFixture::StrategySelection,
                required_fields: &["id"],
            },
        ),
        CheckSpec::new(
            "Backward Compatibility",
            CheckKind::CreateRecord {
                fixture: RecordFixture::Minimal,
                required_fields: &[],
            },
        ),
        CheckSpec::new(
            "Data Persistence with Complex Data",
            CheckKind::Persistence {
                fixture: RecordFixture::NestedPersistence,
            },
        ),
    ]
}

/// Checks for a suite, in execution order
pub fn suite_checks(suite: Suite) -> Vec<CheckSpec> {
    match suite {
        Suite::Core => core_checks(),
        Suite::Extended => extended_checks(),
        Suite::All => core_checks().into_iter().chain(extended_checks()).collect(),
    }
}
