//! Common test utilities: an in-memory status service and env isolation

#![allow(dead_code)]

use std::collections::HashMap;
use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use apiprobe::config::{ProbeConfig, Suite};
use apiprobe::core::probe::{ApiClient, ApiResponse, Method};
use serde_json::{json, Value};

pub const TEST_BASE_URL: &str = "http://svc.test";

pub fn test_config(suite: Suite) -> ProbeConfig {
    ProbeConfig {
        base_url: TEST_BASE_URL.to_string(),
        api_prefix: "/api".to_string(),
        timeout_ms: 1000,
        origin: "http://example.com".to_string(),
        suite,
    }
}

/// How the fake service answers cross-origin requests
#[derive(Debug, Clone, PartialEq)]
pub enum AllowOrigin {
    Wildcard,
    Echo,
    Fixed(String),
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
}

/// In-memory implementation of the status service contract
pub struct FakeStatusService {
    pub greeting: String,
    pub allow_origin: Option<AllowOrigin>,
    /// Store created records so they show up in the list
    pub persist: bool,
    pub include_timestamp: bool,
    /// Replace the root response with a raw (status, body)
    pub root_override: Option<(u16, String)>,
    /// Every request fails at the transport level
    pub unreachable: bool,
    pub(crate) records: Mutex<Vec<Value>>,
    pub(crate) requests: Mutex<Vec<RecordedRequest>>,
    pub(crate) next_id: AtomicU64,
}

impl Default for FakeStatusService {
    fn default() -> Self {
        Self {
            greeting: "Hello World".to_string(),
            allow_origin: Some(AllowOrigin::Wildcard),
            persist: true,
            include_timestamp: true,
            root_override: None,
            unreachable: false,
            records: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl FakeStatusService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn records(&self) -> Vec<Value> {
        self.records.lock().unwrap().clone()
    }

    fn respond(&self, status: u16, body: Value, origin: Option<&str>) -> ApiResponse {
        self.respond_raw(status, body.to_string().into_bytes(), origin)
    }

    fn respond_raw(&self, status: u16, body: Vec<u8>, origin: Option<&str>) -> ApiResponse {
        let mut headers = HashMap::from([(
            "content-type".to_string(),
            "application/json".to_string(),
        )]);
        let allow = match (&self.allow_origin, origin) {
            (Some(AllowOrigin::Wildcard), _) => Some("*".to_string()),
            (Some(AllowOrigin::Echo), Some(origin)) => Some(origin.to_string()),
            (Some(AllowOrigin::Fixed(value)), _) => Some(value.clone()),
            _ => None,
        };
        if let Some(value) = allow {
            headers.insert("access-control-allow-origin".to_string(), value);
        }

        ApiResponse {
            status_code: status,
            body,
            duration: Duration::from_millis(5),
            headers,
        }
    }

    fn create(&self, body: Option<&Value>, origin: Option<&str>) -> ApiResponse {
        let Some(Value::Object(fields)) = body else {
            return self.respond(422, json!({"detail": "body must be an object"}), origin);
        };
        if !fields.contains_key("client_name") {
            return self.respond(422, json!({"detail": "client_name is required"}), origin);
        }

        let mut record = fields.clone();
        let id = format!("rec-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        record.insert("id".to_string(), Value::String(id));
        if self.include_timestamp {
            record.insert(
                "timestamp".to_string(),
                Value::String("2026-10-19T12:00:00Z".to_string()),
            );
        }

        let record = Value::Object(record);
        if self.persist {
            self.records.lock().unwrap().push(record.clone());
        }
        self.respond(200, record, origin)
    }
}

#[async_trait::async_trait]
impl ApiClient for FakeStatusService {
    async fn execute(
        &self,
        method: Method,
        url: String,
        headers: HashMap<String, String>,
        body: Option<Vec<u8>>,
        _timeout_ms: u32,
    ) -> Result<ApiResponse, String> {
        let body = body.and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok());
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            url: url.clone(),
            headers: headers.clone(),
            body: body.clone(),
        });

        if self.unreachable {
            return Err("Connection refused".to_string());
        }

        let origin = headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("origin"))
            .map(|(_, value)| value.as_str());
        let path = url.strip_prefix(TEST_BASE_URL).unwrap_or(&url);

        let response = match (method, path) {
            (Method::Get, "/api/") => match &self.root_override {
                Some((status, raw)) => self.respond_raw(*status, raw.clone().into_bytes(), origin),
                None => self.respond(200, json!({ "message": self.greeting }), origin),
            },
            (Method::Post, "/api/status") => self.create(body.as_ref(), origin),
            (Method::Get, "/api/status") => {
                let records = self.records();
                self.respond(200, Value::Array(records), origin)
            }
            _ => self.respond(404, json!({"detail": "Not Found"}), origin),
        };
        Ok(response)
    }
}

/// Clears the base URL variables and points HOME at a temp dir; restores on drop
pub struct IsolatedEnv {
    saved: Vec<(&'static str, Option<String>)>,
    home: tempfile::TempDir,
}

const ISOLATED_VARS: [&str; 4] = [
    "APIPROBE_BASE_URL",
    "REACT_APP_BACKEND_URL",
    "APIPROBE_DEBUG",
    "HOME",
];

impl IsolatedEnv {
    pub fn new() -> Self {
        let saved = ISOLATED_VARS
            .iter()
            .map(|key| (*key, env::var(key).ok()))
            .collect();
        for key in ISOLATED_VARS {
            env::remove_var(key);
        }

        let home = tempfile::tempdir().expect("Failed to create temp home");
        env::set_var("HOME", home.path());

        Self { saved, home }
    }

    pub fn home(&self) -> &std::path::Path {
        self.home.path()
    }
}

impl Drop for IsolatedEnv {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
    }
}
