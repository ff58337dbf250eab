//! HTTP Client Implementations
//!
//! Provides the HTTP client abstraction used by every check: one request,
//! full response body and headers returned for contract validation.

use super::types::ProbeError;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use isahc::config::{Configurable, RedirectPolicy};
use isahc::{AsyncReadResponseExt, HttpClient, Request};

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response data kept for contract validation
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status_code: u16,
    /// Raw response body
    pub body: Vec<u8>,
    /// Request duration
    pub duration: Duration,
    /// Response headers, names lowercased; repeated values joined with ", "
    pub headers: HashMap<String, String>,
}

impl ApiResponse {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// HTTP client used by the checks
///
/// Implementations send exactly one request per call and never retry.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    /// Execute a request and return the complete response
    ///
    /// # Arguments
    /// * `method` - GET or POST
    /// * `url` - Complete request URL (e.g., "https://svc.example.com/api/status")
    /// * `headers` - Extra request headers
    /// * `body` - JSON body for POST requests
    /// * `timeout_ms` - Request timeout in milliseconds
    ///
    /// # Returns
    /// * `Ok(ApiResponse)` - Any HTTP response, whatever its status
    /// * `Err(String)` - Network error or request failure
    async fn execute(
        &self,
        method: Method,
        url: String,
        headers: HashMap<String, String>,
        body: Option<Vec<u8>>,
        timeout_ms: u32,
    ) -> Result<ApiResponse, String>;
}

/// Production client implementation using isahc
pub struct IsahcApiClient {
    client: HttpClient,
}

#[async_trait::async_trait]
impl ApiClient for IsahcApiClient {
    async fn execute(
        &self,
        method: Method,
        url: String,
        headers: HashMap<String, String>,
        body: Option<Vec<u8>>,
        timeout_ms: u32,
    ) -> Result<ApiResponse, String> {
        let start = Instant::now();

        let mut builder = Request::builder()
            .method(method.as_str())
            .uri(url.as_str())
            .timeout(Duration::from_millis(timeout_ms as u64))
            .header("User-Agent", concat!("apiprobe/", env!("CARGO_PKG_VERSION")))
            .header("Accept", "application/json");

        if body.is_some() {
            builder = builder.header("Content-Type", "application/json");
        }
        for (key, value) in &headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let request = builder
            .body(body.unwrap_or_default())
            .map_err(|e| format!("Request creation failed: {}", e))?;

        let mut response = self
            .client
            .send_async(request)
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        let status_code = response.status().as_u16();

        let response_headers = collect_headers(response.headers());

        let body = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read response body: {}", e))?;

        Ok(ApiResponse {
            status_code,
            body,
            duration: start.elapsed(),
            headers: response_headers,
        })
    }
}

/// Flatten a header map; repeated fields are joined in arrival order
fn collect_headers(headers: &isahc::http::HeaderMap) -> HashMap<String, String> {
    let mut collected: HashMap<String, String> = HashMap::new();
    for (key, value) in headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        collected
            .entry(key.as_str().to_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    collected
}

impl IsahcApiClient {
    pub fn new() -> Result<Self, ProbeError> {
        let client = HttpClient::builder()
            .redirect_policy(RedirectPolicy::Limit(MAX_REDIRECTS))
            .build()
            .map_err(|e| ProbeError::ClientInit(e.to_string()))?;
        Ok(Self { client })
    }
}
