//! URL Construction Utilities
//!
//! All endpoints are built from the configured base URL and API prefix:
//! - Root: `{base}{prefix}/` (trailing slash kept, the greeting lives there)
//! - Records: `{base}{prefix}/status`

/// Normalize base URL by trimming trailing slashes
///
/// # Examples
/// - `https://svc.example.com/` → `https://svc.example.com`
/// - `http://localhost:8001` → `http://localhost:8001`
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Build `{base}{prefix}` with exactly one slash between the parts
///
/// # Examples
/// - (`https://svc.example.com/`, `/api`) → `https://svc.example.com/api`
/// - (`https://svc.example.com`, `api/`) → `https://svc.example.com/api`
/// - (`https://svc.example.com`, ``) → `https://svc.example.com`
pub fn build_api_url(base_url: &str, api_prefix: &str) -> String {
    let base = normalize_base_url(base_url);
    let prefix = api_prefix.trim_matches('/');
    if prefix.is_empty() {
        base
    } else {
        format!("{}/{}", base, prefix)
    }
}

/// Root greeting endpoint: `{api}/`
pub fn build_root_url(base_url: &str, api_prefix: &str) -> String {
    format!("{}/", build_api_url(base_url, api_prefix))
}

/// Status record collection endpoint: `{api}/status`
pub fn build_status_url(base_url: &str, api_prefix: &str) -> String {
    format!("{}/status", build_api_url(base_url, api_prefix))
}
