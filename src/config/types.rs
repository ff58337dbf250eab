use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which group of checks to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suite {
    /// Root greeting, record create/list, CORS and persistence checks
    Core,
    /// Nested-payload and backward compatibility checks
    Extended,
    /// Core followed by extended
    All,
}

impl std::fmt::Display for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Suite::Core => write!(f, "core"),
            Suite::Extended => write!(f, "extended"),
            Suite::All => write!(f, "all"),
        }
    }
}

/// Fully resolved harness configuration.
///
/// Built once before any check runs and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeConfig {
    /// Service base URL without trailing slash (e.g. "https://svc.example.com")
    pub base_url: String,
    /// Mount point of the API, always starting with '/' or empty
    pub api_prefix: String,
    /// Per-request timeout
    pub timeout_ms: u32,
    /// Origin header value sent by the CORS check
    pub origin: String,
    pub suite: Suite,
}

/// Optional settings read from a TOML file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub api_prefix: Option<String>,
    pub timeout_ms: Option<u32>,
    pub origin: Option<String>,
}

/// Command-line values that take precedence over every other source
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub api_prefix: Option<String>,
    pub timeout_ms: Option<u32>,
    pub origin: Option<String>,
    pub suite: Suite,
}

impl Default for ConfigOverrides {
    fn default() -> Self {
        Self {
            base_url: None,
            api_prefix: None,
            timeout_ms: None,
            origin: None,
            suite: Suite::Core,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("base URL not configured: pass --base-url or set one of {0}")]
    MissingBaseUrl(String),
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),
    #[error("timeout must be greater than zero")]
    InvalidTimeout,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to load env file {path}: {message}")]
    EnvFile { path: PathBuf, message: String },
}
