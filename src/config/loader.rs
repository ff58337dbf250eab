//! Configuration resolution
//!
//! Settings are merged with this priority (highest first):
//!
//! 1. Command-line flags
//! 2. Environment variables (`APIPROBE_BASE_URL` > `REACT_APP_BACKEND_URL`),
//!    optionally seeded from a `.env` file
//! 3. TOML config file (`--config` or `~/.apiprobe/config.toml`)
//! 4. Built-in defaults (base URL has none)
//!
//! Empty strings are treated as missing values at every level.

use std::env;
use std::path::Path;

use url::Url;

use super::defaults::{
    default_config_path, DEFAULT_API_PREFIX, DEFAULT_ENV_FILE, DEFAULT_ORIGIN, DEFAULT_TIMEOUT_MS,
};
use super::types::{ConfigError, ConfigOverrides, FileConfig, ProbeConfig};
use crate::cli::Cli;

/// Environment variables consulted for the base URL, in priority order
pub const BASE_URL_ENV_VARS: [&str; 2] = ["APIPROBE_BASE_URL", "REACT_APP_BACKEND_URL"];

/// Load a dotenv file into the process environment.
///
/// An explicitly named file must be readable. Without one, `frontend/.env`
/// is loaded if present and ignored otherwise. Existing variables are never
/// overwritten.
pub fn load_env_file(explicit: Option<&Path>) -> Result<(), ConfigError> {
    match explicit {
        Some(path) => dotenvy::from_path(path).map_err(|e| ConfigError::EnvFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        None => {
            let fallback = Path::new(DEFAULT_ENV_FILE);
            if fallback.is_file() {
                let _ = dotenvy::from_path(fallback);
            }
            Ok(())
        }
    }
}

impl FileConfig {
    /// Read the TOML config file.
    ///
    /// A path given on the command line must exist; the default location is
    /// only read when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.is_file() => path,
                _ => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        Self::parse(&content).map_err(|message| ConfigError::Parse { path, message })
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}

impl From<&Cli> for ConfigOverrides {
    fn from(cli: &Cli) -> Self {
        Self {
            base_url: cli.base_url.clone(),
            api_prefix: cli.api_prefix.clone(),
            timeout_ms: cli.timeout_ms,
            origin: cli.origin.clone(),
            suite: cli.suite,
        }
    }
}

impl ProbeConfig {
    /// Resolve configuration from the CLI, the process environment and files.
    ///
    /// Fails before any network activity when no base URL can be found.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        load_env_file(cli.env_file.as_deref())?;
        let file = FileConfig::load(cli.config.as_deref())?;
        Self::resolve(ConfigOverrides::from(cli), file, |key| env::var(key).ok())
    }

    /// Merge the given sources. `lookup` stands in for the process environment.
    pub fn resolve<F>(
        overrides: ConfigOverrides,
        file: FileConfig,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = BASE_URL_ENV_VARS
            .iter()
            .find_map(|key| non_empty(lookup(key)));

        let base_url = non_empty(overrides.base_url)
            .or(from_env)
            .or(non_empty(file.base_url))
            .ok_or_else(|| ConfigError::MissingBaseUrl(BASE_URL_ENV_VARS.join(" or ")))?;

        let api_prefix = overrides
            .api_prefix
            .or(file.api_prefix)
            .unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());

        let timeout_ms = overrides
            .timeout_ms
            .or(file.timeout_ms)
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        let origin = non_empty(overrides.origin)
            .or(non_empty(file.origin))
            .unwrap_or_else(|| DEFAULT_ORIGIN.to_string());

        Ok(Self {
            base_url: validate_base_url(&base_url)?,
            api_prefix: normalize_prefix(&api_prefix),
            timeout_ms,
            origin,
            suite: overrides.suite,
        })
    }

    /// Print the resolved configuration as TOML
    pub fn print(&self) -> Result<(), Box<dyn std::error::Error>> {
        let rendered = toml::to_string_pretty(self)?;
        print!("{}", rendered);
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the base URL and return it without trailing slashes
fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(raw.trim_end_matches('/').to_string())
}

/// "/api/" -> "/api", "api" -> "/api", "/" -> ""
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
