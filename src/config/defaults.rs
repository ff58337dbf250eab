// Fallback values used when neither the CLI, the environment nor the
// config file provide a setting.

pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;
pub const DEFAULT_ORIGIN: &str = "http://example.com";

/// Loaded silently when no --env-file is given
pub const DEFAULT_ENV_FILE: &str = "frontend/.env";

/// Default config file location: ~/.apiprobe/config.toml
pub fn default_config_path() -> Option<std::path::PathBuf> {
    dirs::home_dir().map(|home| home.join(".apiprobe").join("config.toml"))
}
