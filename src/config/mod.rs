pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::{load_env_file, BASE_URL_ENV_VARS};
pub use types::{ConfigError, ConfigOverrides, FileConfig, ProbeConfig, Suite};
