use crate::config::Suite;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "apiprobe")]
#[command(version = concat!("Ver:", env!("CARGO_PKG_VERSION")))]
#[command(about = "Verify a status-check HTTP service against its REST and CORS contract")]
pub struct Cli {
    /// Base URL of the service under test (overrides environment and config file)
    #[arg(short = 'b', long = "base-url")]
    pub base_url: Option<String>,

    /// Path prefix under which the API is mounted
    #[arg(long = "api-prefix")]
    pub api_prefix: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(short = 't', long = "timeout-ms")]
    pub timeout_ms: Option<u32>,

    /// Origin header sent by the CORS check
    #[arg(long = "origin")]
    pub origin: Option<String>,

    /// Check suite to run
    #[arg(short = 's', long = "suite", value_enum, default_value_t = Suite::Core)]
    pub suite: Suite,

    /// Load KEY=VALUE pairs from this file before reading the environment
    #[arg(long = "env-file")]
    pub env_file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Print the resolved configuration and exit
    #[arg(long = "print-config")]
    pub print_config: bool,

    /// Also print the run summary as JSON
    #[arg(long = "json")]
    pub json: bool,

    /// Only print check verdicts and the summary
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
