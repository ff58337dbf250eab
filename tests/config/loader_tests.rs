use std::collections::HashMap;
use std::env;
use std::path::Path;

use apiprobe::cli::Cli;
use apiprobe::config::{
    load_env_file, ConfigError, ConfigOverrides, FileConfig, ProbeConfig, Suite,
};
use clap::Parser;
use serial_test::serial;

use crate::common::IsolatedEnv;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

fn overrides_with_url(url: &str) -> ConfigOverrides {
    ConfigOverrides {
        base_url: Some(url.to_string()),
        ..Default::default()
    }
}

#[test]
fn test_missing_base_url_is_config_error() {
    let err = ProbeConfig::resolve(ConfigOverrides::default(), FileConfig::default(), lookup(&[]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::MissingBaseUrl(_)));
    assert!(err.to_string().contains("REACT_APP_BACKEND_URL"));
}

#[test]
fn test_empty_values_count_as_missing() {
    let overrides = ConfigOverrides {
        base_url: Some("   ".to_string()),
        ..Default::default()
    };
    let file = FileConfig {
        base_url: Some(String::new()),
        ..Default::default()
    };
    let err = ProbeConfig::resolve(overrides, file, lookup(&[("APIPROBE_BASE_URL", "")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::MissingBaseUrl(_)));
}

#[test]
fn test_defaults_applied() {
    let config = ProbeConfig::resolve(
        ConfigOverrides::default(),
        FileConfig::default(),
        lookup(&[("REACT_APP_BACKEND_URL", "https://svc.example.com/")]),
    )
    .unwrap();

    assert_eq!(
        config,
        ProbeConfig {
            base_url: "https://svc.example.com".to_string(),
            api_prefix: "/api".to_string(),
            timeout_ms: 10_000,
            origin: "http://example.com".to_string(),
            suite: Suite::Core,
        }
    );
}

#[test]
fn test_base_url_priority_cli_env_file() {
    let file = FileConfig {
        base_url: Some("http://from-file:1".to_string()),
        ..Default::default()
    };
    let env = [
        ("APIPROBE_BASE_URL", "http://primary-env:2"),
        ("REACT_APP_BACKEND_URL", "http://secondary-env:3"),
    ];

    let cli = ProbeConfig::resolve(overrides_with_url("http://cli:4"), file.clone(), lookup(&env))
        .unwrap();
    assert_eq!(cli.base_url, "http://cli:4");

    let from_env =
        ProbeConfig::resolve(ConfigOverrides::default(), file.clone(), lookup(&env)).unwrap();
    assert_eq!(from_env.base_url, "http://primary-env:2");

    let secondary = ProbeConfig::resolve(
        ConfigOverrides::default(),
        file.clone(),
        lookup(&env[1..]),
    )
    .unwrap();
    assert_eq!(secondary.base_url, "http://secondary-env:3");

    let from_file = ProbeConfig::resolve(ConfigOverrides::default(), file, lookup(&[])).unwrap();
    assert_eq!(from_file.base_url, "http://from-file:1");
}

#[test]
fn test_file_settings_yield_to_cli() {
    let file = FileConfig {
        base_url: None,
        api_prefix: Some("v2/".to_string()),
        timeout_ms: Some(2500),
        origin: Some("https://file-origin.test".to_string()),
    };
    let overrides = ConfigOverrides {
        base_url: Some("http://localhost:8001".to_string()),
        timeout_ms: Some(500),
        suite: Suite::Extended,
        ..Default::default()
    };

    let config = ProbeConfig::resolve(overrides, file, lookup(&[])).unwrap();
    assert_eq!(config.api_prefix, "/v2");
    assert_eq!(config.timeout_ms, 500);
    assert_eq!(config.origin, "https://file-origin.test");
    assert_eq!(config.suite, Suite::Extended);
}

#[test]
fn test_root_mounted_api_prefix() {
    let overrides = ConfigOverrides {
        api_prefix: Some("/".to_string()),
        ..overrides_with_url("http://localhost:8001")
    };
    let config = ProbeConfig::resolve(overrides, FileConfig::default(), lookup(&[])).unwrap();
    assert_eq!(config.api_prefix, "");
}

#[test]
fn test_invalid_base_urls() {
    let resolve = |url: &str| {
        ProbeConfig::resolve(overrides_with_url(url), FileConfig::default(), lookup(&[]))
    };

    assert!(matches!(
        resolve("not a url"),
        Err(ConfigError::InvalidBaseUrl { .. })
    ));
    assert!(matches!(
        resolve("ftp://files.example.com"),
        Err(ConfigError::UnsupportedScheme(scheme)) if scheme == "ftp"
    ));
}

#[test]
fn test_zero_timeout_rejected() {
    let overrides = ConfigOverrides {
        timeout_ms: Some(0),
        ..overrides_with_url("http://localhost:8001")
    };
    assert!(matches!(
        ProbeConfig::resolve(overrides, FileConfig::default(), lookup(&[])),
        Err(ConfigError::InvalidTimeout)
    ));
}

#[test]
fn test_file_config_parse() {
    let file = FileConfig::parse(
        r#"
base_url = "https://svc.example.com"
timeout_ms = 3000
"#,
    )
    .unwrap();
    assert_eq!(file.base_url.as_deref(), Some("https://svc.example.com"));
    assert_eq!(file.timeout_ms, Some(3000));
    assert_eq!(file.origin, None);

    assert!(FileConfig::parse("base_uri = \"typo\"").is_err());
}

#[test]
fn test_file_config_load_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("apiprobe.toml");
    std::fs::write(&path, "origin = \"https://ui.example.com\"\n").unwrap();

    let file = FileConfig::load(Some(&path)).unwrap();
    assert_eq!(file.origin.as_deref(), Some("https://ui.example.com"));

    let missing = FileConfig::load(Some(Path::new("/nonexistent/apiprobe.toml")));
    assert!(matches!(missing, Err(ConfigError::Read { .. })));

    std::fs::write(&path, "timeout_ms = \"soon\"\n").unwrap();
    assert!(matches!(
        FileConfig::load(Some(&path)),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
#[serial]
fn test_default_config_file_read_from_home() {
    let isolated = IsolatedEnv::new();
    let dir = isolated.home().join(".apiprobe");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "timeout_ms = 1234\n").unwrap();

    let file = FileConfig::load(None).unwrap();
    assert_eq!(file.timeout_ms, Some(1234));
}

#[test]
#[serial]
fn test_missing_explicit_env_file_is_error() {
    let _isolated = IsolatedEnv::new();
    let result = load_env_file(Some(Path::new("/nonexistent/frontend/.env")));
    assert!(matches!(result, Err(ConfigError::EnvFile { .. })));
}

#[test]
#[serial]
fn test_load_from_cli_and_env_file() {
    let isolated = IsolatedEnv::new();
    let env_path = isolated.home().join(".env");
    std::fs::write(&env_path, "REACT_APP_BACKEND_URL=https://from-dotenv.example.com\n").unwrap();

    let cli = Cli::try_parse_from([
        "apiprobe",
        "--env-file",
        env_path.to_str().unwrap(),
        "--suite",
        "all",
        "--origin",
        "https://ui.example.com",
    ])
    .unwrap();

    let config = ProbeConfig::load(&cli).unwrap();
    assert_eq!(config.base_url, "https://from-dotenv.example.com");
    assert_eq!(config.suite, Suite::All);
    assert_eq!(config.origin, "https://ui.example.com");
    assert_eq!(
        env::var("REACT_APP_BACKEND_URL").as_deref(),
        Ok("https://from-dotenv.example.com")
    );
}

#[test]
#[serial]
fn test_load_fails_without_any_source() {
    let _isolated = IsolatedEnv::new();
    let cli = Cli::try_parse_from(["apiprobe"]).unwrap();
    assert!(matches!(
        ProbeConfig::load(&cli),
        Err(ConfigError::MissingBaseUrl(_))
    ));
}
