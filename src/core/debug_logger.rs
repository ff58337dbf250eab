//! Opt-in structured debug log
//!
//! Writes one JSON object per line to `~/.apiprobe/apiprobe-debug.log` when
//! `APIPROBE_DEBUG` is enabled. The file is rotated by size into gzip
//! archives. Logging never fails the caller: every I/O error is swallowed.

use std::collections::HashMap;
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use chrono::Local;
use flate2::{write::GzEncoder, Compression};
use fs2::FileExt;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

const DEBUG_ENV_VAR: &str = "APIPROBE_DEBUG";
const LOG_ROTATION_SIZE_MB: u64 = 8;
const MAX_ARCHIVES: usize = 5;
const ROTATION_CHECK_INTERVAL: u32 = 200;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogEntry {
    /// RFC 3339, local timezone
    pub timestamp: String,
    /// DEBUG, ERROR, CHECK or HTTP
    pub level: String,
    pub component: String,
    pub event: String,
    /// Redacted before writing
    pub message: String,
    pub correlation_id: Option<String>,
    pub fields: HashMap<String, Value>,
}

struct RotatingFile {
    path: PathBuf,
    rotation_bytes: u64,
    write_count: AtomicU32,
}

impl RotatingFile {
    fn new(path: PathBuf, rotation_bytes: u64) -> Self {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        Self {
            path,
            rotation_bytes,
            write_count: AtomicU32::new(0),
        }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        if self.write_count.fetch_add(1, Ordering::Relaxed) % ROTATION_CHECK_INTERVAL == 0 {
            let _ = self.rotate_if_needed();
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }

    fn needs_rotation(&self) -> bool {
        std::fs::metadata(&self.path)
            .map(|meta| meta.len() >= self.rotation_bytes)
            .unwrap_or(false)
    }

    fn rotate_if_needed(&self) -> std::io::Result<()> {
        if !self.needs_rotation() {
            return Ok(());
        }

        // Another process holding the lock is already rotating
        let lock_path = self.path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        if lock_file.try_lock_exclusive().is_err() {
            return Ok(());
        }

        let result = if self.needs_rotation() {
            self.rotate()
        } else {
            Ok(())
        };
        let _ = FileExt::unlock(&lock_file);
        let _ = std::fs::remove_file(&lock_path);
        result
    }

    fn rotate(&self) -> std::io::Result<()> {
        let (dir, stem) = match (self.path.parent(), file_stem(&self.path)) {
            (Some(dir), Some(stem)) => (dir, stem),
            _ => return Ok(()),
        };

        let archive = dir.join(format!(
            "{}.{}.gz",
            stem,
            Local::now().format("%Y%m%d_%H%M%S%.3f")
        ));
        let staging = self.path.with_extension("rotating");
        std::fs::rename(&self.path, &staging)?;

        let mut encoder = GzEncoder::new(File::create(&archive)?, Compression::default());
        std::io::copy(&mut BufReader::new(File::open(&staging)?), &mut encoder)?;
        encoder.finish()?;
        std::fs::remove_file(&staging)?;

        let _ = prune_archives(dir, &stem);
        Ok(())
    }
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

/// Keep only the newest MAX_ARCHIVES archives
fn prune_archives(dir: &Path, stem: &str) -> std::io::Result<()> {
    let prefix = format!("{}.", stem);
    let mut archives = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(&prefix) && name.ends_with(".gz") {
            archives.push((entry.path(), entry.metadata()?.modified()?));
        }
    }

    archives.sort_by_key(|(_, modified)| *modified);
    let excess = archives.len().saturating_sub(MAX_ARCHIVES);
    for (path, _) in archives.into_iter().take(excess) {
        let _ = std::fs::remove_file(path);
    }
    Ok(())
}

pub struct DebugLogger {
    sink: Option<Mutex<RotatingFile>>,
    session_id: String,
    redaction_patterns: Vec<Regex>,
}

impl DebugLogger {
    /// Logger configured from `APIPROBE_DEBUG`
    pub fn new() -> Self {
        if Self::parse_debug_enabled(env::var(DEBUG_ENV_VAR).ok().as_deref()) {
            Self::to_file(Self::default_log_path())
        } else {
            Self::disabled()
        }
    }

    /// Logger that drops every entry
    pub fn disabled() -> Self {
        Self {
            sink: None,
            session_id: Self::new_session_id(),
            redaction_patterns: Self::compile_redaction_patterns(),
        }
    }

    /// Logger writing to an explicit path
    pub fn to_file(path: PathBuf) -> Self {
        Self::with_rotation(path, LOG_ROTATION_SIZE_MB * 1024 * 1024)
    }

    pub fn with_rotation(path: PathBuf, rotation_bytes: u64) -> Self {
        Self {
            sink: Some(Mutex::new(RotatingFile::new(path, rotation_bytes))),
            session_id: Self::new_session_id(),
            redaction_patterns: Self::compile_redaction_patterns(),
        }
    }

    /// Supports: true/false, 1/0, yes/no, on/off (case insensitive)
    pub fn parse_debug_enabled(value: Option<&str>) -> bool {
        value
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
            .unwrap_or(false)
    }

    fn default_log_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".apiprobe");
        path.push("apiprobe-debug.log");
        path
    }

    fn new_session_id() -> String {
        Uuid::new_v4().simple().to_string()[..8].to_string()
    }

    fn compile_redaction_patterns() -> Vec<Regex> {
        [
            r"(?i)authorization[:=\s]+(bearer\s+)?[^\s,]+",
            r"(?i)bearer[:\s]+[^\s,]+",
            r"(?i)token[:=\s]+[^\s,]+",
            r"(?i)password[:=\s]+[^\s,]+",
            r"(?i)api[_-]?key[:=\s]+[^\s,]+",
            r"(?i)secret[:=\s]+[^\s,]+",
        ]
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
    }

    pub fn redact(&self, text: &str) -> String {
        self.redaction_patterns
            .iter()
            .fold(text.to_string(), |acc, regex| {
                regex.replace_all(&acc, "[REDACTED]").into_owned()
            })
    }

    fn log(
        &self,
        level: &str,
        component: &str,
        event: &str,
        message: &str,
        correlation_id: Option<&str>,
        fields: HashMap<String, Value>,
    ) {
        let Some(sink) = &self.sink else {
            return;
        };

        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            level: level.to_string(),
            component: component.to_string(),
            event: event.to_string(),
            message: self.redact(message),
            correlation_id: Some(correlation_id.unwrap_or(&self.session_id).to_string()),
            fields,
        };

        if let (Ok(file), Ok(line)) = (sink.lock(), serde_json::to_string(&entry)) {
            let _ = file.append(&line);
        }
    }

    pub fn debug(&self, component: &str, event: &str, message: &str) {
        self.log("DEBUG", component, event, message, None, HashMap::new());
    }

    pub fn error(&self, component: &str, event: &str, message: &str) {
        self.log("ERROR", component, event, message, None, HashMap::new());
    }

    // Typed events for the harness lifecycle

    pub fn run_start(&self, suite: &str, base_url: &str, check_count: usize) {
        let fields = HashMap::from([
            ("suite".to_string(), Value::from(suite)),
            ("base_url".to_string(), Value::from(self.redact(base_url))),
            ("check_count".to_string(), Value::from(check_count)),
        ]);
        self.log(
            "CHECK",
            "Runner",
            "run_start",
            &format!("Starting {} suite with {} checks", suite, check_count),
            None,
            fields,
        );
    }

    pub fn check_start(&self, name: &str, correlation_id: &str) {
        let fields = HashMap::from([("check".to_string(), Value::from(name))]);
        self.log(
            "CHECK",
            "Runner",
            "check_start",
            &format!("Running check: {}", name),
            Some(correlation_id),
            fields,
        );
    }

    pub fn request_complete(
        &self,
        method: &str,
        url: &str,
        status: u16,
        duration_ms: u64,
        correlation_id: &str,
    ) {
        let fields = HashMap::from([
            ("method".to_string(), Value::from(method)),
            ("url".to_string(), Value::from(url)),
            ("http_status".to_string(), Value::from(status)),
            ("duration_ms".to_string(), Value::from(duration_ms)),
        ]);
        self.log(
            "HTTP",
            "ProbeContext",
            "request_complete",
            &format!("{} {} -> {} ({}ms)", method, url, status, duration_ms),
            Some(correlation_id),
            fields,
        );
    }

    pub fn request_failed(&self, method: &str, url: &str, error: &str, correlation_id: &str) {
        let fields = HashMap::from([
            ("method".to_string(), Value::from(method)),
            ("url".to_string(), Value::from(url)),
        ]);
        self.log(
            "ERROR",
            "ProbeContext",
            "request_failed",
            &format!("{} {} failed: {}", method, url, error),
            Some(correlation_id),
            fields,
        );
    }

    pub fn check_end(
        &self,
        name: &str,
        passed: bool,
        duration_ms: u64,
        detail: Option<&str>,
        correlation_id: &str,
    ) {
        let mut fields = HashMap::from([
            ("check".to_string(), Value::from(name)),
            ("passed".to_string(), Value::from(passed)),
            ("duration_ms".to_string(), Value::from(duration_ms)),
        ]);
        if let Some(detail) = detail {
            fields.insert("detail".to_string(), Value::from(self.redact(detail)));
        }
        let verdict = if passed { "PASSED" } else { "FAILED" };
        self.log(
            "CHECK",
            "Runner",
            "check_end",
            &format!("Check {}: {} ({}ms)", name, verdict, duration_ms),
            Some(correlation_id),
            fields,
        );
    }

    pub fn run_end(&self, passed: usize, total: usize, duration_ms: u64) {
        let fields = HashMap::from([
            ("passed".to_string(), Value::from(passed)),
            ("total".to_string(), Value::from(total)),
            ("duration_ms".to_string(), Value::from(duration_ms)),
        ]);
        self.log(
            "CHECK",
            "Runner",
            "run_end",
            &format!("Passed: {}/{} checks", passed, total),
            None,
            fields,
        );
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl Default for DebugLogger {
    fn default() -> Self {
        Self::new()
    }
}

pub fn get_debug_logger() -> DebugLogger {
    DebugLogger::default()
}
