//! JSONL activity log: append-only line-delimited JSON, one object per board
//! event.
//!
//! Each line is assembled in memory and written with a single `write_all`, so
//! a concurrent `tail -f` never sees a partial line.
//!
//! Degradation chain:
//! 1. Configured file path
//! 2. stderr with `[JPB-JSONL]` prefix
//! 3. Silent discard (a logging failure never fails the caller)

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions, rename};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{JpbError, Result};

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// Activity event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SessionStart,
    ConfigLoaded,
    DataLoaded,
    FetchFailure,
    DepartmentChange,
    SortChange,
    ShowMore,
}

/// A single JSONL log entry; all fields optional except `ts`, `event`,
/// `severity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 UTC timestamp.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    /// Active department filter (empty = all).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Active sort field name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reveal_count: Option<usize>,
    /// Records in the set the event refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Freeform details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            department: None,
            sort_field: None,
            sort_direction: None,
            reveal_count: None,
            record_count: None,
            error_code: None,
            error_message: None,
            details: None,
        }
    }
}

/// Degradation state of the JSONL writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    /// Writing to the configured path.
    Normal,
    /// File unavailable, writing to stderr.
    Stderr,
    /// Everything failed (or logging disabled), silently discarding.
    Discard,
}

/// Configuration for the JSONL writer.
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    /// Log file path.
    pub path: PathBuf,
    /// Maximum file size before rotation (bytes). Default: 10 MiB.
    pub max_size_bytes: u64,
    /// Number of rotated files to keep. Default: 3.
    pub max_rotated_files: u32,
}

impl JsonlConfig {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_size_bytes: 10 * 1024 * 1024,
            max_rotated_files: 3,
        }
    }
}

/// Append-only JSONL log writer with rotation and stderr fallback.
pub struct JsonlWriter {
    config: Option<JsonlConfig>,
    writer: Option<BufWriter<File>>,
    state: WriterState,
    bytes_written: u64,
}

impl JsonlWriter {
    /// Open the log file. Falls through the degradation chain on failure.
    pub fn open(config: JsonlConfig) -> Self {
        let mut w = Self {
            config: Some(config),
            writer: None,
            state: WriterState::Discard,
            bytes_written: 0,
        };
        w.try_open_primary();
        w
    }

    /// A writer that drops every entry.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            config: None,
            writer: None,
            state: WriterState::Discard,
            bytes_written: 0,
        }
    }

    /// Write a single log entry as one JSONL line.
    pub fn write_entry(&mut self, entry: &LogEntry) {
        if self.state == WriterState::Discard {
            return;
        }
        let line = match serde_json::to_string(entry) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                let _ = writeln!(io::stderr(), "[JPB-JSONL] serialize error: {e}");
                return;
            }
        };

        self.write_line(&line);
    }

    /// Flush buffers.
    pub fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
    }

    /// Current degradation state.
    pub fn state(&self) -> &str {
        match self.state {
            WriterState::Normal => "normal",
            WriterState::Stderr => "stderr",
            WriterState::Discard => "discard",
        }
    }

    /// Number of bytes written to the current file.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    // ──────────────────────── internals ────────────────────────

    fn write_line(&mut self, line: &str) {
        let limit = self.config.as_ref().map_or(u64::MAX, |c| c.max_size_bytes);
        if self.state == WriterState::Normal && self.bytes_written + line.len() as u64 > limit {
            self.rotate();
        }

        match self.state {
            WriterState::Normal => {
                if let Some(w) = self.writer.as_mut() {
                    if w.write_all(line.as_bytes()).is_err() {
                        self.degrade();
                        self.write_line(line);
                        return;
                    }
                    self.bytes_written += line.len() as u64;
                } else {
                    self.degrade();
                    self.write_line(line);
                }
            }
            WriterState::Stderr => {
                if write!(io::stderr(), "[JPB-JSONL] {line}").is_err() {
                    self.degrade();
                }
            }
            WriterState::Discard => {}
        }
    }

    fn try_open_primary(&mut self) {
        let Some(config) = self.config.as_ref() else {
            return;
        };
        match open_append(&config.path) {
            Ok((file, size)) => {
                self.writer = Some(BufWriter::new(file));
                self.state = WriterState::Normal;
                self.bytes_written = size;
            }
            Err(e) => {
                self.state = WriterState::Stderr;
                let _ = writeln!(io::stderr(), "[JPB-JSONL] {e}; logging to stderr");
            }
        }
    }

    fn degrade(&mut self) {
        self.writer = None;
        self.state = match self.state {
            WriterState::Normal => {
                let _ = writeln!(io::stderr(), "[JPB-JSONL] log write failed, using stderr");
                WriterState::Stderr
            }
            WriterState::Stderr | WriterState::Discard => WriterState::Discard,
        };
    }

    fn rotate(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
        self.writer = None;

        let Some(config) = self.config.as_ref() else {
            return;
        };
        let base = &config.path;

        // Shift existing rotations: .2→.3, .1→.2, current→.1; oldest dropped.
        let _ = fs::remove_file(rotated_name(base, config.max_rotated_files));
        for i in (1..config.max_rotated_files).rev() {
            let _ = rename(rotated_name(base, i), rotated_name(base, i + 1));
        }
        let _ = rename(base, rotated_name(base, 1));

        match open_append(base) {
            Ok((file, _)) => {
                self.writer = Some(BufWriter::new(file));
                self.bytes_written = 0;
            }
            Err(_) => self.degrade(),
        }
    }
}

impl Drop for JsonlWriter {
    fn drop(&mut self) {
        self.flush();
    }
}

// ──────────────────────── helpers ────────────────────────

/// Open or create a file for appending. Returns `(File, current_size)`.
fn open_append(path: &Path) -> Result<(File, u64)> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| JpbError::io(parent, source))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| JpbError::io(path, source))?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    Ok((file, size))
}

/// Build a rotated filename: `foo.jsonl` → `foo.jsonl.3`.
fn rotated_name(base: &Path, index: u32) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// ──────────────────────── tests ────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn write_entry_produces_valid_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.jsonl");
        let mut writer = JsonlWriter::open(JsonlConfig::new(&path));

        let mut entry = LogEntry::new(EventType::DepartmentChange, Severity::Info);
        entry.department = Some("Finance".into());
        entry.reveal_count = Some(5);
        writer.write_entry(&entry);
        writer.flush();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["event"], "department_change");
        assert_eq!(lines[0]["severity"], "info");
        assert_eq!(lines[0]["department"], "Finance");
        assert_eq!(lines[0]["reveal_count"], 5);
    }

    #[test]
    fn multiple_entries_are_separate_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("multi.jsonl");
        let mut writer = JsonlWriter::open(JsonlConfig::new(&path));
        for _ in 0..5 {
            writer.write_entry(&LogEntry::new(EventType::ShowMore, Severity::Info));
        }
        writer.flush();
        assert_eq!(read_lines(&path).len(), 5);
    }

    #[test]
    fn optional_fields_omitted_when_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sparse.jsonl");
        let mut writer = JsonlWriter::open(JsonlConfig::new(&path));
        writer.write_entry(&LogEntry::new(EventType::SessionStart, Severity::Info));
        writer.flush();

        let line = fs::read_to_string(&path).unwrap();
        assert!(!line.contains("\"department\""));
        assert!(!line.contains("\"error_code\""));
    }

    #[test]
    fn rotation_shifts_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rot.jsonl");
        let config = JsonlConfig {
            path: path.clone(),
            max_size_bytes: 100,
            max_rotated_files: 2,
        };
        let mut writer = JsonlWriter::open(config);
        for _ in 0..10 {
            writer.write_entry(&LogEntry::new(EventType::SortChange, Severity::Info));
        }
        writer.flush();

        assert!(path.exists());
        assert!(rotated_name(&path, 1).exists());
        assert!(!rotated_name(&path, 3).exists());
    }

    #[test]
    fn unwritable_path_falls_back_to_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();
        let mut writer = JsonlWriter::open(JsonlConfig::new(blocker.join("activity.jsonl")));
        assert_eq!(writer.state(), "stderr");
        writer.write_entry(&LogEntry::new(EventType::FetchFailure, Severity::Warning));
    }

    #[test]
    fn disabled_writer_discards() {
        let mut writer = JsonlWriter::disabled();
        assert_eq!(writer.state(), "discard");
        writer.write_entry(&LogEntry::new(EventType::DataLoaded, Severity::Info));
        assert_eq!(writer.bytes_written(), 0);
    }

    #[test]
    fn appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("append.jsonl");
        {
            let mut writer = JsonlWriter::open(JsonlConfig::new(&path));
            writer.write_entry(&LogEntry::new(EventType::SessionStart, Severity::Info));
        }
        let mut writer = JsonlWriter::open(JsonlConfig::new(&path));
        assert!(writer.bytes_written() > 0);
        writer.write_entry(&LogEntry::new(EventType::DataLoaded, Severity::Info));
        writer.flush();
        assert_eq!(read_lines(&path).len(), 2);
    }
}
