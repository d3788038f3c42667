//! Session journal for the GUI.
//!
//! Every entry is shown in the log view, forwarded to `tracing` and appended
//! as one JSON line to a per-session file, so past measurements can be read
//! back with their full report.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::config::summary_lines;
use crate::measure::SessionReport;
use crate::settings::AppSettings;

const MAX_ENTRIES: usize = 500;

/// Log level enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
    Measurement,
}

impl LogLevel {
    pub fn emoji(&self) -> &'static str {
        match self {
            LogLevel::Info => "ℹ️",
            LogLevel::Success => "✅",
            LogLevel::Warning => "⚠️",
            LogLevel::Error => "❌",
            LogLevel::Measurement => "📏",
        }
    }
}

/// One journal line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
    /// Full report for [`LogLevel::Measurement`] entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<SessionReport>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: message.into(),
            report: None,
        }
    }

    /// Entry for a finished measurement. The message is the report headline.
    pub fn measurement(report: SessionReport, lang: &str) -> Self {
        let headline = summary_lines(&report, lang)
            .into_iter()
            .skip(4)
            .collect::<Vec<_>>()
            .join(" | ");
        Self {
            report: Some(report),
            ..Self::new(LogLevel::Measurement, headline)
        }
    }

    /// `[12:03:44] 📏 message`
    pub fn display_line(&self) -> String {
        format!(
            "[{}] {} {}",
            self.timestamp.format("%H:%M:%S"),
            self.level.emoji(),
            self.message
        )
    }
}

/// In-memory journal with an optional JSON-lines file behind it.
#[derive(Debug, Clone)]
pub struct Logger {
    entries: VecDeque<LogEntry>,
    log_file: Option<PathBuf>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Journal backed by a new file in the logs directory.
    pub fn new() -> Self {
        let log_file = AppSettings::logs_dir().and_then(|dir| Self::create_log_file(&dir));
        if log_file.is_none() {
            tracing::warn!("No log file for this session, journal kept in memory only");
        }
        Self::with_file(log_file)
    }

    /// Journal writing to `log_file`, or memory only when `None`.
    pub fn with_file(log_file: Option<PathBuf>) -> Self {
        Self {
            entries: VecDeque::new(),
            log_file,
        }
    }

    fn create_log_file(logs_dir: &Path) -> Option<PathBuf> {
        fs::create_dir_all(logs_dir).ok()?;
        let name = format!("session_{}.jsonl", Local::now().format("%Y%m%d_%H%M%S"));
        let path = logs_dir.join(name);
        File::create(&path).ok()?;
        Some(path)
    }

    /// Record an entry.
    pub fn push(&mut self, entry: LogEntry) {
        match entry.level {
            LogLevel::Error => tracing::error!("{}", entry.message),
            LogLevel::Warning => tracing::warn!("{}", entry.message),
            _ => tracing::info!("{}", entry.message),
        }

        if let Some(path) = &self.log_file {
            if let Err(e) = append_json_line(path, &entry) {
                tracing::debug!("Journal write to {} failed: {}", path.display(), e);
            }
        }

        if self.entries.len() == MAX_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.push(LogEntry::new(level, message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn measurement(&mut self, report: &SessionReport, lang: &str) {
        self.push(LogEntry::measurement(report.clone(), lang));
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reports logged in this session, oldest first.
    pub fn reports(&self) -> impl Iterator<Item = &SessionReport> {
        self.entries.iter().filter_map(|e| e.report.as_ref())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn log_file_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// All entries as display lines.
    pub fn format_all(&self) -> String {
        self.entries
            .iter()
            .map(LogEntry::display_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Read a journal file back. Lines that do not parse are skipped.
    pub fn read_log_file(path: &Path) -> Result<Vec<LogEntry>, String> {
        let file = File::open(path).map_err(|e| format!("Failed to open log file: {}", e))?;
        Ok(BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str(&line).ok())
            .collect())
    }
}

fn append_json_line(path: &Path, entry: &LogEntry) -> std::io::Result<()> {
    let line = serde_json::to_string(entry)?;
    let mut file = OpenOptions::new().append(true).open(path)?;
    writeln!(file, "{}", line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeciesTable;
    use crate::measure::{run_session, Point, SessionConfig};
    use std::env;

    fn report() -> SessionReport {
        run_session(
            SessionConfig::default()
                .with_perspective_factor(1.15)
                .with_species("Bar"),
            &SpeciesTable::default(),
            &[Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
            &[Point::new(0.0, 10.0), Point::new(250.0, 10.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_memory_logger() {
        let mut logger = Logger::with_file(None);
        logger.info("start");
        logger.error("boom");

        assert_eq!(logger.len(), 2);
        assert_eq!(logger.entries().last().unwrap().level, LogLevel::Error);
        assert!(logger.format_all().contains("boom"));

        logger.clear();
        assert!(logger.is_empty());
    }

    #[test]
    fn test_logger_drops_oldest() {
        let mut logger = Logger::with_file(None);
        for i in 0..MAX_ENTRIES + 10 {
            logger.info(format!("entry {i}"));
        }
        assert_eq!(logger.len(), MAX_ENTRIES);
        assert_eq!(logger.entries().next().unwrap().message, "entry 10");
    }

    #[test]
    fn test_measurement_entry() {
        let entry = LogEntry::measurement(report(), "en");
        assert_eq!(entry.level, LogLevel::Measurement);
        assert!(entry.message.contains("34.5 cm"));
        assert!(entry.message.ends_with("UNDERSIZED"));
    }

    #[test]
    fn test_journal_file_round_trip() {
        let dir = env::temp_dir().join("fish_gauge_test_journal");
        let path = Logger::create_log_file(&dir).unwrap();
        let mut logger = Logger::with_file(Some(path.clone()));

        logger.info("started");
        logger.measurement(&report(), "fr");
        assert_eq!(logger.reports().count(), 1);

        let entries = Logger::read_log_file(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, LogLevel::Info);
        assert_eq!(entries[1].report.as_ref(), Some(&report()));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_journal_keeps_exact_scale() {
        let dir = env::temp_dir().join("fish_gauge_test_journal_scale");
        let path = Logger::create_log_file(&dir).unwrap();
        let mut logger = Logger::with_file(Some(path.clone()));

        let report = run_session(
            SessionConfig::default().with_reference_length(7.3),
            &SpeciesTable::empty(),
            &[Point::new(0.0, 0.0), Point::new(33.3, 17.1)],
            &[Point::new(5.0, 5.0), Point::new(187.4, 96.2)],
        )
        .unwrap();
        logger.measurement(&report, "en");

        let entries = Logger::read_log_file(&path).unwrap();
        assert_eq!(entries[0].report.as_ref(), Some(&report));

        let _ = fs::remove_file(&path);
    }
}
