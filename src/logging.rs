//! Structured logging for MindScope
//!
//! Writes timestamped category lines to the console and to a per-day log
//! file under ~/Library/Logs/MindScope/. Categories:
//! - ANALYSIS: journal text analysis (generative or heuristic)
//! - CHAT: companion exchanges
//! - VOICE: voice check-ins and sample retention
//! - STORAGE: collection writes, export, reset
//! - ERROR: failures of any kind

use chrono::{Local, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy)]
pub enum LogCategory {
    Analysis,
    Chat,
    Voice,
    Storage,
    Error,
}

impl LogCategory {
    fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Analysis => "ANALYSIS",
            LogCategory::Chat => "CHAT",
            LogCategory::Voice => "VOICE",
            LogCategory::Storage => "STORAGE",
            LogCategory::Error => "ERROR",
        }
    }
}

fn get_log_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join("Library/Logs/MindScope")
}

fn get_log_file_path() -> PathBuf {
    let today = Local::now().format("%Y-%m-%d").to_string();
    get_log_dir().join(format!("mindscope-{}.log", today))
}

/// Create the log directory and record startup.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = get_log_dir();
    if !log_dir.exists() {
        fs::create_dir_all(&log_dir)?;
    }
    log(LogCategory::Storage, "MindScope logging initialized");
    Ok(())
}

/// Log a message with a category. Console always; file on a best-effort
/// basis.
pub fn log(category: LogCategory, message: &str) {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let log_line = format!("[{}] [{}] {}\n", timestamp, category.as_str(), message);

    print!("{}", log_line);

    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(get_log_file_path())
    {
        let _ = file.write_all(log_line.as_bytes());
    }
}

pub fn log_analysis(message: &str) {
    log(LogCategory::Analysis, message);
}

pub fn log_chat(message: &str) {
    log(LogCategory::Chat, message);
}

pub fn log_voice(message: &str) {
    log(LogCategory::Voice, message);
}

pub fn log_storage(message: &str) {
    log(LogCategory::Storage, message);
}

pub fn log_error(message: &str) {
    log(LogCategory::Error, message);
}

/// Delete log files older than 7 days. Returns how many were removed.
pub fn cleanup_old_logs() -> Result<usize, Box<dyn std::error::Error>> {
    let log_dir = get_log_dir();
    if !log_dir.exists() {
        return Ok(0);
    }

    let cutoff = Utc::now() - chrono::Duration::days(7);
    let mut deleted = 0;

    for entry in fs::read_dir(&log_dir)? {
        let entry = entry?;
        if let Ok(metadata) = entry.metadata() {
            if let Ok(modified) = metadata.modified() {
                let modified_time: chrono::DateTime<Utc> = modified.into();
                if modified_time < cutoff && fs::remove_file(entry.path()).is_ok() {
                    deleted += 1;
                }
            }
        }
    }

    Ok(deleted)
}
