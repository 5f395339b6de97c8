use chrono::Local;
use log::Level;
use std::fs::OpenOptions;
use std::io::Write;
#[cfg(test)]
use std::path::Path;
use std::path::PathBuf;

/// Append-only record of broadcast transactions and failures, one file per
/// action family. Lines look like `2025-03-01 14:02:11,503 - INFO - ...`.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ActivityLog { path: path.into() }
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&self, message: &str) {
        self.append(Level::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.append(Level::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.append(Level::Error, message);
    }

    fn append(&self, level: Level, message: &str) {
        let line = format_line(&Local::now().format("%Y-%m-%d %H:%M:%S,%3f").to_string(), level, message);
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(e) = result {
            log::warn!("could not write to {}: {}", self.path.display(), e);
        }
    }
}

fn format_line(timestamp: &str, level: Level, message: &str) -> String {
    let level = match level {
        Level::Warn => "WARNING",
        other => other.as_str(),
    };
    format!("{} - {} - {}\n", timestamp, level, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn line_layout() {
        assert_eq!(
            format_line("2025-03-01 14:02:11,503", Level::Info, "Consolidation completed, TXID: ab"),
            "2025-03-01 14:02:11,503 - INFO - Consolidation completed, TXID: ab\n"
        );
        assert_eq!(format_line("t", Level::Warn, "m"), "t - WARNING - m\n");
    }

    #[test]
    fn appends_without_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path().join("split.log"));
        log.info("first");
        log.error("second");

        let content = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - INFO - first"));
        assert!(lines[1].ends_with(" - ERROR - second"));
        // "YYYY-MM-DD HH:MM:SS,mmm"
        assert_eq!(lines[0].find(" - "), Some(23));
    }

    #[test]
    fn unwritable_path_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path().join("missing").join("consolidation.log"));
        log.info("dropped");
        assert!(!log.path().exists());
    }
}
