use crate::ports::{EventLog, EventLogError, EventLogResult};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends `"{timestamp}: {message}"` lines to a plain text file.
///
/// The file is opened for every entry, so no handle outlives a call.
pub struct FileEventLog {
    path: PathBuf,
}

impl FileEventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventLog for FileEventLog {
    fn log(&self, message: &str) -> EventLogResult<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| EventLogError::Io(e.to_string()))?;

        writeln!(file, "{timestamp}: {message}").map_err(|e| EventLogError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_appends_one_line_per_call() {
        let dir = tempdir().unwrap();
        let log = FileEventLog::new(dir.path().join("log.txt"));

        log.log("Task created: 1 - First").unwrap();
        log.log("Task deleted: 1").unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(": Task created: 1 - First"));
        assert!(lines[1].ends_with(": Task deleted: 1"));
    }

    #[test]
    fn test_line_starts_with_timestamp() {
        let dir = tempdir().unwrap();
        let log = FileEventLog::new(dir.path().join("log.txt"));
        log.log("Report exported.").unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        let (timestamp, message) = content.trim_end().split_once(": ").unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").is_ok());
        assert_eq!(message, "Report exported.");
    }

    #[test]
    fn test_unwritable_path_is_reported() {
        let dir = tempdir().unwrap();
        let log = FileEventLog::new(dir.path().join("missing").join("log.txt"));
        assert!(matches!(log.log("x"), Err(EventLogError::Io(_))));
    }
}
