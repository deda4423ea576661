mod file_log;

pub use file_log::FileEventLog;
