use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    ReadError(String),

    #[error("Failed to write configuration: {0}")]
    WriteError(String),

    #[error("Invalid configuration format: {0}")]
    InvalidFormat(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

pub const DEFAULT_DATA_FILE: &str = "tasks.json";
pub const DEFAULT_LOG_FILE: &str = "log.txt";
pub const DEFAULT_REPORT_FILE: &str = "report.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub log_file: PathBuf,
    pub report_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            report_file: PathBuf::from(DEFAULT_REPORT_FILE),
        }
    }
}

pub trait ConfigStore {
    fn load_config(&self) -> ConfigResult<AppConfig>;
    fn save_config(&self, config: &AppConfig) -> ConfigResult<()>;
}
