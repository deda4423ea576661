use crate::ports::{AppConfig, ConfigError, ConfigResult, ConfigStore};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    data_file: Option<PathBuf>,
    log_file: Option<PathBuf>,
    report_file: Option<PathBuf>,
}

pub struct FileConfigStore {
    config_path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> ConfigResult<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::ReadError("Cannot determine config directory".to_string())
        })?;

        Ok(Self::with_path(
            config_dir.join("task-tracker").join("config.json"),
        ))
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    fn ensure_config_dir(&self) -> ConfigResult<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
            }
        }
        Ok(())
    }
}

impl ConfigStore for FileConfigStore {
    fn load_config(&self) -> ConfigResult<AppConfig> {
        let content = match fs::read_to_string(&self.config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    "No config file at {}, using defaults",
                    self.config_path.display()
                );
                return Ok(AppConfig::default());
            }
            Err(e) => return Err(ConfigError::ReadError(e.to_string())),
        };

        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }

        let config_file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        let defaults = AppConfig::default();
        Ok(AppConfig {
            data_file: config_file.data_file.unwrap_or(defaults.data_file),
            log_file: config_file.log_file.unwrap_or(defaults.log_file),
            report_file: config_file.report_file.unwrap_or(defaults.report_file),
        })
    }

    fn save_config(&self, config: &AppConfig) -> ConfigResult<()> {
        self.ensure_config_dir()?;

        let config_file = ConfigFile {
            data_file: Some(config.data_file.clone()),
            log_file: Some(config.log_file.clone()),
            report_file: Some(config.report_file.clone()),
        };

        let content = serde_json::to_string_pretty(&config_file)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        fs::write(&self.config_path, content).map_err(|e| ConfigError::WriteError(e.to_string()))
    }
}
