use crate::domain::Task;
use crate::ports::{RepositoryError, RepositoryResult, TaskRepository};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Stores the whole task collection as a pretty-printed JSON array.
pub struct JsonFileTaskRepository {
    path: PathBuf,
}

impl JsonFileTaskRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Sibling of the data file so the rename stays on one filesystem.
    fn temp_path(&self) -> RepositoryResult<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| RepositoryError::Io(format!("{} has no file name", self.path.display())))?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

impl TaskRepository for JsonFileTaskRepository {
    fn load(&self) -> RepositoryResult<Vec<Task>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepositoryError::Io(e.to_string())),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| RepositoryError::Serialization(e.to_string()))
    }

    fn save(&self, tasks: &[Task]) -> RepositoryResult<()> {
        let json = serde_json::to_string_pretty(tasks)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| RepositoryError::Io(e.to_string()))?;
            }
        }

        let tmp_path = self.temp_path()?;
        let write_tmp = || -> std::io::Result<()> {
            let mut tmp_file = File::create(&tmp_path)?;
            tmp_file.write_all(json.as_bytes())?;
            tmp_file.sync_all()
        };
        write_tmp().map_err(|e| RepositoryError::Io(e.to_string()))?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            RepositoryError::Io(e.to_string())
        })
    }
}
