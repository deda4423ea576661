use crate::domain::Task;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Whole-collection persistence for tasks.
///
/// `save` always receives the full current collection and replaces whatever
/// was stored before. `load` on a store that was never written yields an
/// empty collection rather than an error.
#[cfg_attr(test, mockall::automock)]
pub trait TaskRepository {
    fn load(&self) -> RepositoryResult<Vec<Task>>;
    fn save(&self, tasks: &[Task]) -> RepositoryResult<()>;
}
