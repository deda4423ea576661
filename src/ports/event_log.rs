use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventLogError {
    #[error("Failed to write event log: {0}")]
    Io(String),
}

pub type EventLogResult<T> = Result<T, EventLogError>;

/// Append-only audit trail of state-changing operations.
#[cfg_attr(test, mockall::automock)]
pub trait EventLog {
    fn log(&self, message: &str) -> EventLogResult<()>;
}
