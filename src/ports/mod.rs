pub mod config_store;
pub mod event_log;
pub mod task_repository;

pub use config_store::*;
pub use event_log::*;
pub use task_repository::*;
