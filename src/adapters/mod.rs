pub mod config;
pub mod logging;
pub mod persistence;

pub use config::FileConfigStore;
pub use logging::FileEventLog;
pub use persistence::JsonFileTaskRepository;
