pub mod error;
pub mod report;
pub mod sorting;
pub mod task_store;

pub use error::*;
pub use report::*;
pub use task_store::*;
