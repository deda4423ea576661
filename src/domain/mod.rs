pub mod error;
pub mod task;

pub use error::*;
pub use task::*;
