//! Input schema
//!
//! Validation of raw form submissions and parsing of log histories handed
//! over by the persistence layer.

mod adapter;
mod forms;

pub use adapter::*;
pub use forms::*;
