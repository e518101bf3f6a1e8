//! Utility modules

pub mod memory_tracker;
pub mod validation;

pub use memory_tracker::*;
pub use validation::*;
