//! Report tables, CSV export and missing-invoice records

pub mod builder;
pub mod export;
pub mod missing;

pub use builder::*;
pub use export::*;
pub use missing::*;
