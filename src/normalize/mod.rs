//! Column normalization: header inference, cell parsing and invoice code cleanup

pub mod aliases;
pub mod columns;
pub mod dates;
pub mod invoice;
pub mod numbers;

pub use aliases::*;
pub use columns::*;
pub use dates::*;
pub use invoice::*;
pub use numbers::*;
