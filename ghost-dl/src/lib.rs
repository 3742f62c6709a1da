//! The ghost-artifact dataset adapter.

mod common;
pub mod dataset;
pub mod mask;

pub use dataset::*;
pub use mask::*;
