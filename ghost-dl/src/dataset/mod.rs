//! Dataset processing toolkit.

mod dataset_;
mod record;
mod utils;
mod via;

pub use dataset_::*;
pub use record::*;
pub use utils::*;
pub use via::*;
