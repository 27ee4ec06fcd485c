pub mod types;
pub mod store;
pub mod stats;

pub use types::*;
pub use store::*;
pub use stats::*;
