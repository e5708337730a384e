//! CLI command implementations

mod set;

pub use set::run_set;
