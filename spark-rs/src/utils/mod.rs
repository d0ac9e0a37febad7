//! Shared utilities for the spark-rs CLI

pub mod format;
pub mod table;

pub use format::*;
pub use table::*;
