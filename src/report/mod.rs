//! Terminal reports for analysis, kLa and simulation runs.

pub mod format;

pub use format::*;
