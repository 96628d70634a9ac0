//! Input/output helpers.
//!
//! - delimited text parsing (`parse`)
//! - CSV / text / demo ingest + validation (`ingest`)
//! - result exports (JSON/CSV) (`export`)

pub mod export;
pub mod ingest;
pub mod parse;

pub use export::*;
pub use ingest::*;
pub use parse::*;
