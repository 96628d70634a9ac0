//! Runtime configuration: parameter range table and JSON parameter files.

pub mod params_file;
pub mod ranges;

pub use params_file::*;
pub use ranges::{ParamRange, check_reactor, check_simulation};
