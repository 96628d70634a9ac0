//! Mathematical utilities: least squares, linear regression, grids.

pub mod grid;
pub mod ols;

pub use grid::*;
pub use ols::*;
