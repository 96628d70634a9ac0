//! `bioreactor-kinetics` library crate.
//!
//! The binary (`kin`) is a thin wrapper around this library so that:
//!
//! - the estimators and the simulator are testable without spawning processes
//! - every computation is a plain function over typed records
//!
//! Layout, leaf-first: `math` and `domain` at the bottom; `io`, `kinetics`,
//! `interpret`, `sim` and `config` on top of them; `report`, `plot`, `cli`
//! and `app` as the presentation layer.

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod interpret;
pub mod io;
pub mod kinetics;
pub mod math;
pub mod plot;
pub mod report;
pub mod sim;
