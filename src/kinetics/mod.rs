//! Kinetic parameter estimation from experimental data.
//!
//! Responsibilities:
//!
//! - resolve the exponential-phase window (`phase`)
//! - estimate mu / td / Yxs / qs (`estimator`)
//! - summarize steepest observed rates (`rates`)
//! - estimate kLa from reactor operating conditions (`oxygen`)

pub mod estimator;
pub mod oxygen;
pub mod phase;
pub mod rates;

pub use estimator::*;
pub use oxygen::*;
pub use phase::*;
pub use rates::*;
