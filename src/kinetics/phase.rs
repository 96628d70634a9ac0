//! Exponential-phase window selection.
//!
//! Window bounds are picked from the sampled times themselves, so they are
//! resolved by exact value lookup rather than by interpolation.

use std::cmp::Ordering;

use crate::domain::{IndexWindow, PhaseWindow};
use crate::error::{CoreResult, KineticsError};

/// Resolve `window` into an inclusive index range over `time`.
///
/// Fails with `InvalidWindow` when `start >= end`, and with
/// `WindowBoundNotFound` when a bound is not one of the sampled times.
pub fn select_phase(time: &[f64], window: PhaseWindow) -> CoreResult<IndexWindow> {
    if window.start.partial_cmp(&window.end) != Some(Ordering::Less) {
        return Err(KineticsError::InvalidWindow {
            start: window.start,
            end: window.end,
        });
    }

    let start = find_time(time, window.start)?;
    let end = find_time(time, window.end)?;

    // Raw slices are not guaranteed to be increasing.
    if end <= start {
        return Err(KineticsError::InvalidWindow {
            start: window.start,
            end: window.end,
        });
    }

    Ok(IndexWindow { start, end })
}

fn find_time(time: &[f64], value: f64) -> CoreResult<usize> {
    time.iter()
        .position(|&t| t == value)
        .ok_or(KineticsError::WindowBoundNotFound { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIME: [f64; 5] = [0.0, 4.0, 8.0, 12.0, 16.0];

    #[test]
    fn resolves_inclusive_indices() {
        let w = select_phase(&TIME, PhaseWindow { start: 4.0, end: 12.0 }).unwrap();
        assert_eq!(w, IndexWindow { start: 1, end: 3 });
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn start_not_before_end_is_rejected() {
        let err = select_phase(&TIME, PhaseWindow { start: 8.0, end: 8.0 }).unwrap_err();
        assert!(matches!(err, KineticsError::InvalidWindow { .. }));

        let err = select_phase(&TIME, PhaseWindow { start: 12.0, end: 4.0 }).unwrap_err();
        assert!(matches!(err, KineticsError::InvalidWindow { .. }));
    }

    #[test]
    fn unknown_bound_is_rejected() {
        let err = select_phase(&TIME, PhaseWindow { start: 4.0, end: 10.0 }).unwrap_err();
        assert!(matches!(err, KineticsError::WindowBoundNotFound { value } if value == 10.0));
    }

    #[test]
    fn nan_bound_is_an_invalid_window() {
        let err = select_phase(&TIME, PhaseWindow { start: f64::NAN, end: 4.0 }).unwrap_err();
        assert!(matches!(err, KineticsError::InvalidWindow { .. }));
    }
}
