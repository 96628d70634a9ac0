//! Free-form numeric text parsing.
//!
//! Users paste columns straight out of a spreadsheet or type them inline, so
//! both newlines and commas act as separators:
//!
//! ```text
//! 0
//! 4, 8
//! 12,
//! ```
//!
//! parses to `[0, 4, 8, 12]`. Blank tokens are skipped; anything else that is
//! not a finite decimal number is an error.

use crate::error::{CoreResult, KineticsError};

/// Parse delimited text into an ordered list of numbers.
pub fn parse_series(text: &str) -> CoreResult<Vec<f64>> {
    let mut out = Vec::new();
    let tokens = text
        .split(['\n', '\r', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty());

    for (idx, token) in tokens.enumerate() {
        let value = token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| KineticsError::Parse {
                token: token.to_string(),
                position: idx + 1,
            })?;
        out.push(value);
    }

    Ok(out)
}
