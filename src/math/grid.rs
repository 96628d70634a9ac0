//! Uniform grids and finite differences.

/// `n` evenly spaced points from `start` to `end` (both included).
///
/// `n == 1` yields `[start]`; `n == 0` yields an empty vector.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n as f64 - 1.0);
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            // Pin the last point so it is exactly `end`.
            out[n - 1] = end;
            out
        }
    }
}

/// Forward difference quotients `(y[i+1] - y[i]) / (x[i+1] - x[i])`.
///
/// Output has one element less than the inputs.
pub fn slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| (yw[1] - yw[0]) / (xw[1] - xw[0]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_endpoints() {
        let v = linspace(0.0, 72.0, 500);
        assert_eq!(v.len(), 500);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[499], 72.0);
        assert!(v.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn slopes_basic() {
        let s = slopes(&[0.0, 2.0, 4.0], &[1.0, 5.0, 3.0]);
        assert_eq!(s, vec![2.0, -1.0]);
    }
}
