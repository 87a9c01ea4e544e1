// File: crates/pulse-core/src/grid.rs
// Summary: Evenly spaced value levels for the vertical axis.

pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    if steps < 2 { return vec![start, end]; }
    let step = (end - start) / (steps as f64 - 1.0);
    (0..steps).map(|i| start + step * i as f64).collect()
}

/// Y-axis label levels from `lo` to `hi`; a flat domain yields one level.
pub fn value_levels(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }
    if (hi - lo).abs() < f64::EPSILON {
        return vec![lo];
    }
    linspace(lo, hi, count.max(2))
}
