/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Simple moving average over the `period` values ending `offset` places before the last one.
///
/// `offset = 0` is the latest average. Returns `None` when the window does not fit.
pub fn sma_at(data: &[f64], period: usize, offset: usize) -> Option<f64> {
    if period == 0 || data.len() < period + offset {
        return None;
    }
    let end = data.len() - offset;
    Some(mean(&data[end - period..end]))
}

/// Percentage change from `previous` to `current`; `None` if `previous` is zero or either
/// value is not finite.
pub fn pct_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}
