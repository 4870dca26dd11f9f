use ndarray::{s, Array1, ArrayView2, Axis};

/// Trailing window of the most recent `k` rows of the history matrix
pub fn recent_window<'a>(history: ArrayView2<'a, f64>, k: usize) -> ArrayView2<'a, f64> {
    let start = history.nrows().saturating_sub(k);
    history.slice_move(s![start.., ..])
}

/// Per-parameter spread: population standard deviation of each column
///
/// A zero-row window has no defined spread; it yields zeros (with a warning)
/// rather than poisoning the rendered context with NaN.
pub fn param_spread(window: &ArrayView2<f64>) -> Array1<f64> {
    if window.nrows() == 0 {
        log::warn!("Diversity window is empty; reporting zero spread for all parameters");
        return Array1::zeros(window.ncols());
    }

    window.std_axis(Axis(0), 0.0)
}
