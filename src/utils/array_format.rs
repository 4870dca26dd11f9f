use ndarray::{ArrayView1, ArrayView2, Axis};

/// Render a vector as `[a, b, c]` at fixed decimal precision
pub fn vector_to_str(v: &ArrayView1<f64>, decimals: usize) -> String {
    let cells: Vec<String> = v.iter().map(|x| format!("{:.*}", decimals, x)).collect();
    format!("[{}]", cells.join(", "))
}

/// Render a matrix one row per line, capped at `max_rows`
///
/// When rows are cut, the rendering says how many were hidden so the reader
/// is never shown a truncated matrix as if it were complete.
pub fn matrix_to_str(m: &ArrayView2<f64>, decimals: usize, max_rows: Option<usize>) -> String {
    let shown = match max_rows {
        Some(cap) => cap.min(m.nrows()),
        None => m.nrows(),
    };

    let mut lines: Vec<String> = m
        .axis_iter(Axis(0))
        .take(shown)
        .map(|row| vector_to_str(&row, decimals))
        .collect();

    let hidden = m.nrows() - shown;
    if hidden > 0 {
        lines.push(format!("... ({} more rows)", hidden));
    }

    lines.join("\n")
}
