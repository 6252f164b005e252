//! Formatting helpers for presenting scores.

/// Scores are always shown with one decimal (`3.0`, `4.3`). Halves round
/// away from zero: `4.25` reads `4.3`.
pub fn format_score(value: f64) -> String {
    // `+ 0.0` turns a rounded `-0.0` into `0.0`.
    let rounded = (value * 10.0).round() / 10.0 + 0.0;
    format!("{rounded:.1}")
}

/// Percentage for progress bars, `0` when there is nothing to do.
pub fn progress_percent(current: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((current.min(total) as f64 / total as f64) * 100.0).round() as u32
}
