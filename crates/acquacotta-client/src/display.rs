//! Display projections of the timer presentation state.
//!
//! Pure functions; the UI calls them on every read.

/// `mm:ss`, both parts zero-padded. Minutes are not wrapped into hours.
pub fn format_time(remaining_seconds: u32) -> String {
    let minutes = remaining_seconds / 60;
    let seconds = remaining_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Elapsed share of the current phase, 0.0 ..= 100.0.
///
/// A zero-length phase reports 0.
pub fn progress_percent(total_seconds: u32, remaining_seconds: u32) -> f64 {
    if total_seconds == 0 {
        return 0.0;
    }
    let total = f64::from(total_seconds);
    (total - f64::from(remaining_seconds)) / total * 100.0
}
