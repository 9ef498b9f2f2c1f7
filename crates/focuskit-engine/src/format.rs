//! Time formatting and progress helpers shared by the timers.

const MS_PER_HOUR: u64 = 3_600_000;
const SECS_PER_HOUR: u64 = 3_600;

/// Format milliseconds as `MM:SS.CC`, or `HH:MM:SS.CC` from one hour up.
pub fn format_stopwatch(ms: u64) -> String {
    let total_secs = ms / 1000;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    let cs = (ms % 1000) / 10;
    if ms >= MS_PER_HOUR {
        format!("{h:02}:{m:02}:{s:02}.{cs:02}")
    } else {
        format!("{m:02}:{s:02}.{cs:02}")
    }
}

/// Format seconds as `MM:SS`, or `HH:MM:SS` from one hour up.
pub fn format_countdown(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if secs >= SECS_PER_HOUR {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Percentage of `total` already consumed, in `0.0..=100.0`.
///
/// Returns `0.0` when `total` is zero.
#[allow(clippy::cast_precision_loss)]
pub fn progress_percent(total: u64, remaining: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let done = total.saturating_sub(remaining);
    done as f64 / total as f64 * 100.0
}
