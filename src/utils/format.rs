//! Timer label formatting

pub const INVALID_TEXT: &str = "Invalid!";
pub const EXPIRED_TEXT: &str = "Time's up!";

/// Format seconds as zero-padded "MM:SS". Minutes are not wrapped into hours.
pub fn format_mm_ss(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.unsigned_abs();
    format!("{}{:02}:{:02}", sign, seconds / 60, seconds % 60)
}
