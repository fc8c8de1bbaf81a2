/// Formats seconds as `m:ss`, e.g. `125.9` as `"2:05"`. Negative values show as `"0:00"`.
pub fn mm_ss(seconds: f64) -> String {
    let whole_seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", whole_seconds / 60, whole_seconds % 60)
}

/// Formats a normalized position on a track of `total_length_seconds` as `m:ss`.
pub fn position_mm_ss(position: f64, total_length_seconds: f64) -> String {
    mm_ss(position * total_length_seconds)
}

/// Formats a normalized position as a percentage with one decimal, e.g. `"40.8%"`.
pub fn percent(position: f64) -> String {
    format!("{:.1}%", position * 100.0)
}
