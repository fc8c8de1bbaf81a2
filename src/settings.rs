//! Settings screen model: turns loosely typed user input into a [TrackConfiguration].
//!
//! Nothing here ever fails. Out-of-range numbers are clamped and text that does not parse is
//! ignored, keeping whatever value was there before.

/// Shortest track the trimmer accepts, in seconds.
pub const MIN_TOTAL_LENGTH_SECONDS: f64 = 5.0;
/// Longest track the trimmer accepts, in seconds.
pub const MAX_TOTAL_LENGTH_SECONDS: f64 = 600.0;
/// Track length used when the settings screen opens.
pub const DEFAULT_TOTAL_LENGTH_SECONDS: f64 = 60.0;
/// Amount the total length stepper moves per click, in seconds.
pub const TOTAL_LENGTH_STEP: f64 = 5.0;

pub const MIN_ZOOM_RATIO: f64 = 0.1;
pub const MAX_ZOOM_RATIO: f64 = 1.0;
pub const DEFAULT_ZOOM_RATIO: Option<f64> = Some(1.0);

/// Key times offered before the user types any, as normalized positions.
pub const DEFAULT_KEY_TIMES: [f64; 7] = [0.08, 0.20, 0.33, 0.41, 0.62, 0.78, 0.90];

/// Configuration handed to a trimmer session when it is opened.
///
/// Immutable once built; every constructor path goes through the same clamps, so a value of
/// this type is always within bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackConfiguration {
    total_length_seconds: f64,
    key_times: Vec<f64>,
    timeline_zoom_ratio: Option<f64>,
}

impl TrackConfiguration {
    pub fn new(total_length_seconds: f64, key_times: Vec<f64>, timeline_zoom_ratio: Option<f64>) -> Self {
        let mut key_times: Vec<f64> = key_times
            .into_iter()
            .filter(|t| t.is_finite())
            .map(|t| t.clamp(0.0, 1.0))
            .collect();
        key_times.sort_by(f64::total_cmp);

        Self {
            total_length_seconds: clamp_total_length(total_length_seconds),
            key_times,
            timeline_zoom_ratio: timeline_zoom_ratio
                .filter(|r| r.is_finite())
                .map(clamp_zoom_ratio),
        }
    }

    pub fn total_length_seconds(&self) -> f64 {
        self.total_length_seconds
    }

    /// Key times as normalized positions, sorted ascending. Duplicates are kept.
    pub fn key_times(&self) -> &[f64] {
        &self.key_times
    }

    /// Presentation hint for the timeline view. Has no effect on playback.
    pub fn timeline_zoom_ratio(&self) -> Option<f64> {
        self.timeline_zoom_ratio
    }
}

impl Default for TrackConfiguration {
    fn default() -> Self {
        SettingsResolver::default().confirm_and_proceed()
    }
}

/// Editable settings, fed by the settings screen one field change at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsResolver {
    total_length_seconds: f64,
    key_times: Vec<f64>,
    timeline_zoom_ratio: Option<f64>,
}

impl SettingsResolver {
    pub fn total_length_seconds(&self) -> f64 {
        self.total_length_seconds
    }

    pub fn key_times(&self) -> &[f64] {
        &self.key_times
    }

    pub fn timeline_zoom_ratio(&self) -> Option<f64> {
        self.timeline_zoom_ratio
    }

    pub fn set_total_length(&mut self, seconds: f64) {
        if seconds.is_nan() {
            return;
        }
        self.total_length_seconds = clamp_total_length(seconds);
    }

    /// Moves the total length by whole stepper increments (negative moves it down).
    pub fn step_total_length(&mut self, steps: i32) {
        self.set_total_length(self.total_length_seconds + f64::from(steps) * TOTAL_LENGTH_STEP);
    }

    /// Parses a comma separated list of percentages, e.g. `"8, 20, 33"`.
    ///
    /// Tokens that are not numbers are dropped. If nothing usable is left the current list
    /// stays as it is, so a half-typed field never wipes the markers.
    pub fn set_key_times_from_text(&mut self, text: &str) {
        let mut parsed: Vec<f64> = text
            .split(',')
            .map(str::trim)
            .filter_map(|token| token.parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .map(|percent| (percent / 100.0).clamp(0.0, 1.0))
            .collect();

        if parsed.is_empty() {
            return;
        }
        parsed.sort_by(f64::total_cmp);
        self.key_times = parsed;
    }

    /// Parses the zoom ratio as a percentage. Blank text clears it; unparsable text is ignored.
    pub fn set_timeline_zoom_ratio_from_text(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.timeline_zoom_ratio = None;
            return;
        }
        if let Ok(percent) = trimmed.parse::<f64>() {
            if percent.is_finite() {
                self.timeline_zoom_ratio = Some(clamp_zoom_ratio(percent / 100.0));
            }
        }
    }

    pub fn reset_key_times_to_default(&mut self) {
        self.key_times = DEFAULT_KEY_TIMES.to_vec();
    }

    /// Snapshots the current fields for a new trimmer session.
    pub fn confirm_and_proceed(&self) -> TrackConfiguration {
        TrackConfiguration::new(
            self.total_length_seconds,
            self.key_times.clone(),
            self.timeline_zoom_ratio,
        )
    }

    /// Key times as whole percentages, e.g. `"8%, 20%, 33%"`.
    pub fn key_times_summary(&self) -> String {
        self.key_times
            .iter()
            .map(|t| format!("{:.0}%", t * 100.0))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Key times as the text the key-times field accepts, e.g. `"8, 20, 33"`.
    pub fn key_times_text(&self) -> String {
        self.key_times
            .iter()
            .map(|t| format!("{}", round_percent(t * 100.0)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Zoom ratio as percentage text, or empty when there is none.
    pub fn zoom_ratio_text(&self) -> String {
        self.timeline_zoom_ratio
            .map(|r| format!("{}", round_percent(r * 100.0)))
            .unwrap_or_default()
    }
}

impl Default for SettingsResolver {
    fn default() -> Self {
        Self {
            total_length_seconds: DEFAULT_TOTAL_LENGTH_SECONDS,
            key_times: DEFAULT_KEY_TIMES.to_vec(),
            timeline_zoom_ratio: DEFAULT_ZOOM_RATIO,
        }
    }
}

fn clamp_total_length(seconds: f64) -> f64 {
    if seconds.is_nan() {
        return DEFAULT_TOTAL_LENGTH_SECONDS;
    }
    seconds.clamp(MIN_TOTAL_LENGTH_SECONDS, MAX_TOTAL_LENGTH_SECONDS)
}

fn clamp_zoom_ratio(ratio: f64) -> f64 {
    ratio.clamp(MIN_ZOOM_RATIO, MAX_ZOOM_RATIO)
}

// 0.33 * 100.0 is 33.00000000000001
fn round_percent(percent: f64) -> f64 {
    (percent * 1000.0).round() / 1000.0
}
