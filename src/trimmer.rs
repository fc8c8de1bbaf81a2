//! Playhead and selection window rules of the trimmer screen.
//!
//! Everything in here is pure: [PlaybackState::apply] takes an [Intent] and returns the
//! [TickEffect] the caller has to carry out on the tick source. Timing and threads live in
//! [crate::session].

use crate::settings::TrackConfiguration;
use std::time::Duration;

/// Length of the selection window. The window cannot be resized from the trimmer screen.
pub const WINDOW_DURATION_SECONDS: f64 = 10.0;
/// Where both the window start and the playhead sit when a session opens.
pub const INITIAL_POSITION: f64 = 0.408;
/// Cadence of the simulated playback clock (~30 steps per second).
pub const TICK_INTERVAL: Duration = Duration::from_millis(33);

// Guards the window ratio against a zero track length.
const MIN_LENGTH_DIVISOR: f64 = 0.001;

/// Inputs the trimmer reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Move the window start to a normalized position (drag on the timeline).
    ScrubTo(f64),
    /// A key-time marker was tapped. Behaves exactly like [Intent::ScrubTo].
    KeyTimeTapped(f64),
    TogglePlayPause,
    /// Rewind the playhead to the start of the window and pause.
    Reset,
    /// One step of the playback clock.
    Tick,
    /// Pause unconditionally, e.g. because the screen is going away.
    Stop,
}

/// What has to happen to the tick source after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEffect {
    None,
    /// Start a new tick source, replacing the current one if there is any.
    Start,
    /// Cancel the current tick source, if there is any.
    Cancel,
}

/// Part of the track eligible for playback, as normalized positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRange {
    pub lower: f64,
    pub upper: f64,
}

impl SelectionRange {
    pub fn contains(&self, position: f64) -> bool {
        self.lower <= position && position <= self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Fraction of the track covered by a window of `window_duration_seconds`.
pub fn window_ratio(total_length_seconds: f64, window_duration_seconds: f64) -> f64 {
    window_duration_seconds / total_length_seconds.max(MIN_LENGTH_DIVISOR)
}

/// Largest window start that keeps the window inside the track.
pub fn max_selection_start(window_ratio: f64) -> f64 {
    (1.0 - window_ratio).max(0.0)
}

/// Derives the selection range from a window start.
pub fn selection_range(
    total_length_seconds: f64,
    window_duration_seconds: f64,
    selection_start: f64,
) -> SelectionRange {
    let ratio = window_ratio(total_length_seconds, window_duration_seconds);
    let max_start = max_selection_start(ratio);
    let lower = selection_start.clamp(0.0, max_start);
    // 1.0 - r + r is not always exactly 1.0
    let upper = if lower >= max_start {
        1.0
    } else {
        (lower + ratio).min(1.0)
    };
    SelectionRange { lower, upper }
}

/// Live playback state of one trimmer session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    window_duration_seconds: f64,
    selection_start: f64,
    playhead: f64,
    is_playing: bool,
}

impl PlaybackState {
    pub fn new(config: &TrackConfiguration) -> Self {
        Self::with_window_duration(config, WINDOW_DURATION_SECONDS)
    }

    pub fn with_window_duration(config: &TrackConfiguration, window_duration_seconds: f64) -> Self {
        let mut state = Self {
            window_duration_seconds,
            selection_start: INITIAL_POSITION,
            playhead: INITIAL_POSITION,
            is_playing: false,
        };
        state.move_window(config, INITIAL_POSITION);
        state
    }

    pub fn window_duration_seconds(&self) -> f64 {
        self.window_duration_seconds
    }

    /// Left edge of the window as stored; always within `[0, max_selection_start]`.
    pub fn selection_start(&self) -> f64 {
        self.selection_start
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn selection_range(&self, config: &TrackConfiguration) -> SelectionRange {
        selection_range(
            config.total_length_seconds(),
            self.window_duration_seconds,
            self.selection_start,
        )
    }

    /// Applies one intent and reports what the tick source has to do.
    pub fn apply(&mut self, config: &TrackConfiguration, intent: Intent) -> TickEffect {
        match intent {
            Intent::ScrubTo(position) | Intent::KeyTimeTapped(position) => {
                if position.is_nan() {
                    return TickEffect::None;
                }
                self.move_window(config, position);
                self.is_playing = false;
                TickEffect::Cancel
            }
            Intent::TogglePlayPause => {
                self.is_playing = !self.is_playing;
                if !self.is_playing {
                    return TickEffect::Cancel;
                }
                let range = self.selection_range(config);
                if !range.contains(self.playhead) {
                    self.playhead = range.lower;
                }
                TickEffect::Start
            }
            Intent::Reset => {
                self.playhead = self.selection_range(config).lower;
                self.is_playing = false;
                TickEffect::Cancel
            }
            Intent::Tick => self.advance(config),
            Intent::Stop => {
                self.is_playing = false;
                TickEffect::Cancel
            }
        }
    }

    fn move_window(&mut self, config: &TrackConfiguration, position: f64) {
        let range = selection_range(
            config.total_length_seconds(),
            self.window_duration_seconds,
            position.clamp(0.0, 1.0),
        );
        self.selection_start = range.lower;
        self.playhead = range.lower;
    }

    fn advance(&mut self, config: &TrackConfiguration) -> TickEffect {
        // A tick may still be in flight after a pause
        if !self.is_playing {
            return TickEffect::None;
        }

        let upper = self.selection_range(config).upper;
        let step = TICK_INTERVAL.as_secs_f64() / config.total_length_seconds().max(MIN_LENGTH_DIVISOR);
        self.playhead = (self.playhead + step).min(upper);

        if self.playhead >= upper {
            self.is_playing = false;
            return TickEffect::Cancel;
        }
        TickEffect::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn config(total_length_seconds: f64) -> TrackConfiguration {
        TrackConfiguration::new(total_length_seconds, vec![0.08, 0.5, 0.9], None)
    }

    fn ticks_until_paused(state: &mut PlaybackState, config: &TrackConfiguration) -> usize {
        let mut ticks = 0;
        while state.is_playing() {
            state.apply(config, Intent::Tick);
            ticks += 1;
            assert!(ticks < 100_000, "playback never stopped");
        }
        ticks
    }

    #[test]
    fn test_initial_state() {
        let config = config(60.0);
        let state = PlaybackState::new(&config);
        assert!((state.selection_start() - INITIAL_POSITION).abs() < EPSILON);
        assert!((state.playhead() - INITIAL_POSITION).abs() < EPSILON);
        assert!(!state.is_playing());

        let range = state.selection_range(&config);
        assert!((range.width() - 10.0 / 60.0).abs() < EPSILON);
    }

    #[test]
    fn test_initial_state_is_clamped_for_short_tracks() {
        // 15s track: window covers 2/3, so the start can be at most 1/3
        let config = config(15.0);
        let state = PlaybackState::new(&config);
        assert!((state.selection_start() - 1.0 / 3.0).abs() < EPSILON);
        assert_eq!(state.playhead(), state.selection_start());
        assert_eq!(state.selection_range(&config).upper, 1.0);
    }

    #[test]
    fn test_window_longer_than_track() {
        let config = config(5.0);
        let state = PlaybackState::new(&config);
        let range = state.selection_range(&config);
        assert_eq!(range, SelectionRange { lower: 0.0, upper: 1.0 });
        assert_eq!(state.playhead(), 0.0);
    }

    #[test]
    fn test_scrub_clamps_to_track_end() {
        let config = config(60.0);
        let mut state = PlaybackState::new(&config);

        let effect = state.apply(&config, Intent::ScrubTo(0.9));

        assert_eq!(effect, TickEffect::Cancel);
        assert!((state.selection_start() - 5.0 / 6.0).abs() < EPSILON);
        let range = state.selection_range(&config);
        assert!((range.lower - 5.0 / 6.0).abs() < EPSILON);
        assert_eq!(range.upper, 1.0);
        assert!((state.playhead() - 5.0 / 6.0).abs() < EPSILON);
        assert!(!state.is_playing());
    }

    #[test]
    fn test_scrub_out_of_range_positions() {
        let config = config(60.0);
        let mut state = PlaybackState::new(&config);

        state.apply(&config, Intent::ScrubTo(-3.0));
        assert_eq!(state.selection_start(), 0.0);

        state.apply(&config, Intent::ScrubTo(7.0));
        assert!((state.selection_start() - 5.0 / 6.0).abs() < EPSILON);

        let before = state.clone();
        assert_eq!(state.apply(&config, Intent::ScrubTo(f64::NAN)), TickEffect::None);
        assert_eq!(state, before);
    }

    #[test]
    fn test_scrub_stops_playback() {
        let config = config(60.0);
        let mut state = PlaybackState::new(&config);
        state.apply(&config, Intent::TogglePlayPause);
        state.apply(&config, Intent::Tick);

        assert_eq!(state.apply(&config, Intent::ScrubTo(0.2)), TickEffect::Cancel);
        assert!(!state.is_playing());
        assert_eq!(state.playhead(), 0.2);
    }

    #[test]
    fn test_key_time_tap_matches_scrub() {
        let config = config(60.0);
        for position in [0.0, 0.08, 0.5, 0.9, 1.0] {
            let mut tapped = PlaybackState::new(&config);
            let mut scrubbed = tapped.clone();
            let tap_effect = tapped.apply(&config, Intent::KeyTimeTapped(position));
            let scrub_effect = scrubbed.apply(&config, Intent::ScrubTo(position));
            assert_eq!(tapped, scrubbed);
            assert_eq!(tap_effect, scrub_effect);
        }
    }

    #[test]
    fn test_toggle_starts_and_cancels_ticks() {
        let config = config(60.0);
        let mut state = PlaybackState::new(&config);

        assert_eq!(state.apply(&config, Intent::TogglePlayPause), TickEffect::Start);
        assert!(state.is_playing());
        assert_eq!(state.apply(&config, Intent::TogglePlayPause), TickEffect::Cancel);
        assert!(!state.is_playing());
    }

    #[test]
    fn test_tick_advances_at_real_time_rate() {
        let config = config(60.0);
        let mut state = PlaybackState::new(&config);
        let start = state.playhead();
        state.apply(&config, Intent::TogglePlayPause);

        assert_eq!(state.apply(&config, Intent::Tick), TickEffect::None);
        assert!((state.playhead() - (start + 0.033 / 60.0)).abs() < EPSILON);
    }

    #[test]
    fn test_tick_is_ignored_while_paused() {
        let config = config(60.0);
        let mut state = PlaybackState::new(&config);
        let before = state.clone();
        assert_eq!(state.apply(&config, Intent::Tick), TickEffect::None);
        assert_eq!(state, before);
    }

    #[test]
    fn test_playback_stops_at_track_end() {
        let config = config(60.0);
        let mut state = PlaybackState::new(&config);
        state.apply(&config, Intent::ScrubTo(0.9));
        state.apply(&config, Intent::TogglePlayPause);

        let ticks = ticks_until_paused(&mut state, &config);

        // 10 seconds at 33ms per tick
        assert_eq!(ticks, 304);
        assert_eq!(state.playhead(), 1.0);
        assert!(!state.is_playing());

        state.apply(&config, Intent::Tick);
        assert_eq!(state.playhead(), 1.0);
    }

    #[test]
    fn test_playback_stops_at_window_edge() {
        let config = config(100.0);
        let mut state = PlaybackState::new(&config);
        state.apply(&config, Intent::ScrubTo(0.25));
        state.apply(&config, Intent::TogglePlayPause);

        ticks_until_paused(&mut state, &config);

        assert!((state.playhead() - 0.35).abs() < EPSILON);
        assert_eq!(state.playhead(), state.selection_range(&config).upper);
    }

    #[test]
    fn test_reset_rewinds_to_window_start() {
        let config = config(60.0);
        let mut state = PlaybackState::new(&config);
        state.apply(&config, Intent::ScrubTo(0.3));
        state.apply(&config, Intent::TogglePlayPause);
        for _ in 0..10 {
            state.apply(&config, Intent::Tick);
        }

        assert_eq!(state.apply(&config, Intent::Reset), TickEffect::Cancel);
        assert_eq!(state.playhead(), 0.3);
        assert_eq!(state.selection_start(), 0.3);
        assert!(!state.is_playing());
    }

    #[test]
    fn test_stop_pauses() {
        let config = config(60.0);
        let mut state = PlaybackState::new(&config);
        state.apply(&config, Intent::TogglePlayPause);
        assert_eq!(state.apply(&config, Intent::Stop), TickEffect::Cancel);
        assert!(!state.is_playing());
    }

    #[test]
    fn test_play_at_window_end_stops_on_next_tick() {
        let config = config(60.0);
        let mut state = PlaybackState::new(&config);
        state.apply(&config, Intent::ScrubTo(1.0));
        state.apply(&config, Intent::TogglePlayPause);
        ticks_until_paused(&mut state, &config);

        // The playhead is still inside the range, so it is not rewound
        assert_eq!(state.apply(&config, Intent::TogglePlayPause), TickEffect::Start);
        assert_eq!(state.playhead(), 1.0);
        assert_eq!(state.apply(&config, Intent::Tick), TickEffect::Cancel);
        assert!(!state.is_playing());
    }

    #[test]
    fn test_zoom_ratio_does_not_change_playback() {
        let zoomed = TrackConfiguration::new(60.0, vec![], Some(0.2));
        let plain = TrackConfiguration::new(60.0, vec![], None);
        let mut a = PlaybackState::new(&zoomed);
        let mut b = PlaybackState::new(&plain);
        for intent in [Intent::ScrubTo(0.4), Intent::TogglePlayPause, Intent::Tick, Intent::Tick] {
            assert_eq!(a.apply(&zoomed, intent), b.apply(&plain, intent));
        }
        assert_eq!(a, b);
    }
}
