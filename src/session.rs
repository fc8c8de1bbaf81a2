use crate::settings::TrackConfiguration;
use crate::tick_thread::{TickSourceId, TickThread};
use crate::trimmer::{Intent, PlaybackState, SelectionRange, TickEffect, TICK_INTERVAL};
use eframe::egui;
use std::sync::mpsc::{Receiver, Sender};

/// One open trimmer screen: configuration, playback state and the tick source driving it.
///
/// All transitions, including ticks, run on the thread that owns the session (the UI thread).
/// The tick thread only posts its id on a channel that [TrimmerSession::pump_ticks] drains.
pub struct TrimmerSession {
    config: TrackConfiguration,
    state: PlaybackState,

    /// At most one tick source is alive at a time.
    tick_thread: Option<TickThread>,
    next_tick_source_id: u64,
    ticks_sender: Sender<TickSourceId>,
    ticks_receiver: Receiver<TickSourceId>,

    /// UI context handle, passed to tick threads so each tick repaints the UI.
    ui_ctx: egui::Context,
}

impl TrimmerSession {
    pub fn new(config: TrackConfiguration, ui_ctx: &egui::Context) -> Self {
        let state = PlaybackState::new(&config);
        let (ticks_sender, ticks_receiver) = std::sync::mpsc::channel();

        log::info!(
            "[Trimmer] Session opened: {}s track, {} key times, zoom {:?}",
            config.total_length_seconds(),
            config.key_times().len(),
            config.timeline_zoom_ratio()
        );

        Self {
            config,
            state,
            tick_thread: None,
            next_tick_source_id: 0,
            ticks_sender,
            ticks_receiver,
            ui_ctx: ui_ctx.clone(),
        }
    }

    /// Applies a user intent and starts or cancels the tick source as required.
    pub fn send(&mut self, intent: Intent) {
        let was_playing = self.state.is_playing();
        let effect = self.state.apply(&self.config, intent);

        match (was_playing, self.state.is_playing()) {
            (false, true) => log::info!("[Trimmer] Playing from {:.3}", self.state.playhead()),
            (true, false) => log::info!("[Trimmer] Paused at {:.3}", self.state.playhead()),
            _ => {}
        }

        self.run_effect(effect);
    }

    pub fn key_time_tapped(&mut self, position: f64) {
        self.send(Intent::KeyTimeTapped(position));
    }

    pub fn scrub_to(&mut self, position: f64) {
        self.send(Intent::ScrubTo(position));
    }

    pub fn toggle_play_pause(&mut self) {
        self.send(Intent::TogglePlayPause);
    }

    pub fn reset(&mut self) {
        self.send(Intent::Reset);
    }

    /// Pauses and releases the tick source. Called when the screen is dismissed.
    pub fn stop(&mut self) {
        self.send(Intent::Stop);
    }

    /// Applies every tick received since the last call and returns how many were applied.
    ///
    /// Ticks from a source that has been cancelled are discarded.
    pub fn pump_ticks(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(id) = self.ticks_receiver.try_recv() {
            if self.handle_tick(id) {
                applied += 1;
            }
        }
        applied
    }

    /// Applies a single tick if it comes from the active source.
    pub fn handle_tick(&mut self, id: TickSourceId) -> bool {
        let active = self.tick_thread.as_ref().map(TickThread::id);
        if active != Some(id) {
            return false;
        }

        let effect = self.state.apply(&self.config, Intent::Tick);
        if !self.state.is_playing() {
            log::info!("[Trimmer] Reached end of selection at {:.3}", self.state.playhead());
        }
        self.run_effect(effect);
        true
    }

    fn run_effect(&mut self, effect: TickEffect) {
        match effect {
            TickEffect::None => {}
            TickEffect::Start => {
                // Joins the previous thread before the new one exists
                self.tick_thread = None;

                let id = TickSourceId(self.next_tick_source_id);
                self.next_tick_source_id += 1;
                self.tick_thread = Some(TickThread::spawn(
                    id,
                    TICK_INTERVAL,
                    self.ticks_sender.clone(),
                    &self.ui_ctx,
                ));
            }
            TickEffect::Cancel => self.tick_thread = None,
        }
    }

    pub fn config(&self) -> &TrackConfiguration {
        &self.config
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn selection_range(&self) -> SelectionRange {
        self.state.selection_range(&self.config)
    }

    pub fn playhead(&self) -> f64 {
        self.state.playhead()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn key_times(&self) -> &[f64] {
        self.config.key_times()
    }

    pub fn total_length_seconds(&self) -> f64 {
        self.config.total_length_seconds()
    }

    pub fn timeline_zoom_ratio(&self) -> Option<f64> {
        self.config.timeline_zoom_ratio()
    }

    pub fn has_active_tick_source(&self) -> bool {
        self.tick_thread.is_some()
    }

    pub fn active_tick_source(&self) -> Option<TickSourceId> {
        self.tick_thread.as_ref().map(TickThread::id)
    }
}

impl Drop for TrimmerSession {
    fn drop(&mut self) {
        self.stop();
    }
}
