use crate::session::TrimmerSession;
use crate::time_format;
use crate::trimmer::SelectionRange;
use eframe::egui;

const TIMELINE_HEIGHT: f32 = 92.0;
const TIMELINE_PADDING: f32 = 9.0;
/// Share of the timeline width taken by the selection frame at zoom ratio 1.
const WINDOW_WIDTH_SHARE: f32 = 0.62;
const MIN_VIEW_ZOOM: f64 = 0.3;

const WAVE_BAR_WIDTH: f32 = 3.0;
const WAVE_BAR_SPACING: f32 = 4.0;
const WAVE_BAR_MAX_HEIGHT: f32 = 50.0;
const WAVE_PATTERN: [f32; 6] = [0.2, 0.4, 0.6, 0.8, 0.6, 0.4];

const KEY_TIME_BAR_HEIGHT: f32 = 22.0;
const KEY_TIME_MARKER_RADIUS: f32 = 8.0;

/// Placement of the fixed selection frame and the waveform content scrolling beneath it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineGeometry {
    pub window_x: f32,
    pub window_width: f32,
    /// Width of the whole track when drawn at the frame's scale.
    pub content_width: f32,
    /// Horizontal position of the track's start, relative to the timeline's left edge.
    pub content_offset_x: f32,
    /// How far the playhead is through the window, in `[0, 1]`.
    pub progress: f32,
    max_start: f64,
}

impl TimelineGeometry {
    pub fn new(width: f32, zoom_ratio: Option<f64>, range: SelectionRange, playhead: f64) -> Self {
        let zoom = zoom_ratio.unwrap_or(1.0).clamp(MIN_VIEW_ZOOM, 1.0) as f32;
        let window_width = width * WINDOW_WIDTH_SHARE * zoom;
        let window_x = (width - window_width) / 2.0;

        let window_ratio = range.width().max(0.0001);
        let max_start = (1.0 - window_ratio).max(0.0);
        let content_width = window_width / window_ratio as f32;
        let start = range.lower.clamp(0.0, max_start);
        let content_offset_x = window_x - content_width * start as f32;

        let progress = ((playhead - range.lower) / window_ratio).clamp(0.0, 1.0) as f32;

        Self {
            window_x,
            window_width,
            content_width,
            content_offset_x,
            progress,
            max_start,
        }
    }

    /// Window start after dragging the content by `dx` pixels from `base_start`.
    ///
    /// Dragging right moves the content right, which shows an earlier part of the track.
    pub fn dragged_start(&self, base_start: f64, dx: f32) -> f64 {
        let delta = f64::from(dx / self.content_width);
        (base_start - delta).clamp(0.0, self.max_start)
    }

    pub fn bar_count(&self) -> usize {
        ((self.content_width / (WAVE_BAR_WIDTH + WAVE_BAR_SPACING)) as usize).max(10)
    }
}

/// Key time under the horizontal offset `x` on a bar `width` pixels wide, if any.
pub fn key_time_at(key_times: &[f64], width: f32, x: f32) -> Option<f64> {
    key_times
        .iter()
        .copied()
        .map(|t| (t, (width * t as f32 - x).abs()))
        .filter(|(_, distance)| *distance <= KEY_TIME_MARKER_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(t, _)| t)
}

/// Drag in progress on the music timeline.
struct TimelineDrag {
    base_start: f64,
    dx: f32,
}

/// Trimmer screen: music timeline, key time selection and transport buttons.
pub struct TrimmerScreen {
    session: TrimmerSession,
    drag: Option<TimelineDrag>,
}

impl TrimmerScreen {
    pub fn new(session: TrimmerSession) -> Self {
        Self {
            session,
            drag: None,
        }
    }

    pub fn session(&self) -> &TrimmerSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut TrimmerSession {
        &mut self.session
    }

    /// Draws the screen. Returns `true` when the user asked to go back to the settings.
    pub fn show(&mut self, ui: &mut egui::Ui) -> bool {
        self.session.pump_ticks();

        let mut back = false;
        ui.horizontal(|ui| {
            if ui.button("< Settings").clicked() {
                back = true;
            }
            ui.heading("Audio Trimmer");
        });
        ui.add_space(8.0);

        self.key_time_selection(ui);
        ui.add_space(12.0);
        self.music_timeline(ui);
        ui.add_space(12.0);
        self.transport(ui);

        back
    }

    fn key_time_selection(&mut self, ui: &mut egui::Ui) {
        let range = self.session.selection_range();
        let playhead = self.session.playhead();

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.strong("KeyTime Selection");
                ui.label(format!(
                    "Selection: {} - {}",
                    time_format::percent(range.lower),
                    time_format::percent(range.upper)
                ));
                ui.colored_label(
                    egui::Color32::LIGHT_GREEN,
                    format!("Current: {}", time_format::percent(playhead)),
                );

                let width = ui.available_width();
                let (response, painter) = ui.allocate_painter(
                    egui::vec2(width, KEY_TIME_BAR_HEIGHT),
                    egui::Sense::click(),
                );
                let rect = response.rect;
                let mid_y = rect.center().y;

                painter.rect_filled(
                    egui::Rect::from_center_size(rect.center(), egui::vec2(rect.width(), 18.0)),
                    9.0,
                    egui::Color32::from_white_alpha(30),
                );
                let range_rect = egui::Rect::from_min_size(
                    egui::pos2(rect.left() + rect.width() * range.lower as f32, mid_y - 5.0),
                    egui::vec2((rect.width() * range.width() as f32).max(2.0), 10.0),
                );
                painter.rect_filled(range_rect, 5.0, egui::Color32::YELLOW);

                for &t in self.session.key_times() {
                    let center = egui::pos2(rect.left() + rect.width() * t as f32, mid_y);
                    painter.circle_filled(
                        center,
                        KEY_TIME_MARKER_RADIUS,
                        egui::Color32::from_rgb(255, 105, 180),
                    );
                }

                if response.clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        let tapped =
                            key_time_at(self.session.key_times(), rect.width(), pos.x - rect.left());
                        if let Some(t) = tapped {
                            log::debug!("[Trimmer View] key time {:.2} tapped", t);
                            self.session.key_time_tapped(t);
                        }
                    }
                }
            });
        });
    }

    fn music_timeline(&mut self, ui: &mut egui::Ui) {
        let total = self.session.total_length_seconds();
        let range = self.session.selection_range();
        let playhead = self.session.playhead();

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.strong("Music Timeline");
                ui.label(format!(
                    "Selected: {} → {}",
                    time_format::position_mm_ss(range.lower, total),
                    time_format::position_mm_ss(range.upper, total)
                ));
                ui.colored_label(
                    egui::Color32::LIGHT_GREEN,
                    format!("Current: {}", time_format::position_mm_ss(playhead, total)),
                );

                let width = ui.available_width();
                let (response, painter) = ui.allocate_painter(
                    egui::vec2(width, TIMELINE_HEIGHT),
                    egui::Sense::drag(),
                );
                let rect = response.rect;
                let geometry =
                    TimelineGeometry::new(rect.width(), self.session.timeline_zoom_ratio(), range, playhead);

                if response.drag_started() {
                    self.drag = Some(TimelineDrag {
                        base_start: range.lower,
                        dx: 0.0,
                    });
                }
                if response.dragged() {
                    if let Some(drag) = self.drag.as_mut() {
                        drag.dx += response.drag_delta().x;
                        let start = geometry.dragged_start(drag.base_start, drag.dx);
                        self.session.scrub_to(start);
                    }
                }
                if response.drag_stopped() {
                    self.drag = None;
                }

                paint_timeline(&painter, rect, &geometry);
            });
        });
    }

    fn transport(&mut self, ui: &mut egui::Ui) {
        let action = if self.session.is_playing() { "Pause" } else { "Play" };

        ui.horizontal(|ui| {
            if ui.button(action).clicked() {
                self.session.toggle_play_pause();
            }
            if ui.button("Reset").clicked() {
                self.session.reset();
            }
        });
    }
}

fn paint_timeline(painter: &egui::Painter, rect: egui::Rect, geometry: &TimelineGeometry) {
    let inner_height = rect.height() - 2.0 * TIMELINE_PADDING;
    let top = rect.top() + TIMELINE_PADDING;
    let mid_y = top + inner_height / 2.0;

    painter.rect_filled(rect, 14.0, egui::Color32::from_black_alpha(90));

    // Placeholder waveform, only the bars that are on screen
    let wave_painter = painter.with_clip_rect(rect);
    let pitch = WAVE_BAR_WIDTH + WAVE_BAR_SPACING;
    let first = ((-geometry.content_offset_x / pitch).floor().max(0.0)) as usize;
    for i in first..geometry.bar_count() {
        let x = rect.left() + geometry.content_offset_x + i as f32 * pitch;
        if x > rect.right() {
            break;
        }
        let height = WAVE_BAR_MAX_HEIGHT * WAVE_PATTERN[i % WAVE_PATTERN.len()];
        let bar = egui::Rect::from_center_size(
            egui::pos2(x + WAVE_BAR_WIDTH / 2.0, mid_y),
            egui::vec2(WAVE_BAR_WIDTH, height),
        );
        wave_painter.rect_filled(bar, 1.5, egui::Color32::from_white_alpha(230));
    }

    let window = egui::Rect::from_min_size(
        egui::pos2(rect.left() + geometry.window_x, top),
        egui::vec2(geometry.window_width, inner_height),
    );
    let progress = egui::Rect::from_min_size(
        window.min,
        egui::vec2(geometry.window_width * geometry.progress, inner_height),
    );
    painter.rect_filled(
        progress,
        12.0,
        egui::Color32::from_rgba_unmultiplied(0, 200, 0, 90),
    );
    painter.rect_filled(window, 12.0, egui::Color32::from_white_alpha(56));
    painter.rect_stroke(
        window,
        12.0,
        egui::Stroke::new(3.0, egui::Color32::from_rgb(255, 140, 0)),
        egui::StrokeKind::Inside,
    );
}
