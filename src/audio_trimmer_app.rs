use crate::session::TrimmerSession;
use crate::settings::SettingsResolver;
use crate::trimmer_view::TrimmerScreen;
use eframe::egui;

/// Settings screen: the resolver plus the raw text of its two text fields.
struct SettingsScreen {
    resolver: SettingsResolver,
    key_times_text: String,
    zoom_ratio_text: String,
}

impl SettingsScreen {
    /// Shows the settings form.
    ///
    /// Returns `true` when the user asked to open the trimmer.
    fn show(&mut self, ui: &mut egui::Ui) -> bool {
        ui.heading("Settings");
        ui.add_space(8.0);

        ui.group(|ui| {
            ui.strong("Track");
            ui.horizontal(|ui| {
                if ui.button("−").clicked() {
                    self.resolver.step_total_length(-1);
                }
                if ui.button("+").clicked() {
                    self.resolver.step_total_length(1);
                }
                ui.label(format!(
                    "Total length: {}s",
                    self.resolver.total_length_seconds() as u32
                ));
            });
        });

        ui.group(|ui| {
            ui.strong("KeyTimes (preset)");
            ui.weak(format!("KeyTimes: {}", self.resolver.key_times_summary()));
            if ui.text_edit_singleline(&mut self.key_times_text).changed() {
                self.resolver.set_key_times_from_text(&self.key_times_text);
            }
            ui.weak("Comma separated percentages, e.g. 8, 20, 33");
            if ui.button("Use default key times").clicked() {
                self.resolver.reset_key_times_to_default();
                self.key_times_text = self.resolver.key_times_text();
            }
        });

        ui.group(|ui| {
            ui.strong("Timeline length ratio (optional)");
            let field = egui::TextEdit::singleline(&mut self.zoom_ratio_text)
                .hint_text("e.g. 100 (no zoom in)");
            if ui.add(field).changed() {
                self.resolver
                    .set_timeline_zoom_ratio_from_text(&self.zoom_ratio_text);
            }
            ui.weak("Leave empty to use default UI length.");
        });

        ui.add_space(12.0);
        ui.vertical_centered(|ui| ui.button("Open Audio Trimmer").clicked())
            .inner
    }
}

impl Default for SettingsScreen {
    fn default() -> Self {
        let resolver = SettingsResolver::default();
        Self {
            key_times_text: resolver.key_times_text(),
            zoom_ratio_text: resolver.zoom_ratio_text(),
            resolver,
        }
    }
}

/// AudioTrimmerApp controls application UI: the settings screen with the trimmer screen
/// pushed on top of it.
#[derive(Default)]
pub struct AudioTrimmerApp {
    settings: SettingsScreen,

    /// Open trimmer, if any. Only one can be open at a time.
    trimmer: Option<TrimmerScreen>,
}

impl AudioTrimmerApp {
    /// Snapshots the settings and pushes a new trimmer screen.
    fn open_trimmer(&mut self, ctx: &egui::Context) {
        let config = self.settings.resolver.confirm_and_proceed();
        log::info!("[Audio Trimmer App] Opening trimmer");
        self.trimmer = Some(TrimmerScreen::new(TrimmerSession::new(config, ctx)));
    }

    /// Pops the trimmer screen, releasing its tick source.
    fn close_trimmer(&mut self) {
        if let Some(mut screen) = self.trimmer.take() {
            screen.session_mut().stop();
            log::info!("[Audio Trimmer App] Back to settings");
        }
    }
}

impl eframe::App for AudioTrimmerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| match self.trimmer.as_mut() {
            Some(screen) => {
                if screen.show(ui) {
                    self.close_trimmer();
                }
            }
            None => {
                if self.settings.show(ui) {
                    self.open_trimmer(ctx);
                }
            }
        });
    }
}
