use audio_trimmer::audio_trimmer_app;
use eframe::egui;

fn main() -> eframe::Result {
    // RUST_LOG=debug also shows tick source start and cancel
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let window_options = eframe::NativeOptions {
        // Viewport is an area in which the objects are going to be rendered (i.e. native window)
        viewport: egui::ViewportBuilder::default()
            .with_min_inner_size([420.0, 560.0])
            .with_inner_size([480.0, 640.0]),
        ..Default::default()
    };

    log::info!("[Audio Trimmer] Starting up");
    eframe::run_native(
        "Audio Trimmer",
        window_options,
        Box::new(|_cc| Ok(Box::<audio_trimmer_app::AudioTrimmerApp>::default())),
    )
}
