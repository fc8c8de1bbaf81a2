pub mod audio_trimmer_app;
pub mod session;
pub mod settings;
pub mod tick_thread;
pub mod time_format;
pub mod trimmer;
pub mod trimmer_view;
