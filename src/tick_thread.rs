use eframe::egui;
use std::sync::mpsc::{RecvTimeoutError, Sender};
use std::time::Duration;

/// Identifies one tick source, so ticks sent before a cancellation can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickSourceId(pub u64);

/// Struct that owns and controls a thread, that drives the simulated playback clock.
///
/// The thread sends its [TickSourceId] on the ticks channel once per interval. Dropping the
/// [TickThread] cancels it: the drop only returns after the thread has exited, so nothing is sent
/// by this source afterwards.
pub struct TickThread {
    id: TickSourceId,
    /// Thread handle, wrapped in [Option] for joining when [TickThread] is dropped.
    thread_handle: Option<std::thread::JoinHandle<()>>,
    /// Dropping this sender wakes the thread up and makes it exit.
    stop_sender: Option<Sender<()>>,
}

impl TickThread {
    /// Creates new [TickThread] object with a spawned ticking thread.
    ///
    /// # Parameters
    ///
    /// * `id` - identifier sent with every tick.
    /// * `interval` - time between two ticks.
    /// * `ticks_sender` - channel the ticks are delivered to.
    /// * `ui_ctx` - UI context handle, used to force UI repainting after every tick.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to create a thread.
    pub fn spawn(
        id: TickSourceId,
        interval: Duration,
        ticks_sender: Sender<TickSourceId>,
        ui_ctx: &egui::Context,
    ) -> Self {
        let (stop_sender, stop_receiver) = std::sync::mpsc::channel::<()>();
        let ui_ctx = ui_ctx.clone();

        let thread_handle = std::thread::Builder::new()
            .name(format!("tick-source-{}", id.0))
            .spawn(move || loop {
                match stop_receiver.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if ticks_sender.send(id).is_err() {
                            // Session is gone
                            return;
                        }
                        ui_ctx.request_repaint();
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
                }
            })
            .expect("failed to spawn tick thread");

        log::debug!("[Tick Thread] source {} started", id.0);

        Self {
            id,
            thread_handle: Some(thread_handle),
            stop_sender: Some(stop_sender),
        }
    }

    pub fn id(&self) -> TickSourceId {
        self.id
    }
}

impl Drop for TickThread {
    fn drop(&mut self) {
        // Closing the stop channel interrupts the wait between ticks
        drop(self.stop_sender.take());

        if let Some(thread) = self.thread_handle.take() {
            if thread.join().is_err() {
                log::warn!("[Tick Thread] source {} panicked", self.id.0);
            }
        }
        log::debug!("[Tick Thread] source {} cancelled", self.id.0);
    }
}
