mod chart;
mod plot;
mod render;
mod state;
mod store;

use eframe::egui;
use freqscope_messages::{ClientConfig, Event};
use freqscope_stream::StreamClient;

pub use chart::{AxisOptions, ChartBackend, ChartSpec, SERIES_LABEL, X_AXIS_TITLE, Y_AXIS_TITLE};
pub use plot::{PlotBackend, PlotChart};
pub use render::RenderTrigger;
pub use state::UiState;
pub use store::SnapshotStore;

pub const TITLE: &str = "Audio Frequency Visualizer";

/// Events buffered between frames before the stream worker starts dropping them.
const EVENT_QUEUE_DEPTH: usize = 64;

/// Main application struct implementing the egui App trait.
///
/// Starts the stream client when created and stops it when dropped.
pub struct FreqScopeApp {
    /// Receiver for events from the stream worker
    event_rx: flume::Receiver<Event>,

    client: StreamClient,

    /// Local application state
    state: UiState<PlotBackend>,
}

impl FreqScopeApp {
    pub fn new(ctx: &egui::Context, config: ClientConfig) -> Self {
        let (event_tx, event_rx) = flume::bounded(EVENT_QUEUE_DEPTH);
        let mut client = StreamClient::websocket(config, event_tx);
        client.start();

        Self {
            event_rx,
            client,
            state: UiState::new(PlotBackend::new(ctx.clone())),
        }
    }
}

impl eframe::App for FreqScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply everything that arrived since the last frame
        self.state.handle_events(self.event_rx.try_iter());

        // Always request continuous repainting for streaming data
        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(TITLE);
            ui.separator();

            let trigger = self.state.trigger();
            match trigger.live() {
                // A stale chart stays up while reconnecting.
                Some(chart) => {
                    ui.add(chart);
                }
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.label(format!(
                            "Waiting for spectrum data from {} ({})...",
                            self.client.config().endpoint,
                            self.state.connection()
                        ));
                    });
                }
            }
        });
    }
}

impl Drop for FreqScopeApp {
    fn drop(&mut self) {
        self.client.stop();
    }
}

/// Entry point for the UI module.
///
/// Runs the eframe application on the main thread (blocking).
pub fn run(config: ClientConfig) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_title(TITLE),
        ..Default::default()
    };

    eframe::run_native(
        "FreqScope",
        options,
        Box::new(move |cc| Ok(Box::new(FreqScopeApp::new(&cc.egui_ctx, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
