use anyhow::{anyhow, Result};
use cueline::scene::SceneStore;
use cueline::segment::{SegmentConfig, SegmentPipeline};
use cueline::ui::{AppState, CuelineApp};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cueline=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cueline rehearsal partner");

    let store_path = SceneStore::default_path().map_err(|e| anyhow!(e))?;
    let clip_dir = store_path
        .parent()
        .map(|p| p.join("clips"))
        .unwrap_or_else(|| "clips".into());
    let store = SceneStore::open(store_path);

    let mut state = AppState::new(store, clip_dir);

    // Segmentation worker; a missing API key surfaces per attempt, not here
    let pipeline = SegmentPipeline::new(SegmentConfig::default());
    let command_tx = pipeline.command_sender();
    let event_rx = pipeline.event_receiver();
    pipeline.start_worker().map_err(|e| anyhow!(e))?;
    state.connect_pipeline(command_tx, event_rx);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 860.0])
            .with_min_inner_size([400.0, 600.0])
            .with_title("Cueline"),
        ..Default::default()
    };

    eframe::run_native(
        "cueline",
        native_options,
        Box::new(|cc| Ok(Box::new(CuelineApp::new(cc, state)))),
    )
    .map_err(|e| {
        warn!("eframe exited with error: {}", e);
        anyhow!("{}", e)
    })
}
