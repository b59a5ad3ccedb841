//! Application entry point — vision-assist console harness.
//!
//! Runs the detection orchestrator outside the AR engine: frames come
//! from the synthetic source, triggers from stdin, and the UI snapshot
//! is printed instead of rendered.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the vision client from config (stub when no API key).
//! 5. Build the depth-frame store and speech controller.
//! 6. Spawn the detection orchestrator.
//! 7. Read commands from stdin until `quit`.
//!
//! # Commands
//!
//! | Input            | Effect                                   |
//! |------------------|------------------------------------------|
//! | *(empty line)*   | trigger detection with the default prompt |
//! | `detect <text>`  | trigger detection with `<text>`           |
//! | `say <id>`       | speak the grid button with that id        |
//! | `grid`           | print the current word grid               |
//! | `labels`         | print the detected-object entries as JSON |
//! | `ui`             | print the UI state snapshot               |
//! | `quit`           | exit                                      |

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use vision_assist::{
    config::AppConfig,
    depth::{CameraImage, DepthCache, FrameStore, SyntheticFrameSource},
    detection::{
        new_shared_ui_state, DetectionOrchestrator, DetectorEvent, LabelListener, LogOverlay,
        SharedUiState, UiResponseSink, UiWorldLabelSink,
    },
    grid::WordGrid,
    labels::LabelFanout,
    speech::{ApiSpeechSynthesizer, SpeechController, SpeechSynthesizer},
    vision::{ApiVisionClient, DetectionResponse, VisionClient, VisionError},
};

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("vision-assist starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (2 workers — vision + speech requests)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    rt.block_on(run(config))
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    // 4. Vision client — degrade to a stub when no API key is configured
    //    so the harness still launches.
    let vision: Arc<dyn VisionClient> = match config.vision.api_key.as_deref() {
        Some(key) if !key.is_empty() => {
            log::info!("vision client ready: {}", config.vision.model);
            Arc::new(ApiVisionClient::from_config(&config.vision))
        }
        _ => {
            log::warn!("no vision API key configured — detection will report an error");
            Arc::new(UnconfiguredVision)
        }
    };

    // 5. Depth store + speech controller
    let depth: Arc<dyn DepthCache> = Arc::new(FrameStore::new(Box::new(SyntheticFrameSource::new(
        config.depth.width,
        config.depth.height,
        config.depth.focal_px,
        config.depth.plane_depth,
    ))));

    let synth: Arc<dyn SpeechSynthesizer> =
        Arc::new(ApiSpeechSynthesizer::from_config(&config.speech));
    let speech = SpeechController::new(Some(synth), config.speech.clone());
    speech.preview().await;

    // Word grid + label fan-out
    let grid = Arc::new(Mutex::new(WordGrid::new(config.grid.clone())));
    let fanout = Arc::new(LabelFanout::new(
        Some(Arc::clone(&grid)),
        config.detection.watchlist.clone(),
    ));

    // 6. Orchestrator
    let ui = new_shared_ui_state();
    let (events_tx, events_rx) = mpsc::channel::<DetectorEvent>(16);

    let mut orchestrator = DetectionOrchestrator::new(
        ui.clone(),
        depth,
        vision,
        Arc::new(UiResponseSink::new(ui.clone())),
        Arc::new(UiWorldLabelSink::new(ui.clone())),
        &events_tx,
        &config.detection,
    )
    .with_overlay(Arc::new(LogOverlay));
    orchestrator.add_label_listener(Arc::clone(&fanout) as Arc<dyn LabelListener>);

    let orchestrator_task = tokio::spawn(orchestrator.run(events_rx));

    // 7. stdin command loop
    println!("vision-assist console — empty line triggers detection, `quit` exits");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        match line.as_str() {
            "quit" | "exit" => break,
            "" => {
                events_tx
                    .send(DetectorEvent::Trigger { prompt: None })
                    .await
                    .ok();
            }
            "grid" => print_grid(&grid),
            "labels" => match fanout.to_json() {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("label export failed: {e}"),
            },
            "ui" => print_ui(&ui),
            other => {
                if let Some(prompt) = other.strip_prefix("detect ") {
                    events_tx
                        .send(DetectorEvent::Trigger {
                            prompt: Some(prompt.to_string()),
                        })
                        .await
                        .ok();
                } else if let Some(id) = other.strip_prefix("say ") {
                    say(&grid, &speech, id).await;
                } else {
                    println!("unknown command: {other:?}");
                }
            }
        }
    }

    // Close the channel; the orchestrator drains any in-flight completion
    // and shuts down.
    drop(events_tx);
    orchestrator_task.await?;
    Ok(())
}

/// Speak the prompt of grid button `id`.
async fn say(grid: &Arc<Mutex<WordGrid>>, speech: &SpeechController, id: &str) {
    let Ok(id) = id.parse::<u64>() else {
        println!("say: expected a numeric button id");
        return;
    };

    let button = grid.lock().unwrap().tap(id).cloned();
    match button {
        Some(button) => {
            println!("[{}] {} — {:?}", button.id, button.word, button.prompt);
            if speech.speak(&button.prompt).await.is_none() {
                println!("(no audio)");
            }
        }
        None => println!("no button with id {id}"),
    }
}

fn print_grid(grid: &Arc<Mutex<WordGrid>>) {
    let grid = grid.lock().unwrap();
    for (button, pos) in grid.buttons().iter().zip(grid.positions()) {
        println!(
            "[{:>2}] {:<10} at ({:+.1}, {:+.1}, {:+.1})",
            button.id, button.word, pos[0], pos[1], pos[2]
        );
    }
}

fn print_ui(ui: &SharedUiState) {
    let ui = ui.lock().unwrap();
    println!(
        "state: {:?}  trigger_enabled: {}  loading: {}  prompt: {:?}",
        ui.detector, ui.trigger_enabled, ui.loading, ui.prompt_text
    );
    if let Some(message) = &ui.response_message {
        println!("response: {message:?}");
    }
    for label in &ui.world_labels {
        println!(
            "label: {:?} at {} arrow={}",
            label.text, label.position, label.show_arrow
        );
    }
}

// ---------------------------------------------------------------------------
// UnconfiguredVision — fallback VisionClient when no API key is present
// ---------------------------------------------------------------------------

struct UnconfiguredVision;

#[async_trait]
impl VisionClient for UnconfiguredVision {
    async fn request(
        &self,
        _image: &CameraImage,
        _prompt: &str,
    ) -> Result<DetectionResponse, VisionError> {
        Err(VisionError::NotConfigured)
    }
}
