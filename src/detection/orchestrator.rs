//! Detection orchestrator — drives the full trigger → capture → vision →
//! fan-out cycle.
//!
//! [`DetectionOrchestrator`] owns the [`SharedUiState`] and responds to
//! [`DetectorEvent`]s received over a `tokio::sync::mpsc` channel.
//!
//! # Cycle flow
//!
//! ```text
//! DetectorEvent::Trigger
//!   ├─ in flight?          → drop (logged; no capture, no request)
//!   └─ accept              → busy UI, clear bubble + labels,
//!                            capture (frame id + image),
//!                            spawn vision request task
//!
//! DetectorEvent::VisionCompleted(outcome)    [re-injected by the task]
//!   ├─ restore idle UI
//!   ├─ Ok  → bubble message, per-point world resolution → label sink,
//!   │        dispose frame, emit label list to listeners
//!   └─ Err → dispose frame (nothing emitted)
//! ```
//!
//! The vision request runs as a spawned task whose completion comes back
//! through the same event channel, so the run loop never blocks: a
//! trigger arriving mid-cycle is observed and dropped rather than queued
//! behind the outstanding request. The frame id obtained at capture is
//! disposed exactly once per accepted cycle, on success, failure, and
//! empty point lists alike.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::DetectionConfig;
use crate::depth::{DepthCache, FrameId};
use crate::vision::{DetectionResponse, VisionClient, VisionError};

use super::consumers::{LabelListener, PointOverlay, ResponseSink, WorldLabelSink};
use super::state::{DetectorState, SharedUiState, PROMPT_BUSY, PROMPT_IDLE};

// ---------------------------------------------------------------------------
// DetectorEvent
// ---------------------------------------------------------------------------

/// Events driving the orchestrator's state machine.
#[derive(Debug)]
pub enum DetectorEvent {
    /// A detection trigger from any input source (tap, key, controller
    /// button). `None` means "use the configured default prompt".
    Trigger { prompt: Option<String> },

    /// The outstanding vision request finished. Sent by the request task,
    /// never by external input sources.
    VisionCompleted(Result<DetectionResponse, VisionError>),
}

// ---------------------------------------------------------------------------
// DetectionOrchestrator
// ---------------------------------------------------------------------------

/// One accepted cycle's state: the frame id to resolve against and
/// dispose when the cycle ends.
struct ActiveCycle {
    frame_id: FrameId,
}

/// Sequences exactly one outstanding detection cycle end-to-end.
///
/// Create with [`DetectionOrchestrator::new`], wire consumers, then call
/// [`run`](Self::run) inside a tokio task.
pub struct DetectionOrchestrator {
    ui: SharedUiState,
    depth: Arc<dyn DepthCache>,
    vision: Arc<dyn VisionClient>,
    response_sink: Arc<dyn ResponseSink>,
    label_sink: Arc<dyn WorldLabelSink>,
    overlay: Option<Arc<dyn PointOverlay>>,
    listeners: Vec<Arc<dyn LabelListener>>,
    /// Weak so the run loop ends when all external senders are gone; an
    /// in-flight request task holds a strong clone until its completion
    /// is delivered.
    events: mpsc::WeakSender<DetectorEvent>,
    default_prompt: String,
    show_debug_visuals: bool,
    cycle: Option<ActiveCycle>,
}

impl DetectionOrchestrator {
    /// Create a new orchestrator.
    ///
    /// # Arguments
    ///
    /// * `ui`            — shared UI state (also read by the host renderer).
    /// * `depth`         — depth-frame cache (capture / resolve / dispose).
    /// * `vision`        — vision-language client.
    /// * `response_sink` — response bubble consumer.
    /// * `label_sink`    — world-anchored label consumer.
    /// * `events_tx`     — sender side of the channel later passed to
    ///   [`run`](Self::run); completions are re-injected through it.
    /// * `config`        — default prompt + debug-visuals flag.
    pub fn new(
        ui: SharedUiState,
        depth: Arc<dyn DepthCache>,
        vision: Arc<dyn VisionClient>,
        response_sink: Arc<dyn ResponseSink>,
        label_sink: Arc<dyn WorldLabelSink>,
        events_tx: &mpsc::Sender<DetectorEvent>,
        config: &DetectionConfig,
    ) -> Self {
        Self {
            ui,
            depth,
            vision,
            response_sink,
            label_sink,
            overlay: None,
            listeners: Vec::new(),
            events: events_tx.downgrade(),
            default_prompt: config.default_prompt.clone(),
            show_debug_visuals: config.show_debug_visuals,
            cycle: None,
        }
    }

    /// Attach a debug point overlay. Only consulted when debug visuals
    /// are enabled in config.
    pub fn with_overlay(mut self, overlay: Arc<dyn PointOverlay>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Register a listener for the label-detected event. Listeners are
    /// notified in registration order.
    pub fn add_label_listener(&mut self, listener: Arc<dyn LabelListener>) {
        self.listeners.push(listener);
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the orchestrator until `events_rx` is closed.
    ///
    /// Should be spawned as a tokio task. Returns once every sender is
    /// dropped and any in-flight completion has been processed.
    pub async fn run(mut self, mut events_rx: mpsc::Receiver<DetectorEvent>) {
        while let Some(event) = events_rx.recv().await {
            match event {
                DetectorEvent::Trigger { prompt } => self.handle_trigger(prompt),
                DetectorEvent::VisionCompleted(outcome) => self.handle_completion(outcome),
            }
        }

        log::info!("detector: event channel closed, orchestrator shutting down");
    }

    // -----------------------------------------------------------------------
    // Event handlers
    // -----------------------------------------------------------------------

    /// Handle a trigger: accept it and dispatch a vision request, or drop
    /// it when a cycle is already in flight.
    fn handle_trigger(&mut self, prompt: Option<String>) {
        if self.cycle.is_some() {
            // Backpressure policy: drop, don't queue. The vision request
            // and the depth buffer are single-consumer.
            log::info!("detector: request already running — trigger dropped");
            return;
        }

        let prompt = prompt.unwrap_or_else(|| self.default_prompt.clone());
        log::info!("detector: making request: {prompt:?}");

        // Busy affordance and teardown of the previous cycle's results —
        // stale state must never be visible next to an in-flight request.
        self.set_busy_ui();
        self.response_sink.clear();
        self.label_sink.clear_labels();

        // Frame id and camera image must come from the same capture so
        // resolution stays consistent with what the model saw.
        let (frame_id, image) = match self.depth.capture() {
            Ok(pair) => pair,
            Err(e) => {
                log::error!("detector: frame capture failed: {e}");
                self.restore_idle_ui();
                return;
            }
        };
        self.cycle = Some(ActiveCycle { frame_id });

        if self.show_debug_visuals {
            if let Some(overlay) = &self.overlay {
                overlay.show_camera_frame(&image);
            }
        }

        let Some(events_tx) = self.events.upgrade() else {
            // Channel already closing down; nobody would deliver the
            // completion, so end the cycle here.
            log::warn!("detector: event channel gone — cycle abandoned");
            self.cycle = None;
            self.depth.dispose(frame_id);
            self.restore_idle_ui();
            return;
        };

        let vision = Arc::clone(&self.vision);
        tokio::spawn(async move {
            let outcome = vision.request(&image, &prompt).await;
            if events_tx
                .send(DetectorEvent::VisionCompleted(outcome))
                .await
                .is_err()
            {
                log::warn!("detector: completion could not be delivered");
            }
        });

        log::debug!("detector: request dispatched for {frame_id}");
    }

    /// Handle the completion of the outstanding vision request.
    fn handle_completion(&mut self, outcome: Result<DetectionResponse, VisionError>) {
        let Some(cycle) = self.cycle.take() else {
            log::warn!("detector: completion without an active cycle — ignored");
            return;
        };

        // The trigger affordance comes back before results render, never
        // after an unbounded delay.
        self.restore_idle_ui();

        match outcome {
            Ok(response) => self.fan_out(cycle, response),
            Err(e) => {
                log::warn!("detector: vision request failed: {e}");
                self.depth.dispose(cycle.frame_id);
            }
        }
    }

    /// Success path: bubble message, per-point world anchoring, frame
    /// disposal, label-event emission.
    fn fan_out(&mut self, cycle: ActiveCycle, response: DetectionResponse) {
        log::info!("detector: {} points returned", response.points.len());

        self.response_sink.open_message(&response.message);

        for point in &response.points {
            if self.show_debug_visuals {
                if let Some(overlay) = &self.overlay {
                    overlay.mark_point(point.pixel);
                }
            }

            // A resolution miss skips world-anchoring for this point only.
            match self.depth.resolve_world(cycle.frame_id, point.pixel) {
                Some(world) => {
                    self.label_sink
                        .spawn_label(&point.label, world, point.show_arrow)
                }
                None => log::debug!(
                    "detector: no depth at ({:.1}, {:.1}) for {:?}",
                    point.pixel.x,
                    point.pixel.y,
                    point.label
                ),
            }
        }

        // All resolutions for this cycle are done — release the frame.
        self.depth.dispose(cycle.frame_id);

        // Flat ordered label list, duplicates preserved, one emission per
        // completed cycle. Independent of world resolution above.
        let labels: Vec<String> = response.points.iter().map(|p| p.label.clone()).collect();
        for listener in &self.listeners {
            listener.on_labels_detected(&labels);
        }
        log::info!("detector: detected objects: {}", labels.join(", "));
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn set_busy_ui(&self) {
        let mut ui = self.ui.lock().unwrap();
        ui.detector = DetectorState::InFlight;
        ui.trigger_enabled = false;
        ui.loading = true;
        ui.prompt_text = PROMPT_BUSY.into();
    }

    fn restore_idle_ui(&self) {
        let mut ui = self.ui.lock().unwrap();
        ui.detector = DetectorState::Idle;
        ui.trigger_enabled = true;
        ui.loading = false;
        ui.prompt_text = PROMPT_IDLE.into();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::depth::{CameraImage, DepthError, PixelPos, WorldPoint};
    use crate::detection::consumers::{UiResponseSink, UiWorldLabelSink};
    use crate::detection::state::new_shared_ui_state;
    use crate::vision::DetectedPoint;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Depth cache double that records captures, disposals, and any
    /// resolution attempted after disposal.
    struct MockDepth {
        inner: Mutex<MockDepthInner>,
        /// Pixel (rounded) → world position; pixels not present resolve
        /// to `None`.
        depth_at: HashMap<(i32, i32), WorldPoint>,
    }

    struct MockDepthInner {
        next_id: u64,
        live: Vec<FrameId>,
        captures: usize,
        disposals: Vec<FrameId>,
        resolved_after_dispose: usize,
    }

    impl MockDepth {
        fn new(depth_at: HashMap<(i32, i32), WorldPoint>) -> Self {
            Self {
                inner: Mutex::new(MockDepthInner {
                    next_id: 1,
                    live: Vec::new(),
                    captures: 0,
                    disposals: Vec::new(),
                    resolved_after_dispose: 0,
                }),
                depth_at,
            }
        }

        fn captures(&self) -> usize {
            self.inner.lock().unwrap().captures
        }

        fn disposals(&self) -> Vec<FrameId> {
            self.inner.lock().unwrap().disposals.clone()
        }

        fn resolved_after_dispose(&self) -> usize {
            self.inner.lock().unwrap().resolved_after_dispose
        }
    }

    impl DepthCache for MockDepth {
        fn capture(&self) -> Result<(FrameId, CameraImage), DepthError> {
            let mut inner = self.inner.lock().unwrap();
            let id = FrameId::from_raw(inner.next_id);
            inner.next_id += 1;
            inner.captures += 1;
            inner.live.push(id);
            Ok((id, CameraImage::solid(4, 4, [0, 0, 0, 255])))
        }

        fn resolve_world(&self, id: FrameId, pixel: PixelPos) -> Option<WorldPoint> {
            let mut inner = self.inner.lock().unwrap();
            if !inner.live.contains(&id) {
                inner.resolved_after_dispose += 1;
                return None;
            }
            self.depth_at
                .get(&(pixel.x.round() as i32, pixel.y.round() as i32))
                .copied()
        }

        fn dispose(&self, id: FrameId) {
            let mut inner = self.inner.lock().unwrap();
            inner.live.retain(|live| *live != id);
            inner.disposals.push(id);
        }
    }

    /// Vision double that returns a canned outcome and counts calls.
    struct MockVision {
        outcome: Mutex<Option<Result<DetectionResponse, VisionError>>>,
        calls: Mutex<usize>,
    }

    impl MockVision {
        fn ok(response: DetectionResponse) -> Self {
            Self {
                outcome: Mutex::new(Some(Ok(response))),
                calls: Mutex::new(0),
            }
        }

        fn err(error: VisionError) -> Self {
            Self {
                outcome: Mutex::new(Some(Err(error))),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl VisionClient for MockVision {
        async fn request(
            &self,
            _image: &CameraImage,
            _prompt: &str,
        ) -> Result<DetectionResponse, VisionError> {
            *self.calls.lock().unwrap() += 1;
            self.outcome
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(VisionError::EmptyResponse))
        }
    }

    /// Label listener double that records each emission.
    #[derive(Default)]
    struct RecordingListener {
        events: Mutex<Vec<Vec<String>>>,
    }

    impl RecordingListener {
        fn events(&self) -> Vec<Vec<String>> {
            self.events.lock().unwrap().clone()
        }
    }

    impl LabelListener for RecordingListener {
        fn on_labels_detected(&self, labels: &[String]) {
            self.events.lock().unwrap().push(labels.to_vec());
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn point(label: &str, x: f32, y: f32, show_arrow: bool) -> DetectedPoint {
        DetectedPoint {
            label: label.into(),
            pixel: PixelPos::new(x, y),
            show_arrow,
        }
    }

    struct Harness {
        ui: SharedUiState,
        depth: Arc<MockDepth>,
        vision: Arc<MockVision>,
        listener: Arc<RecordingListener>,
        tx: mpsc::Sender<DetectorEvent>,
        orchestrator: DetectionOrchestrator,
        rx: mpsc::Receiver<DetectorEvent>,
    }

    fn harness(
        vision: MockVision,
        depth_at: HashMap<(i32, i32), WorldPoint>,
    ) -> Harness {
        let ui = new_shared_ui_state();
        let depth = Arc::new(MockDepth::new(depth_at));
        let vision = Arc::new(vision);
        let listener = Arc::new(RecordingListener::default());
        let (tx, rx) = mpsc::channel(16);

        let mut orchestrator = DetectionOrchestrator::new(
            ui.clone(),
            depth.clone() as Arc<dyn DepthCache>,
            vision.clone() as Arc<dyn VisionClient>,
            Arc::new(UiResponseSink::new(ui.clone())),
            Arc::new(UiWorldLabelSink::new(ui.clone())),
            &tx,
            &DetectionConfig::default(),
        );
        orchestrator.add_label_listener(listener.clone() as Arc<dyn LabelListener>);

        Harness {
            ui,
            depth,
            vision,
            listener,
            tx,
            orchestrator,
            rx,
        }
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    /// The scenario from the design discussion: two points, depth hit on
    /// the first, miss on the second.
    #[tokio::test]
    async fn full_cycle_fans_out_and_disposes_once() {
        let response = DetectionResponse {
            message: "I see a book and a phone".into(),
            points: vec![point("book", 10.0, 20.0, true), point("phone", 30.0, 40.0, false)],
        };
        let mut depth_at = HashMap::new();
        depth_at.insert((10, 20), WorldPoint::new(0.1, 0.2, 1.0));
        // (30, 40) deliberately absent — resolution miss.

        let h = harness(MockVision::ok(response), depth_at);

        h.tx.send(DetectorEvent::Trigger { prompt: None }).await.unwrap();
        drop(h.tx);
        h.orchestrator.run(h.rx).await;

        // Response bubble received the message.
        let ui = h.ui.lock().unwrap();
        assert_eq!(
            ui.response_message.as_deref(),
            Some("I see a book and a phone")
        );

        // Exactly one world label: the resolvable point.
        assert_eq!(ui.world_labels.len(), 1);
        assert_eq!(ui.world_labels[0].text, "book");
        assert_eq!(ui.world_labels[0].position, WorldPoint::new(0.1, 0.2, 1.0));
        assert!(ui.world_labels[0].show_arrow);

        // In-flight flag cleared, affordance restored.
        assert_eq!(ui.detector, DetectorState::Idle);
        assert!(ui.trigger_enabled);
        assert!(!ui.loading);
        drop(ui);

        // The label event still carries all labels, in response order.
        assert_eq!(
            h.listener.events(),
            vec![vec!["book".to_string(), "phone".to_string()]]
        );

        // Frame disposed exactly once and never read after disposal.
        assert_eq!(h.depth.disposals().len(), 1);
        assert_eq!(h.depth.resolved_after_dispose(), 0);
    }

    /// A trigger arriving while a cycle is in flight is dropped: no
    /// capture, no vision call, busy UI untouched.
    #[tokio::test]
    async fn second_trigger_while_in_flight_is_dropped() {
        let response = DetectionResponse {
            message: "ok".into(),
            points: vec![],
        };
        let h = harness(MockVision::ok(response), HashMap::new());

        // Both triggers are queued before the run loop starts, so the
        // second is handled while the first cycle is still in flight.
        h.tx.send(DetectorEvent::Trigger { prompt: None }).await.unwrap();
        h.tx.send(DetectorEvent::Trigger { prompt: None }).await.unwrap();
        drop(h.tx);
        h.orchestrator.run(h.rx).await;

        assert_eq!(h.depth.captures(), 1);
        assert_eq!(h.vision.calls(), 1);
        assert_eq!(h.depth.disposals().len(), 1);
    }

    /// An empty point list still disposes the frame and still emits the
    /// (empty) label event.
    #[tokio::test]
    async fn empty_point_list_still_disposes() {
        let response = DetectionResponse {
            message: "nothing recognizable".into(),
            points: vec![],
        };
        let h = harness(MockVision::ok(response), HashMap::new());

        h.tx.send(DetectorEvent::Trigger { prompt: None }).await.unwrap();
        drop(h.tx);
        h.orchestrator.run(h.rx).await;

        assert_eq!(h.depth.disposals().len(), 1);
        assert_eq!(h.listener.events(), vec![Vec::<String>::new()]);
        assert!(h.ui.lock().unwrap().world_labels.is_empty());
    }

    /// Vision failure: idle UI restored, frame disposed exactly once, no
    /// label event emitted.
    #[tokio::test]
    async fn vision_failure_disposes_and_emits_nothing() {
        let h = harness(
            MockVision::err(VisionError::Request("connection refused".into())),
            HashMap::new(),
        );

        h.tx.send(DetectorEvent::Trigger { prompt: None }).await.unwrap();
        drop(h.tx);
        h.orchestrator.run(h.rx).await;

        let ui = h.ui.lock().unwrap();
        assert_eq!(ui.detector, DetectorState::Idle);
        assert!(ui.trigger_enabled);
        assert!(ui.response_message.is_none());
        drop(ui);

        assert_eq!(h.depth.disposals().len(), 1);
        assert!(h.listener.events().is_empty());
    }

    /// Duplicate labels in the response are preserved in the label event.
    #[tokio::test]
    async fn label_event_preserves_duplicates_and_order() {
        let response = DetectionResponse {
            message: "books everywhere".into(),
            points: vec![
                point("book", 1.0, 1.0, false),
                point("phone", 2.0, 2.0, false),
                point("book", 3.0, 3.0, false),
            ],
        };
        let h = harness(MockVision::ok(response), HashMap::new());

        h.tx.send(DetectorEvent::Trigger { prompt: None }).await.unwrap();
        drop(h.tx);
        h.orchestrator.run(h.rx).await;

        assert_eq!(
            h.listener.events(),
            vec![vec![
                "book".to_string(),
                "phone".to_string(),
                "book".to_string()
            ]]
        );
    }

    /// Accepting a trigger enters the busy state and clears previous
    /// results before anything new can arrive.
    #[tokio::test]
    async fn accepted_trigger_enters_busy_state_and_clears_results() {
        let ui = new_shared_ui_state();
        ui.lock().unwrap().response_message = Some("stale".into());

        let depth = Arc::new(MockDepth::new(HashMap::new()));
        let vision = Arc::new(MockVision::ok(DetectionResponse {
            message: "m".into(),
            points: vec![],
        }));
        let (tx, _rx) = mpsc::channel(16);

        let mut orchestrator = DetectionOrchestrator::new(
            ui.clone(),
            depth.clone() as Arc<dyn DepthCache>,
            vision as Arc<dyn VisionClient>,
            Arc::new(UiResponseSink::new(ui.clone())),
            Arc::new(UiWorldLabelSink::new(ui.clone())),
            &tx,
            &DetectionConfig::default(),
        );

        orchestrator.handle_trigger(None);

        let state = ui.lock().unwrap();
        assert_eq!(state.detector, DetectorState::InFlight);
        assert!(!state.trigger_enabled);
        assert!(state.loading);
        assert_eq!(state.prompt_text, PROMPT_BUSY);
        assert!(state.response_message.is_none(), "stale bubble must be cleared");
    }

    /// Two sequential cycles: the second trigger arrives after the first
    /// completion, so both run — and the frame ids differ.
    #[tokio::test]
    async fn sequential_cycles_both_run() {
        let ui = new_shared_ui_state();
        let depth = Arc::new(MockDepth::new(HashMap::new()));
        let listener = Arc::new(RecordingListener::default());
        let (tx, rx) = mpsc::channel(16);

        // A vision double that succeeds on every call.
        struct AlwaysOk;
        #[async_trait]
        impl VisionClient for AlwaysOk {
            async fn request(
                &self,
                _image: &CameraImage,
                _prompt: &str,
            ) -> Result<DetectionResponse, VisionError> {
                Ok(DetectionResponse {
                    message: "ok".into(),
                    points: vec![],
                })
            }
        }

        let mut orchestrator = DetectionOrchestrator::new(
            ui.clone(),
            depth.clone() as Arc<dyn DepthCache>,
            Arc::new(AlwaysOk),
            Arc::new(UiResponseSink::new(ui.clone())),
            Arc::new(UiWorldLabelSink::new(ui.clone())),
            &tx,
            &DetectionConfig::default(),
        );
        orchestrator.add_label_listener(listener.clone() as Arc<dyn LabelListener>);

        let run = tokio::spawn(orchestrator.run(rx));

        tx.send(DetectorEvent::Trigger { prompt: None }).await.unwrap();

        // Wait for the first cycle to finish before triggering again.
        for _ in 0..100 {
            if !listener.events().is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(listener.events().len(), 1, "first cycle did not complete");

        tx.send(DetectorEvent::Trigger { prompt: None }).await.unwrap();
        drop(tx);
        run.await.unwrap();

        assert_eq!(listener.events().len(), 2);
        assert_eq!(depth.captures(), 2);
        let disposals = depth.disposals();
        assert_eq!(disposals.len(), 2);
        assert_ne!(disposals[0], disposals[1]);
    }
}
