//! The viewer: owns the animation state and routes input and ticks to the
//! tracker, scheduler and compositor.

use turntable_common::config::ViewerConfig;
use turntable_common::error::TurntableResult;
use turntable_model::event::{EventKind, InputEvent};

use crate::compositor::{Compositor, FrameObserver};
use crate::frame_store::{normalize_frame, FrameStore, LoadProgress};
use crate::scheduler::{AnimationScheduler, TickOutcome};
use crate::source::{DetectorSource, DragSource, PointerInput, PositionSource};
use crate::state::AnimationState;
use crate::tracker::{PointerTracker, PositionSample};

/// A 360° viewer over a sequence of assets of type `A`.
pub struct Viewer<A> {
    config: ViewerConfig,
    store: FrameStore<A>,
    state: AnimationState,
    tracker: PointerTracker,
    scheduler: AnimationScheduler,
    compositor: Compositor,
    sources: Vec<Box<dyn PositionSource>>,
    ready: bool,
}

impl<A> Viewer<A> {
    /// Create a viewer for a surface `track_width` pixels wide.
    ///
    /// Drag and detector sources are installed by default.
    pub fn new(config: ViewerConfig, track_width: f64) -> TurntableResult<Self> {
        config.validate()?;
        let tracker = PointerTracker::new(&config, track_width)?;
        let sources: Vec<Box<dyn PositionSource>> = vec![
            Box::new(DragSource),
            Box::new(DetectorSource::new(config.detector_scale)),
        ];

        Ok(Self {
            store: FrameStore::new(config.total_frames),
            state: AnimationState::default(),
            tracker,
            scheduler: AnimationScheduler::new(&config),
            compositor: Compositor::new(config.total_frames),
            sources,
            ready: false,
            config,
        })
    }

    /// Add another position source, consulted after the built-in ones.
    pub fn add_source(&mut self, source: impl PositionSource + 'static) {
        self.sources.push(Box::new(source));
    }

    /// Subscribe to frame changes.
    pub fn subscribe(&mut self, observer: impl FrameObserver + 'static) {
        self.compositor.subscribe(observer);
    }

    /// Store a loaded asset. The load that fills the last slot makes the
    /// viewer ready, shows frame 0 and starts the intro spin.
    pub fn load_frame(&mut self, index: usize, asset: A) -> TurntableResult<LoadProgress> {
        let progress = self.store.load(index, asset)?;
        tracing::debug!(
            loaded = progress.loaded,
            total = progress.total,
            percent = progress.percent(),
            "Frame loaded"
        );
        if progress.is_complete() && !self.ready {
            self.on_load_complete();
        }
        Ok(progress)
    }

    fn on_load_complete(&mut self) {
        self.ready = true;
        self.compositor.reveal();
        self.state.target_frame = self.config.intro_spin_frames;
        let spinning = self.scheduler.request_start(&mut self.state);
        tracing::info!(
            frames = self.store.len(),
            intro_spin = self.config.intro_spin_frames,
            spinning,
            "Sequence loaded, viewer ready"
        );
    }

    /// Route a raw input event. Returns whether it moved the target frame
    /// or changed drag/surface state.
    ///
    /// Resize events apply at any time, including before the sequence has
    /// loaded, since the surface is laid out before the frames arrive. All
    /// other events pass through the readiness gate in [`Viewer::apply`].
    pub fn handle_event(&mut self, event: &InputEvent) -> TurntableResult<bool> {
        if let EventKind::Resize { width } = event.kind {
            self.resize(width)?;
            return Ok(true);
        }

        let translated = self
            .sources
            .iter()
            .find_map(|source| source.translate(event).map(|input| (source.name(), input)));
        let Some((source, input)) = translated else {
            tracing::trace!(t = event.timestamp_ms, "Event not claimed by any source");
            return Ok(false);
        };
        tracing::trace!(source, t = event.timestamp_ms, "Input");
        Ok(self.apply(input))
    }

    /// Apply source-agnostic input. Ignored until the sequence is loaded.
    pub fn apply(&mut self, input: PointerInput) -> bool {
        if !self.ready {
            return false;
        }
        match input {
            PointerInput::Start(x) => {
                self.tracker.drag_start(x);
                true
            }
            PointerInput::End => self.tracker.drag_end(),
            PointerInput::Move(sample) => {
                let target = self.tracker.drag_move(&mut self.state, sample);
                self.retargeted(target)
            }
            PointerInput::Position(sample) => {
                let target = self.tracker.position_update(&mut self.state, sample);
                self.retargeted(target)
            }
        }
    }

    fn retargeted(&mut self, target: Option<i64>) -> bool {
        if target.is_none() {
            return false;
        }
        self.scheduler.request_start(&mut self.state);
        true
    }

    pub fn drag_start(&mut self, position: f64) -> bool {
        self.apply(PointerInput::Start(position))
    }

    pub fn drag_move(&mut self, position: f64, timestamp_ms: u64) -> bool {
        self.apply(PointerInput::Move(PositionSample::new(position, timestamp_ms)))
    }

    pub fn drag_end(&mut self) -> bool {
        self.apply(PointerInput::End)
    }

    /// Feed a position already translated into surface coordinates.
    pub fn position_update(&mut self, position: f64, timestamp_ms: u64) -> bool {
        self.apply(PointerInput::Position(PositionSample::new(
            position,
            timestamp_ms,
        )))
    }

    /// The interactive surface changed width.
    pub fn resize(&mut self, track_width: f64) -> TurntableResult<()> {
        self.tracker.set_track_width(track_width)?;
        tracing::debug!(track_width, "Surface resized");
        Ok(())
    }

    /// Advance the animation by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        self.scheduler.tick(&mut self.state, &mut self.compositor)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn current_frame(&self) -> i64 {
        self.state.current_frame
    }

    pub fn target_frame(&self) -> i64 {
        self.state.target_frame
    }

    /// Slot currently on screen.
    pub fn normalized_frame(&self) -> usize {
        normalize_frame(self.state.current_frame, self.config.total_frames)
    }

    /// Asset currently on screen.
    pub fn visible_asset(&self) -> Option<&A> {
        self.store.frame(self.state.current_frame)
    }

    pub fn progress(&self) -> LoadProgress {
        self.store.progress()
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }
}

impl<A> std::fmt::Debug for Viewer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("ready", &self.ready)
            .field("state", &self.state)
            .field("progress", &self.store.progress())
            .field("compositor", &self.compositor)
            .finish()
    }
}
