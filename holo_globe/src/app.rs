//! Application wiring: configuration, the per-frame pipeline, and the main
//! loop that ties the pipeline to the visualizer window.
//!
//! ```text
//!   capture ─▶ VisionLoop ─┬─▶ snapshot ─┬─▶ OrbitLoop ─▶ orbit ─▶ RegionLoop ─▶ region
//!                          │             └─▶ DragLoop  ─▶ panel
//!                          └─▶ skeletons (overlay only)
//! ```
//!
//! Every arrow after the vision loop is a single-writer state cell; all
//! tasks run on one thread under a [`FrameScheduler`].

use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::{bail, Context};

use hand_reading::{state_cell, InteractionSnapshot, SkeletonFrame, StateReader, Viewport};

use crate::backend::SimInput;
use crate::drag::{DragController, DragLoop, PanelView};
use crate::orbit::{OrbitLoop, OrbitView};
use crate::region::{RegionLabel, RegionLoop};
use crate::scheduler::{CancelToken, FrameClock, FrameScheduler};
use crate::vision::{
    start_vision, CaptureDevice, HandDetector, VisionError, VisionStatus, VisionWriters,
};
use crate::visualizer::{SceneFrame, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// Configuration
// ════════════════════════════════════════════════════════════════════════════

/// What the capture device is asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureConfig {
    pub width:     u32,
    pub height:    u32,
    pub fps:       u32,
    pub max_hands: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig { width: 1280, height: 720, fps: 30, max_hands: 2 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub viewport:       Viewport,
    pub title:          String,
    /// Target display frame interval (~60 fps).
    pub frame_interval: Duration,
    pub capture:        CaptureConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            viewport:       Viewport::new(1280.0, 720.0),
            title:          "Holo Globe - two-hand gesture control".to_string(),
            frame_interval: Duration::from_millis(16),
            capture:        CaptureConfig::default(),
        }
    }
}

impl AppConfig {
    /// Build a config from command-line flags (program name excluded).
    ///
    /// `--quick` keeps the defaults; `--viewport WxH` and `--camera-fps N`
    /// override them. Unknown flags and malformed values are errors.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> anyhow::Result<Self> {
        let mut cfg = AppConfig::default();
        let mut it = args.iter().map(|a| AsRef::<str>::as_ref(a));

        while let Some(arg) = it.next() {
            match arg {
                "--quick" => {}
                "--viewport" => {
                    let v = it.next().context("--viewport needs a value like 1280x720")?;
                    cfg.viewport = parse_viewport(v)?;
                }
                "--camera-fps" => {
                    let v = it.next().context("--camera-fps needs a value")?;
                    cfg.capture.fps = v
                        .parse()
                        .with_context(|| format!("invalid camera fps {:?}", v))?;
                    if cfg.capture.fps == 0 {
                        bail!("camera fps must be at least 1");
                    }
                }
                other => bail!("unknown argument {:?}", other),
            }
        }
        Ok(cfg)
    }
}

/// Parse `WIDTHxHEIGHT`, e.g. `1280x720`.
pub fn parse_viewport(s: &str) -> anyhow::Result<Viewport> {
    let (w, h) = s
        .trim()
        .split_once(['x', 'X'])
        .with_context(|| format!("viewport {:?} is not WIDTHxHEIGHT", s))?;
    let w: u32 = w.parse().with_context(|| format!("invalid viewport width in {:?}", s))?;
    let h: u32 = h.parse().with_context(|| format!("invalid viewport height in {:?}", s))?;
    if w < 320 || h < 240 {
        bail!("viewport {}x{} is smaller than 320x240", w, h);
    }
    Ok(Viewport::new(w as f32, h as f32))
}

// ════════════════════════════════════════════════════════════════════════════
// Pipeline
// ════════════════════════════════════════════════════════════════════════════

/// Read handles for everything the pipeline produces.
#[derive(Clone, Debug)]
pub struct PipelineOutputs {
    pub hands:     StateReader<InteractionSnapshot>,
    pub skeletons: StateReader<SkeletonFrame>,
    pub orbit:     StateReader<OrbitView>,
    pub region:    StateReader<RegionLabel>,
    pub panel:     StateReader<PanelView>,
    pub status:    StateReader<VisionStatus>,
}

impl PipelineOutputs {
    pub fn scene(&self) -> SceneFrame {
        SceneFrame {
            orbit:     self.orbit.get(),
            region:    self.region.get(),
            panel:     self.panel.get(),
            hands:     self.hands.get(),
            skeletons: self.skeletons.get(),
            status:    self.status.get(),
        }
    }
}

pub struct Pipeline {
    scheduler: FrameScheduler,
    clock:     FrameClock,
    outputs:   PipelineOutputs,
}

impl Pipeline {
    /// Open the vision backend with `open` and schedule every task.
    ///
    /// A backend that fails to open leaves the hands permanently absent
    /// (status [`VisionStatus::Failed`]); the render tasks run regardless.
    pub fn new<C, D, F>(viewport: Viewport, open: F) -> Self
    where
        C: CaptureDevice + 'static,
        D: HandDetector<C::Frame> + 'static,
        F: FnOnce() -> Result<(C, D), VisionError>,
    {
        let (snapshot_w, hands)      = state_cell(InteractionSnapshot::default());
        let (skeletons_w, skeletons) = state_cell(SkeletonFrame::default());
        let (status_w, status)       = state_cell(VisionStatus::Initializing);
        let (orbit_w, orbit)         = state_cell(OrbitView::default());
        let (region_w, region)       = state_cell(RegionLabel::default());
        let (panel_w, panel)         = state_cell(DragController::for_viewport(viewport).view());

        let vision_out = VisionWriters { snapshot: snapshot_w, skeletons: skeletons_w, status: status_w };

        let mut scheduler = FrameScheduler::new();
        // Vision first so render tasks see this frame's snapshot.
        if let Some(vision) = start_vision(open, vision_out, viewport) {
            scheduler.spawn(vision);
        }
        scheduler.spawn(OrbitLoop::new(hands.clone(), orbit_w));
        scheduler.spawn(RegionLoop::new(orbit.clone(), region_w));
        scheduler.spawn(DragLoop::new(viewport, hands.clone(), panel_w));
        log::info!("pipeline tasks: {}", scheduler.task_names().join(", "));

        Pipeline {
            scheduler,
            clock:   FrameClock::new(),
            outputs: PipelineOutputs { hands, skeletons, orbit, region, panel, status },
        }
    }

    /// Run one display frame on the wall clock. False once cancelled.
    pub fn step(&mut self) -> bool {
        let tick = self.clock.tick();
        self.scheduler.run_frame(&tick)
    }

    /// Run one display frame of exactly `delta`.
    pub fn step_by(&mut self, delta: Duration) -> bool {
        let tick = self.clock.advance(delta);
        self.scheduler.run_frame(&tick)
    }

    pub fn outputs(&self) -> &PipelineOutputs { &self.outputs }

    pub fn task_names(&self) -> Vec<&'static str> { self.scheduler.task_names() }

    pub fn cancel_token(&self) -> CancelToken { self.scheduler.cancel_token() }

    /// Stop every task and release the capture device.
    pub fn shutdown(&mut self) { self.scheduler.shutdown(); }
}

// ════════════════════════════════════════════════════════════════════════════
// Main loop
// ════════════════════════════════════════════════════════════════════════════

#[cfg(not(feature = "leap"))]
fn open_pipeline(cfg: &AppConfig, sim_rx: Receiver<SimInput>) -> Pipeline {
    use crate::backend::{SimCamera, SyntheticDetector};

    let capture = cfg.capture;
    log::info!("simulated camera {}x{} @ {} fps", capture.width, capture.height, capture.fps);
    Pipeline::new(cfg.viewport, move || {
        Ok((SimCamera::new(sim_rx, capture.fps), SyntheticDetector::new(capture.max_hands)))
    })
}

#[cfg(feature = "leap")]
fn open_pipeline(cfg: &AppConfig, _sim_rx: Receiver<SimInput>) -> Pipeline {
    use crate::backend::{LeapCamera, TrackedHands};

    let max_hands = cfg.capture.max_hands;
    Pipeline::new(cfg.viewport, move || Ok((LeapCamera::open()?, TrackedHands::new(max_hands))))
}

pub fn run(cfg: AppConfig) -> anyhow::Result<()> {
    // ── Sim input channel (unused by hardware backends) ──────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(&cfg, sim_tx).context("starting visualizer")?;

    // ── Pipeline ──────────────────────────────────────────────────────────
    let mut pipeline = open_pipeline(&cfg, sim_rx);

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        if !vis.poll_input() { break; }
        if !pipeline.step() { break; }
        vis.render(&pipeline.outputs().scene());
    }

    pipeline.shutdown();
    log::info!("visualizer closed");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
