//! Drag controller: pinch with the UI hand to grab the panel and move it.
//!
//! ```text
//!            present && pinching
//!   Idle  ───────────────────────▶  Engaged
//!    ▲                                 │
//!    └──── pinch or presence lost ─────┘
//! ```
//!
//! While engaged the panel eases toward the hand by a fixed fraction per
//! display frame, re-centring on the palm: the offset at which the panel
//! was grabbed is not kept.

use hand_reading::{HandReading, InteractionSnapshot, Point2, StateReader, StateWriter, Viewport};

use crate::scheduler::{Flow, FrameTask, FrameTick};

/// Fraction of the remaining distance covered each frame (not time scaled).
pub const FOLLOW_BLEND: f32 = 0.2;

/// Panel's starting offset from the viewport's right edge, and from the top.
pub const PANEL_RIGHT_INSET: f32 = 350.0;
pub const PANEL_TOP:         f32 = 150.0;

pub const IDLE_BORDER:    u32 = 0xFF00FFFF;
pub const ENGAGED_BORDER: u32 = 0xFFFFFFFF;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Engaged,
}

impl DragState {
    pub fn is_engaged(self) -> bool { self == DragState::Engaged }

    pub fn border_color(self) -> u32 {
        match self {
            DragState::Idle    => IDLE_BORDER,
            DragState::Engaged => ENGAGED_BORDER,
        }
    }

    /// Position-lock status shown on the panel.
    pub fn lock_label(self) -> &'static str {
        match self {
            DragState::Idle    => "LOCK: ENGAGED",
            DragState::Engaged => "LOCK: RELEASED",
        }
    }
}

/// Everything the panel needs to draw itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelView {
    pub position: Point2,
    pub state:    DragState,
}

impl PanelView {
    pub fn border_color(&self) -> u32 { self.state.border_color() }
}

// ════════════════════════════════════════════════════════════════════════════
// DragController
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct DragController {
    state:    DragState,
    position: Point2,
}

impl DragController {
    pub fn new(initial: Point2) -> Self {
        DragController { state: DragState::Idle, position: initial }
    }

    /// Start near the top-right corner of the viewport.
    pub fn for_viewport(viewport: Viewport) -> Self {
        DragController::new(Point2::new(viewport.width - PANEL_RIGHT_INSET, PANEL_TOP))
    }

    pub fn state(&self) -> DragState { self.state }
    pub fn position(&self) -> Point2 { self.position }
    pub fn is_engaged(&self) -> bool { self.state.is_engaged() }
    pub fn border_color(&self) -> u32 { self.state.border_color() }
    pub fn lock_label(&self) -> &'static str { self.state.lock_label() }

    pub fn view(&self) -> PanelView {
        PanelView { position: self.position, state: self.state }
    }

    /// Advance one display frame.
    pub fn step(&mut self, ui: &HandReading) -> DragState {
        let grabbing = ui.present && ui.pinch.active;

        match (self.state, grabbing) {
            (DragState::Idle, true) => {
                log::debug!("panel grabbed at ({:.0}, {:.0})", ui.screen_position.x, ui.screen_position.y);
                self.state = DragState::Engaged;
            }
            (DragState::Engaged, false) => {
                log::debug!("panel released at ({:.0}, {:.0})", self.position.x, self.position.y);
                self.state = DragState::Idle;
            }
            _ => {}
        }

        if self.state == DragState::Engaged {
            let target = ui.screen_position;
            self.position.x += (target.x - self.position.x) * FOLLOW_BLEND;
            self.position.y += (target.y - self.position.y) * FOLLOW_BLEND;
        }

        self.state
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DragLoop: per-frame task
// ════════════════════════════════════════════════════════════════════════════

pub struct DragLoop {
    controller: DragController,
    hands:      StateReader<InteractionSnapshot>,
    output:     StateWriter<PanelView>,
}

impl DragLoop {
    pub fn new(
        viewport: Viewport,
        hands:    StateReader<InteractionSnapshot>,
        output:   StateWriter<PanelView>,
    ) -> Self {
        let controller = DragController::for_viewport(viewport);
        output.set(controller.view());
        DragLoop { controller, hands, output }
    }
}

impl FrameTask for DragLoop {
    fn name(&self) -> &'static str { "drag" }

    fn step(&mut self, _tick: &FrameTick) -> Flow {
        let ui = self.hands.get().ui;
        self.controller.step(&ui);
        self.output.set(self.controller.view());
        Flow::Continue
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
