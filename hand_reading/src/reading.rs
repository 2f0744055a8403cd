//! Normalized hand readings and the two-slot interaction snapshot.

use crate::landmark::HandSlot;

// ════════════════════════════════════════════════════════════════════════════
// Geometry
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const fn new(x: f32, y: f32) -> Self { Point2 { x, y } }

    pub fn distance(self, other: Point2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Device-pixel dimensions used to map normalized positions to the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width:  f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self { Viewport { width, height } }

    /// Map a normalized point into pixel space.
    pub fn to_screen(self, p: Point2) -> Point2 {
        Point2::new(p.x * self.width, p.y * self.height)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandReading
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Pinch {
    pub active:   bool,
    /// Thumb-tip to index-tip distance, unthresholded.
    pub distance: f32,
}

/// The latest reading for one logical hand slot.
///
/// When `present` is false the remaining fields hold the last values seen
/// and should be ignored by consumers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandReading {
    pub present:         bool,
    /// Mirrored palm centroid, normalized.
    pub position:        Point2,
    pub pinch:           Pinch,
    /// `position` in device pixels.
    pub screen_position: Point2,
}

impl HandReading {
    /// Startup reading: absent, centered, not pinching.
    pub const fn absent() -> Self {
        HandReading {
            present:         false,
            position:        Point2::new(0.5, 0.5),
            pinch:           Pinch { active: false, distance: 0.0 },
            screen_position: Point2::new(0.0, 0.0),
        }
    }

    /// Same reading with presence cleared; stale fields are kept.
    pub fn decayed(self) -> Self {
        HandReading { present: false, ..self }
    }

    pub fn is_pinching(&self) -> bool { self.present && self.pinch.active }
}

impl Default for HandReading {
    fn default() -> Self { HandReading::absent() }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameReadings: classifier output for one video frame
// ════════════════════════════════════════════════════════════════════════════

/// Per-slot readings produced from a single frame. `None` means no hand of
/// that slot was detected.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameReadings {
    pub control: Option<HandReading>,
    pub ui:      Option<HandReading>,
}

impl FrameReadings {
    pub fn get(&self, slot: HandSlot) -> Option<HandReading> {
        match slot {
            HandSlot::Control => self.control,
            HandSlot::Ui      => self.ui,
        }
    }

    pub fn slot_mut(&mut self, slot: HandSlot) -> &mut Option<HandReading> {
        match slot {
            HandSlot::Control => &mut self.control,
            HandSlot::Ui      => &mut self.ui,
        }
    }

    pub fn is_empty(&self) -> bool { self.control.is_none() && self.ui.is_none() }
}

// ════════════════════════════════════════════════════════════════════════════
// InteractionSnapshot
// ════════════════════════════════════════════════════════════════════════════

/// Both hands' latest readings at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct InteractionSnapshot {
    pub control: HandReading,
    pub ui:      HandReading,
}

impl InteractionSnapshot {
    pub fn hand(&self, slot: HandSlot) -> &HandReading {
        match slot {
            HandSlot::Control => &self.control,
            HandSlot::Ui      => &self.ui,
        }
    }

    /// Apply one frame's readings.
    ///
    /// Slots with a fresh reading are replaced wholesale; slots without one
    /// decay to `present = false` and keep their previous position and pinch.
    pub fn merged(self, frame: &FrameReadings) -> Self {
        InteractionSnapshot {
            control: frame.control.unwrap_or_else(|| self.control.decayed()),
            ui:      frame.ui.unwrap_or_else(|| self.ui.decayed()),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
