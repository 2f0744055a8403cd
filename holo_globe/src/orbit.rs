//! Orbital controller: the control hand spins, tilts and zooms the globe.
//!
//! Three damped channels (yaw, pitch, scale) chase targets set by the hand.
//! With no hand the globe idles: yaw keeps spinning at a slow constant rate,
//! picking up from wherever the globe is when the hand leaves, while pitch
//! and scale relax toward resting values. The gains are tuned
//! by feel; changing them changes how the globe handles.

use std::f32::consts::{PI, TAU};

use hand_reading::{HandReading, InteractionSnapshot, StateReader, StateWriter};

use crate::scheduler::{Flow, FrameTask, FrameTick};

// ════════════════════════════════════════════════════════════════════════════
// Tuning
// ════════════════════════════════════════════════════════════════════════════

/// Idle spin, radians per second.
pub const IDLE_SPIN_RATE:   f32 = 0.1;
pub const REST_PITCH:       f32 = 0.2;
pub const REST_SCALE:       f32 = 1.2;
/// Per-second damping gains (multiplied by `delta`).
pub const ROTATION_DAMPING: f32 = 2.0;
pub const SCALE_DAMPING:    f32 = 3.0;
/// Pinch distance → scale.
pub const ZOOM_GAIN:        f32 = 5.0;
pub const MIN_SCALE:        f32 = 0.5;
pub const MAX_SCALE:        f32 = 2.5;
/// Cosmetic layers, radians per second.
pub const CLOUD_RATE:       f32 = 0.05;
pub const WIREFRAME_RATE:   f32 = 0.02;
/// Idle yaw is pulled back by whole turns past this point so the per-frame
/// spin increment stays well above f32 resolution.
pub const YAW_WRAP_LIMIT:   f32 = 64.0 * TAU;

/// Move `current` toward `target` by `factor` of the remaining gap.
/// The factor is capped at 1 so a long stall lands on the target instead
/// of swinging past it.
pub fn damp(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor.clamp(0.0, 1.0)
}

// ════════════════════════════════════════════════════════════════════════════
// OrbitalTransform
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitalTransform {
    pub yaw:          f32,
    pub pitch:        f32,
    pub scale:        f32,
    pub target_yaw:   f32,
    pub target_pitch: f32,
    pub target_scale: f32,
}

impl Default for OrbitalTransform {
    fn default() -> Self {
        OrbitalTransform {
            yaw:          0.0,
            pitch:        0.0,
            scale:        1.0,
            target_yaw:   0.0,
            target_pitch: 0.0,
            target_scale: REST_SCALE,
        }
    }
}

/// What the scene node needs each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitView {
    pub yaw:           f32,
    pub pitch:         f32,
    pub scale:         f32,
    pub cloud_yaw:     f32,
    pub wireframe_yaw: f32,
}

impl Default for OrbitView {
    fn default() -> Self { OrbitalController::new().view() }
}

// ════════════════════════════════════════════════════════════════════════════
// OrbitalController
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default)]
pub struct OrbitalController {
    transform:     OrbitalTransform,
    cloud_yaw:     f32,
    wireframe_yaw: f32,
    hand_seen:     bool,
}

impl OrbitalController {
    pub fn new() -> Self { OrbitalController::default() }

    pub fn transform(&self) -> &OrbitalTransform { &self.transform }

    /// Cosmetic layer angles: (cloud, wireframe).
    pub fn layers(&self) -> (f32, f32) { (self.cloud_yaw, self.wireframe_yaw) }

    pub fn view(&self) -> OrbitView {
        OrbitView {
            yaw:           self.transform.yaw,
            pitch:         self.transform.pitch,
            scale:         self.transform.scale,
            cloud_yaw:     self.cloud_yaw,
            wireframe_yaw: self.wireframe_yaw,
        }
    }

    /// Advance one display frame.
    pub fn step(&mut self, control: &HandReading, delta: f32) -> OrbitView {
        let t = &mut self.transform;

        if control.present {
            t.target_yaw   = (control.position.x - 0.5) * 4.0 * PI;
            t.target_pitch = (control.position.y - 0.5) * PI;
            t.target_scale = (control.pinch.distance * ZOOM_GAIN).clamp(MIN_SCALE, MAX_SCALE);
        } else {
            if self.hand_seen {
                // Spin on from where the globe is, not from the hand's last target.
                t.target_yaw = t.yaw;
            }
            if t.yaw > YAW_WRAP_LIMIT {
                let turns = (t.yaw / TAU).trunc() * TAU;
                t.yaw        -= turns;
                t.target_yaw -= turns;
            }
            t.target_yaw  += delta * IDLE_SPIN_RATE;
            t.target_pitch = damp(t.target_pitch, REST_PITCH, delta);
            t.target_scale = damp(t.target_scale, REST_SCALE, delta);
        }

        t.yaw   = damp(t.yaw,   t.target_yaw,   delta * ROTATION_DAMPING);
        t.pitch = damp(t.pitch, t.target_pitch, delta * ROTATION_DAMPING);
        t.scale = damp(t.scale, t.target_scale, delta * SCALE_DAMPING);
        self.hand_seen = control.present;

        self.cloud_yaw     += delta * CLOUD_RATE;
        self.wireframe_yaw -= delta * WIREFRAME_RATE;

        self.view()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// OrbitLoop: per-frame task
// ════════════════════════════════════════════════════════════════════════════

pub struct OrbitLoop {
    controller: OrbitalController,
    hands:      StateReader<InteractionSnapshot>,
    output:     StateWriter<OrbitView>,
}

impl OrbitLoop {
    pub fn new(hands: StateReader<InteractionSnapshot>, output: StateWriter<OrbitView>) -> Self {
        OrbitLoop { controller: OrbitalController::new(), hands, output }
    }
}

impl FrameTask for OrbitLoop {
    fn name(&self) -> &'static str { "orbit" }

    fn step(&mut self, tick: &FrameTick) -> Flow {
        let control = self.hands.get().control;
        self.output.set(self.controller.step(&control, tick.delta));
        Flow::Continue
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_reading::{Pinch, Point2};

    const DT: f32 = 1.0 / 60.0;

    fn hand(x: f32, y: f32, distance: f32) -> HandReading {
        HandReading {
            present:         true,
            position:        Point2::new(x, y),
            pinch:           Pinch { active: distance < 0.05, distance },
            screen_position: Point2::new(0.0, 0.0),
        }
    }

    #[test]
    fn hand_sets_targets() {
        let mut c = OrbitalController::new();
        c.step(&hand(1.0, 0.0, 0.3), DT);
        let t = c.transform();
        assert!((t.target_yaw - 2.0 * PI).abs() < 1e-5);
        assert!((t.target_pitch + PI / 2.0).abs() < 1e-5);
        assert!((t.target_scale - 1.5).abs() < 1e-5);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut c = OrbitalController::new();
        c.step(&hand(0.5, 0.5, 0.01), DT);
        assert_eq!(c.transform().target_scale, MIN_SCALE);
        c.step(&hand(0.5, 0.5, 0.9), DT);
        assert_eq!(c.transform().target_scale, MAX_SCALE);
    }

    #[test]
    fn first_step_moves_partway_toward_target() {
        // Palm mirrored to x = 0.25 → target yaw −π.
        let mut c = OrbitalController::new();
        let view = c.step(&hand(0.25, 0.5, 0.02), DT);
        assert!((c.transform().target_yaw + PI).abs() < 1e-5);
        assert!(view.yaw < 0.0);
        assert!(view.yaw > -PI);
    }

    #[test]
    fn yaw_never_overshoots_a_held_target() {
        let mut c = OrbitalController::new();
        let mut prev = 0.0;
        for _ in 0..2000 {
            let yaw = c.step(&hand(0.25, 0.5, 0.02), DT).yaw;
            assert!(yaw <= prev);
            assert!(yaw >= -PI);
            prev = yaw;
        }
        assert!((prev + PI).abs() < 1e-3);
    }

    #[test]
    fn idle_yaw_strictly_increases() {
        let mut c = OrbitalController::new();
        let absent = HandReading::absent();
        let mut prev = c.view().yaw;
        for frame in 0..600 {
            let yaw = c.step(&absent, DT).yaw;
            assert!(yaw > prev, "frame {}: {} <= {}", frame, yaw, prev);
            prev = yaw;
        }
    }

    #[test]
    fn idle_relaxes_pitch_and_scale_to_rest() {
        let mut c = OrbitalController::new();
        c.step(&hand(0.5, 1.0, 0.5), DT);
        for _ in 0..3000 { c.step(&HandReading::absent(), DT); }
        let t = c.transform();
        assert!((t.pitch - REST_PITCH).abs() < 1e-2);
        assert!((t.scale - REST_SCALE).abs() < 1e-2);
    }

    #[test]
    fn hand_leaving_does_not_jump() {
        let mut c = OrbitalController::new();
        for _ in 0..30 { c.step(&hand(0.9, 0.5, 0.2), DT); }
        let before = c.view().yaw;
        let after = c.step(&HandReading::absent(), DT).yaw;
        // Idle spin picks up from the current yaw.
        let gap = DT * IDLE_SPIN_RATE;
        assert!(after > before);
        assert!((after - before - gap * DT * ROTATION_DAMPING).abs() < 5e-6);
    }

    #[test]
    fn idle_never_runs_backwards_after_hand_leaves() {
        let mut c = OrbitalController::new();
        // Hand far left: yaw is still well above its target when the hand goes.
        for _ in 0..30 { c.step(&hand(0.1, 0.5, 0.2), DT); }
        assert!(c.view().yaw > c.transform().target_yaw);

        let mut prev = c.view().yaw;
        for frame in 0..120 {
            let yaw = c.step(&HandReading::absent(), DT).yaw;
            assert!(yaw > prev, "frame {}: {} <= {}", frame, yaw, prev);
            prev = yaw;
        }
    }

    #[test]
    fn hand_returning_takes_over_from_idle() {
        let mut c = OrbitalController::new();
        for _ in 0..60 { c.step(&HandReading::absent(), DT); }
        c.step(&hand(0.25, 0.5, 0.2), DT);
        assert!((c.transform().target_yaw + PI).abs() < 1e-5);
    }

    #[test]
    fn long_idle_wraps_by_whole_turns() {
        let mut c = OrbitalController::new();
        c.transform.yaw        = YAW_WRAP_LIMIT + 0.5;
        c.transform.target_yaw = YAW_WRAP_LIMIT + 0.55;
        let before = c.view().yaw;
        let offset = c.transform.target_yaw - c.transform.yaw;

        let after = c.step(&HandReading::absent(), DT).yaw;
        assert!(after < TAU);
        // Same orientation, nudged forward by the spin.
        let advanced = (after - before).rem_euclid(TAU);
        assert!(advanced > 0.0 && advanced < 0.01, "advanced {}", advanced);
        let t = c.transform();
        assert!((t.target_yaw - t.yaw - (offset + DT * IDLE_SPIN_RATE) * (1.0 - DT * ROTATION_DAMPING)).abs() < 1e-3);
    }

    #[test]
    fn idle_spin_keeps_moving_near_wrap_limit() {
        let mut c = OrbitalController::new();
        c.transform.yaw        = YAW_WRAP_LIMIT - 0.01;
        c.transform.target_yaw = YAW_WRAP_LIMIT - 0.01;
        let mut prev = c.view().yaw;
        for _ in 0..10 {
            let yaw = c.step(&HandReading::absent(), DT).yaw;
            assert!(yaw > prev);
            prev = yaw;
        }
    }

    #[test]
    fn scale_converges_faster_than_rotation() {
        let mut c = OrbitalController::new();
        c.step(&hand(0.75, 0.5, 0.4), DT);
        let t = c.transform();
        let yaw_progress   = t.yaw / t.target_yaw;
        let scale_progress = (t.scale - 1.0) / (t.target_scale - 1.0);
        assert!(scale_progress > yaw_progress);
    }

    #[test]
    fn long_frame_does_not_overshoot() {
        let mut c = OrbitalController::new();
        let view = c.step(&hand(0.25, 0.5, 0.3), 5.0);
        assert!((view.yaw + PI).abs() < 1e-5);
        assert!((view.scale - 1.5).abs() < 1e-5);
    }

    #[test]
    fn cosmetic_layers_turn_opposite_ways() {
        let mut c = OrbitalController::new();
        for _ in 0..60 { c.step(&HandReading::absent(), DT); }
        let (cloud, wire) = c.layers();
        assert!((cloud - CLOUD_RATE).abs() < 1e-4);
        assert!((wire + WIREFRAME_RATE).abs() < 1e-4);
    }

    #[test]
    fn loop_publishes_view() {
        use crate::scheduler::FrameClock;
        use hand_reading::{state_cell, FrameReadings};
        use std::time::Duration;

        let (hands_w, hands_r) = state_cell(InteractionSnapshot::default());
        let (view_w, view_r) = state_cell(OrbitView::default());
        let mut task = OrbitLoop::new(hands_r, view_w);
        let mut clock = FrameClock::new();

        hands_w.publish_frame(&FrameReadings { control: Some(hand(0.25, 0.5, 0.02)), ui: None });
        task.step(&clock.advance(Duration::from_millis(16)));
        assert!(view_r.get().yaw < 0.0);
    }
}
