//! Which part of the globe faces the viewer, from the orbital yaw.

use std::f32::consts::TAU;
use std::fmt;

use hand_reading::{StateReader, StateWriter};

use crate::orbit::OrbitView;
use crate::scheduler::{Flow, FrameTask, FrameTick};

/// Seconds between region recomputations.
pub const REGION_PERIOD: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RegionLabel {
    /// Nothing classified yet.
    #[default]
    Scanning,
    Americas,
    Pacific,
    Asia,
    EuropeAfrica,
    Atlantic,
}

impl RegionLabel {
    /// Bucket a yaw angle (radians, any range).
    pub fn from_yaw(yaw: f32) -> Self {
        RegionLabel::from_degrees(yaw.rem_euclid(TAU).to_degrees())
    }

    /// Bucket an angle already normalized into `[0, 360)` degrees.
    /// Every bucket is closed at its start and open at its end.
    pub fn from_degrees(deg: f32) -> Self {
        if (30.0..100.0).contains(&deg) {
            RegionLabel::Americas
        } else if (100.0..190.0).contains(&deg) {
            RegionLabel::Pacific
        } else if (190.0..280.0).contains(&deg) {
            RegionLabel::Asia
        } else if (280.0..340.0).contains(&deg) {
            RegionLabel::EuropeAfrica
        } else {
            RegionLabel::Atlantic
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RegionLabel::Scanning     => "Scanning...",
            RegionLabel::Americas     => "Americas",
            RegionLabel::Pacific      => "Pacific",
            RegionLabel::Asia         => "Asia",
            RegionLabel::EuropeAfrica => "Europe/Africa",
            RegionLabel::Atlantic     => "Atlantic",
        }
    }
}

impl fmt::Display for RegionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Throttle
// ════════════════════════════════════════════════════════════════════════════

/// Fires on the first frame of each `period`-second window, whatever the
/// frame rate: `elapsed mod period < delta`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Throttle {
    period: f64,
}

impl Throttle {
    pub fn new(period: f64) -> Self { Throttle { period } }

    pub fn fires(&self, elapsed: f64, delta: f32) -> bool {
        elapsed.rem_euclid(self.period) < f64::from(delta)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RegionLoop: per-frame task
// ════════════════════════════════════════════════════════════════════════════

pub struct RegionLoop {
    throttle: Throttle,
    orbit:    StateReader<OrbitView>,
    output:   StateWriter<RegionLabel>,
}

impl RegionLoop {
    pub fn new(orbit: StateReader<OrbitView>, output: StateWriter<RegionLabel>) -> Self {
        RegionLoop { throttle: Throttle::new(REGION_PERIOD), orbit, output }
    }
}

impl FrameTask for RegionLoop {
    fn name(&self) -> &'static str { "region" }

    fn step(&mut self, tick: &FrameTick) -> Flow {
        if self.throttle.fires(tick.elapsed, tick.delta) {
            let label = RegionLabel::from_yaw(self.orbit.get().yaw);
            if label != self.output.get() {
                log::debug!("region: {} -> {}", self.output.get(), label);
            }
            self.output.set(label);
        }
        Flow::Continue
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use hand_reading::state_cell;

    use crate::scheduler::FrameClock;

    #[test]
    fn bucket_boundaries_are_closed_open() {
        assert_eq!(RegionLabel::from_degrees(29.999), RegionLabel::Atlantic);
        assert_eq!(RegionLabel::from_degrees(30.0), RegionLabel::Americas);
        assert_eq!(RegionLabel::from_degrees(99.999), RegionLabel::Americas);
        assert_eq!(RegionLabel::from_degrees(100.0), RegionLabel::Pacific);
        assert_eq!(RegionLabel::from_degrees(190.0), RegionLabel::Asia);
        assert_eq!(RegionLabel::from_degrees(280.0), RegionLabel::EuropeAfrica);
        assert_eq!(RegionLabel::from_degrees(339.999), RegionLabel::EuropeAfrica);
        assert_eq!(RegionLabel::from_degrees(340.0), RegionLabel::Atlantic);
    }

    #[test]
    fn zero_and_full_turn_are_atlantic() {
        assert_eq!(RegionLabel::from_degrees(0.0), RegionLabel::Atlantic);
        assert_eq!(RegionLabel::from_degrees(360.0), RegionLabel::Atlantic);
        assert_eq!(RegionLabel::from_yaw(0.0), RegionLabel::Atlantic);
        assert_eq!(RegionLabel::from_yaw(TAU), RegionLabel::Atlantic);
    }

    #[test]
    fn yaw_is_normalized_before_bucketing() {
        let deg = |d: f32| d.to_radians();
        assert_eq!(RegionLabel::from_yaw(deg(60.0)), RegionLabel::Americas);
        assert_eq!(RegionLabel::from_yaw(deg(60.0) + 3.0 * TAU), RegionLabel::Americas);
        assert_eq!(RegionLabel::from_yaw(deg(-90.0)), RegionLabel::Asia);
        assert_eq!(RegionLabel::from_yaw(deg(-60.0)), RegionLabel::EuropeAfrica);
        assert_eq!(RegionLabel::from_yaw(deg(150.0) - TAU), RegionLabel::Pacific);
    }

    #[test]
    fn throttle_fires_about_twice_a_second() {
        for fps in [30.0_f64, 77.0, 144.0] {
            let t = Throttle::new(REGION_PERIOD);
            let dt = 1.0 / fps;
            let frames = (10.0 * fps) as usize;
            let fired = (1..=frames)
                .filter(|&k| t.fires(k as f64 * dt + 0.003, dt as f32))
                .count();
            assert!((19..=21).contains(&fired), "{} fps fired {}", fps, fired);
        }
    }

    #[test]
    fn region_starts_scanning_then_updates_on_throttle() {
        let (orbit_w, orbit_r) = state_cell(OrbitView::default());
        let (label_w, label_r) = state_cell(RegionLabel::default());
        let mut task = RegionLoop::new(orbit_r, label_w);
        assert_eq!(label_r.get(), RegionLabel::Scanning);

        orbit_w.set(OrbitView { yaw: 60f32.to_radians(), ..OrbitView::default() });

        let mut clock = FrameClock::new();
        for _ in 0..40 {
            task.step(&clock.advance(Duration::from_millis(16)));
        }
        assert_eq!(label_r.get(), RegionLabel::Americas);
    }

    #[test]
    fn display_uses_names() {
        assert_eq!(RegionLabel::EuropeAfrica.to_string(), "Europe/Africa");
        assert_eq!(RegionLabel::Scanning.to_string(), "Scanning...");
    }
}
