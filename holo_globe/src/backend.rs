//! Capture backends: simulated hands (always available) and a LeapMotion
//! controller (`leap` feature).
//!
//! Both produce the detector's 21-keypoint layout in normalized,
//! *unmirrored* camera space, so the classifier cannot tell them apart from
//! a real landmark model.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use hand_reading::{DetectedHand, Handedness, Landmark, LANDMARK_COUNT};

use crate::vision::{CaptureDevice, HandDetector, VisionError};

// ════════════════════════════════════════════════════════════════════════════
// SimInput: raw events from the visualizer window
// ════════════════════════════════════════════════════════════════════════════

/// Input from the simulation window, in mirrored (screen) coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    /// Mouse moved; drives the UI hand. Normalized 0.0–1.0.
    Pointer { x: f32, y: f32 },
    /// Left mouse button; pinches the UI hand.
    PointerPinch(bool),
    /// Show/hide one hand.
    ToggleHand(Handedness),
    /// Move the control hand (arrow keys).
    NudgeControl { dx: f32, dy: f32 },
    /// Widen (+) or narrow (−) the control hand's thumb/index gap.
    Spread(f32),
}

// ════════════════════════════════════════════════════════════════════════════
// Simulated pose
// ════════════════════════════════════════════════════════════════════════════

/// One simulated hand in raw camera space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimHandPose {
    pub handedness: Handedness,
    pub palm:       Landmark,
    pub pinch_gap:  f32,
}

/// A "video frame" from the simulated camera.
#[derive(Clone, Debug, PartialEq)]
pub struct SimFrame {
    pub hands: Vec<SimHandPose>,
}

const OPEN_GAP:   f32 = 0.12;
const PINCH_GAP:  f32 = 0.02;
const MIN_GAP:    f32 = 0.0;
const MAX_GAP:    f32 = 0.6;

/// Simulated hands, kept in mirrored space like the UI sees them.
#[derive(Clone, Debug)]
struct SimRig {
    control_visible: bool,
    control_at:      (f32, f32),
    control_gap:     f32,
    ui_visible:      bool,
    ui_at:           (f32, f32),
    ui_pinching:     bool,
}

impl Default for SimRig {
    fn default() -> Self {
        SimRig {
            control_visible: false,
            control_at:      (0.5, 0.5),
            control_gap:     0.24,
            ui_visible:      false,
            ui_at:           (0.75, 0.3),
            ui_pinching:     false,
        }
    }
}

impl SimRig {
    fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Pointer { x, y } => {
                self.ui_at = (x.clamp(0.0, 1.0), y.clamp(0.0, 1.0));
            }
            SimInput::PointerPinch(down) => self.ui_pinching = down,
            SimInput::ToggleHand(Handedness::Left)  => self.control_visible = !self.control_visible,
            SimInput::ToggleHand(Handedness::Right) => self.ui_visible = !self.ui_visible,
            SimInput::NudgeControl { dx, dy } => {
                self.control_at.0 = (self.control_at.0 + dx).clamp(0.0, 1.0);
                self.control_at.1 = (self.control_at.1 + dy).clamp(0.0, 1.0);
            }
            SimInput::Spread(d) => {
                self.control_gap = (self.control_gap + d).clamp(MIN_GAP, MAX_GAP);
            }
        }
    }

    fn poses(&self) -> Vec<SimHandPose> {
        let unmirror = |(x, y): (f32, f32)| Landmark::new(1.0 - x, y);
        let mut hands = Vec::with_capacity(2);
        if self.control_visible {
            hands.push(SimHandPose {
                handedness: Handedness::Left,
                palm:       unmirror(self.control_at),
                pinch_gap:  self.control_gap,
            });
        }
        if self.ui_visible {
            hands.push(SimHandPose {
                handedness: Handedness::Right,
                palm:       unmirror(self.ui_at),
                pinch_gap:  if self.ui_pinching { PINCH_GAP } else { OPEN_GAP },
            });
        }
        hands
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimCamera
// ════════════════════════════════════════════════════════════════════════════

/// Simulated camera: drains [`SimInput`]s and emits a frame at a fixed rate.
///
/// The input channel is its cable: once every sender is dropped and the
/// queued inputs are applied, the camera reports itself disconnected.
pub struct SimCamera {
    rx:        Receiver<SimInput>,
    rig:       SimRig,
    interval:  Duration,
    last_emit: Option<Instant>,
    next:      u64,
    released:  bool,
}

impl SimCamera {
    pub fn new(rx: Receiver<SimInput>, fps: u32) -> Self {
        let interval = if fps == 0 { Duration::ZERO } else { Duration::from_secs(1) / fps };
        SimCamera { rx, rig: SimRig::default(), interval, last_emit: None, next: 0, released: false }
    }

    fn drain_inputs(&mut self) -> Result<(), VisionError> {
        loop {
            match self.rx.try_recv() {
                Ok(input) => self.rig.apply(input),
                Err(TryRecvError::Empty) => return Ok(()),
                Err(TryRecvError::Disconnected) => return Err(VisionError::Disconnected),
            }
        }
    }
}

impl CaptureDevice for SimCamera {
    type Frame = SimFrame;

    fn poll_frame(&mut self) -> Result<Option<SimFrame>, VisionError> {
        if self.released {
            return Ok(None);
        }
        self.drain_inputs()?;

        let now = Instant::now();
        if let Some(last) = self.last_emit {
            if now.duration_since(last) < self.interval {
                return Ok(None);
            }
        }
        self.last_emit = Some(now);
        self.next += 1;
        Ok(Some(SimFrame { hands: self.rig.poses() }))
    }

    fn release(&mut self) {
        self.released = true;
        log::info!("simulated camera stopped after {} frames", self.next);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SyntheticDetector
// ════════════════════════════════════════════════════════════════════════════

/// "Detects" simulated hands by building a plausible 21-point skeleton.
pub struct SyntheticDetector {
    max_hands: usize,
}

impl SyntheticDetector {
    pub fn new(max_hands: usize) -> Self { SyntheticDetector { max_hands } }
}

impl HandDetector<SimFrame> for SyntheticDetector {
    fn detect(&mut self, frame: &SimFrame, _timestamp_ms: f64) -> Result<Vec<DetectedHand>, VisionError> {
        Ok(frame.hands.iter().take(self.max_hands).map(synthesize_hand).collect())
    }
}

/// Knuckle x offsets from the palm centre: index, middle, ring, pinky.
const KNUCKLE_DX: [f32; 4] = [-0.035, -0.012, 0.012, 0.035];
const KNUCKLE_DY: f32 = -0.04;
const WRIST_DY:   f32 = 0.08;
const SEGMENT:    f32 = 0.04;

/// Build a skeleton whose palm centroid is exactly `pose.palm` and whose
/// thumb tip sits `pose.pinch_gap` from the index tip.
pub fn synthesize_hand(pose: &SimHandPose) -> DetectedHand {
    let p = pose.palm;
    let mut pts = vec![Landmark::default(); LANDMARK_COUNT];

    // Wrist below the palm, knuckles above; wrist + index + pinky average to p.
    pts[0] = Landmark::new(p.x, p.y + WRIST_DY);

    for (finger, dx) in KNUCKLE_DX.iter().enumerate() {
        let base = 5 + finger * 4;
        for joint in 0..4 {
            pts[base + joint] = Landmark::new(p.x + dx, p.y + KNUCKLE_DY - SEGMENT * joint as f32);
        }
    }

    let index_tip = pts[8];
    let thumb_tip = Landmark::new(index_tip.x - pose.pinch_gap, index_tip.y);
    let thumb_cmc = Landmark::new(p.x - 0.06, p.y + 0.04);
    let thumb_mcp = Landmark::new(p.x - 0.08, p.y);
    pts[1] = thumb_cmc;
    pts[2] = thumb_mcp;
    pts[3] = Landmark::new((thumb_mcp.x + thumb_tip.x) / 2.0, (thumb_mcp.y + thumb_tip.y) / 2.0);
    pts[4] = thumb_tip;

    DetectedHand::new(pts, pose.handedness)
}

// ════════════════════════════════════════════════════════════════════════════
// LeapCamera: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Tracked hands straight from a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// Positions (millimetres above the device) are mapped into the camera's
/// normalized space: a 400 mm wide, 400 mm tall box starting 80 mm above
/// the sensor, with x flipped so the user's right is image-left, as a
/// user-facing camera would see it.
#[cfg(feature = "leap")]
pub struct LeapCamera {
    connection:   Option<leaprs::Connection>,
    last_message: Instant,
    failed_polls: u32,
}

/// The service streams tracking frames even with no hands in view; this
/// long without any message means it or the device is gone.
#[cfg(feature = "leap")]
pub const LEAP_SILENCE_LIMIT: Duration = Duration::from_secs(5);

#[cfg(feature = "leap")]
const LEAP_HALF_WIDTH_MM: f32 = 200.0;
#[cfg(feature = "leap")]
const LEAP_FLOOR_MM:      f32 = 80.0;
#[cfg(feature = "leap")]
const LEAP_HEIGHT_MM:     f32 = 400.0;

#[cfg(feature = "leap")]
fn leap_to_camera(x: f32, y: f32) -> Landmark {
    Landmark::new(
        (LEAP_HALF_WIDTH_MM - x) / (2.0 * LEAP_HALF_WIDTH_MM),
        1.0 - (y - LEAP_FLOOR_MM) / LEAP_HEIGHT_MM,
    )
}

#[cfg(feature = "leap")]
impl LeapCamera {
    pub fn open() -> Result<Self, VisionError> {
        use leaprs::*;

        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| VisionError::DeviceUnavailable(format!("LeapC connection: {:?}", e)))?;
        connection
            .open()
            .map_err(|e| VisionError::DeviceUnavailable(format!("LeapMotion device: {:?}", e)))?;
        log::info!("LeapMotion connection open");
        Ok(LeapCamera { connection: Some(connection), last_message: Instant::now(), failed_polls: 0 })
    }
}

/// Convert one tracked hand into the 21-keypoint layout: wrist, then four
/// points per digit (knuckle, two interpolated joints, tip).
#[cfg(feature = "leap")]
fn leap_hand(hand: &leaprs::Hand) -> DetectedHand {
    let digits: Vec<_> = hand.digits().collect();
    let mut pts = vec![Landmark::default(); LANDMARK_COUNT];

    let mut wrist = (0.0f32, 0.0f32);
    for digit in &digits {
        let b = digit.metacarpal().prev_joint();
        wrist.0 += b.x;
        wrist.1 += b.y;
    }
    let n = digits.len().max(1) as f32;
    pts[0] = leap_to_camera(wrist.0 / n, wrist.1 / n);

    for (d, digit) in digits.iter().take(5).enumerate() {
        let knuckle = digit.metacarpal().next_joint();
        let tip     = digit.distal().next_joint();
        let k = leap_to_camera(knuckle.x, knuckle.y);
        let t = leap_to_camera(tip.x, tip.y);
        let base = 1 + d * 4;
        for j in 0..4 {
            let f = j as f32 / 3.0;
            pts[base + j] = Landmark::new(k.x + (t.x - k.x) * f, k.y + (t.y - k.y) * f);
        }
    }

    let handedness = if hand.hand_type() == leaprs::HandType::Right {
        Handedness::Right
    } else {
        Handedness::Left
    };
    DetectedHand::new(pts, handedness)
}

#[cfg(feature = "leap")]
impl CaptureDevice for LeapCamera {
    type Frame = Vec<DetectedHand>;

    fn poll_frame(&mut self) -> Result<Option<Vec<DetectedHand>>, VisionError> {
        use leaprs::*;

        let Some(connection) = self.connection.as_mut() else { return Ok(None) };
        let msg = match connection.poll(0) {
            Ok(msg) => msg,
            Err(e) => {
                self.failed_polls += 1;
                if self.last_message.elapsed() >= LEAP_SILENCE_LIMIT {
                    log::warn!("leap poll failing for {:?} ({} polls), last: {:?}",
                        LEAP_SILENCE_LIMIT, self.failed_polls, e);
                    return Err(VisionError::Disconnected);
                }
                return Ok(None);
            }
        };
        self.last_message = Instant::now();
        self.failed_polls = 0;

        if let Event::Tracking(frame) = msg.event() {
            let hands: Vec<_> = frame.hands().collect();
            log::debug!("leap frame: {} hands", hands.len());
            return Ok(Some(hands.iter().map(leap_hand).collect()));
        }
        Ok(None)
    }

    fn release(&mut self) {
        if self.connection.take().is_some() {
            log::info!("LeapMotion connection closed");
        }
    }
}

/// The LeapMotion service already did the detection; pass hands through.
#[cfg(feature = "leap")]
pub struct TrackedHands {
    max_hands: usize,
}

#[cfg(feature = "leap")]
impl TrackedHands {
    pub fn new(max_hands: usize) -> Self { TrackedHands { max_hands } }
}

#[cfg(feature = "leap")]
impl HandDetector<Vec<DetectedHand>> for TrackedHands {
    fn detect(&mut self, frame: &Vec<DetectedHand>, _timestamp_ms: f64) -> Result<Vec<DetectedHand>, VisionError> {
        Ok(frame.iter().take(self.max_hands).cloned().collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    use hand_reading::{classify_hand, palm_centroid, pinch_distance, HandSlot, Viewport};

    fn close(a: f32, b: f32) -> bool { (a - b).abs() < 1e-5 }

    fn camera() -> (mpsc::Sender<SimInput>, SimCamera) {
        let (tx, rx) = mpsc::channel();
        (tx, SimCamera::new(rx, 0))
    }

    #[test]
    fn synthetic_palm_and_gap_match_pose() {
        let pose = SimHandPose { handedness: Handedness::Left, palm: Landmark::new(0.3, 0.6), pinch_gap: 0.07 };
        let hand = synthesize_hand(&pose);
        assert_eq!(hand.landmarks.len(), LANDMARK_COUNT);
        let c = palm_centroid(&hand.landmarks).unwrap();
        assert!(close(c.x, 0.3));
        assert!(close(c.y, 0.6));
        assert!(close(pinch_distance(&hand.landmarks).unwrap(), 0.07));
    }

    #[test]
    fn hands_start_hidden() {
        let (_tx, mut cam) = camera();
        let frame = cam.poll_frame().unwrap().unwrap();
        assert!(frame.hands.is_empty());
    }

    #[test]
    fn pointer_drives_ui_hand_in_mirrored_space() {
        let (tx, mut cam) = camera();
        tx.send(SimInput::ToggleHand(Handedness::Right)).unwrap();
        tx.send(SimInput::Pointer { x: 0.2, y: 0.7 }).unwrap();
        tx.send(SimInput::PointerPinch(true)).unwrap();

        let frame = cam.poll_frame().unwrap().unwrap();
        let mut det = SyntheticDetector::new(2);
        let hands = det.detect(&frame, 0.0).unwrap();
        assert_eq!(hands.len(), 1);

        let (slot, reading) = classify_hand(&hands[0], Viewport::new(100.0, 100.0)).unwrap();
        assert_eq!(slot, HandSlot::Ui);
        assert!(close(reading.position.x, 0.2));
        assert!(close(reading.position.y, 0.7));
        assert!(reading.pinch.active);
    }

    #[test]
    fn spread_controls_control_hand_gap() {
        let (tx, mut cam) = camera();
        tx.send(SimInput::ToggleHand(Handedness::Left)).unwrap();
        tx.send(SimInput::Spread(10.0)).unwrap();
        let frame = cam.poll_frame().unwrap().unwrap();
        assert!(close(frame.hands[0].pinch_gap, MAX_GAP));

        tx.send(SimInput::Spread(-10.0)).unwrap();
        let frame = cam.poll_frame().unwrap().unwrap();
        assert!(close(frame.hands[0].pinch_gap, MIN_GAP));
    }

    #[test]
    fn frames_are_rate_limited() {
        let (_tx, rx) = mpsc::channel::<SimInput>();
        let mut cam = SimCamera::new(rx, 1);
        assert!(cam.poll_frame().unwrap().is_some());
        assert!(cam.poll_frame().unwrap().is_none());
    }

    #[test]
    fn released_camera_emits_nothing() {
        let (_tx, mut cam) = camera();
        cam.release();
        assert_eq!(cam.poll_frame(), Ok(None));
    }

    #[test]
    fn dropped_sender_disconnects_after_queued_inputs() {
        let (tx, mut cam) = camera();
        tx.send(SimInput::ToggleHand(Handedness::Left)).unwrap();
        drop(tx);
        assert_eq!(cam.poll_frame(), Err(VisionError::Disconnected));
        assert_eq!(cam.poll_frame(), Err(VisionError::Disconnected));
        cam.release();
        assert_eq!(cam.poll_frame(), Ok(None));
    }

    #[test]
    fn detector_caps_hand_count() {
        let pose = SimHandPose { handedness: Handedness::Left, palm: Landmark::new(0.5, 0.5), pinch_gap: 0.1 };
        let frame = SimFrame { hands: vec![pose; 3] };
        let hands = SyntheticDetector::new(2).detect(&frame, 0.0).unwrap();
        assert_eq!(hands.len(), 2);
    }
}
