//! The vision loop: capture → detect → classify → publish.
//!
//! The loop is a [`FrameTask`] that polls its [`CaptureDevice`] every
//! scheduler frame but only does work when the device has a *new* frame,
//! so it advances at the camera/inference rate, not the display rate.
//! It is the only writer of the interaction snapshot.
//!
//! Nothing that goes wrong in here reaches the render tasks: a failed
//! setup means the loop is never scheduled, a failed detection is treated
//! as "no hands this frame", and a lost device stops the loop with both
//! hands decayed to absent.
//!
//! Alongside the snapshot the loop publishes the raw keypoints of the last
//! frame as a [`SkeletonFrame`] for the overlay; it is the only writer of
//! that cell too.

use std::fmt;
use std::time::Instant;

use hand_reading::{
    classify_frame, DetectedHand, FrameReadings, InteractionSnapshot, SkeletonFrame, StateWriter,
    Viewport,
};

use crate::scheduler::{Flow, FrameTask, FrameTick};

// ════════════════════════════════════════════════════════════════════════════
// Boundary traits
// ════════════════════════════════════════════════════════════════════════════

/// A source of video (or tracking) frames.
pub trait CaptureDevice {
    type Frame;

    /// `Ok(Some(_))` when a new frame is available since the last call,
    /// `Ok(None)` when not yet, and `Err(VisionError::Disconnected)` once
    /// the device is gone for good.
    fn poll_frame(&mut self) -> Result<Option<Self::Frame>, VisionError>;

    /// Stop capturing and give the device back to the system.
    fn release(&mut self);
}

/// Turns a captured frame into per-hand landmark sets.
pub trait HandDetector<F> {
    fn detect(&mut self, frame: &F, timestamp_ms: f64) -> Result<Vec<DetectedHand>, VisionError>;
}

// ════════════════════════════════════════════════════════════════════════════
// VisionError / VisionStatus
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum VisionError {
    /// Camera/tracker could not be opened (missing device, permission).
    DeviceUnavailable(String),
    /// The detector failed on one frame.
    Detection(String),
    /// The device went away mid-session.
    Disconnected,
}

impl fmt::Display for VisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisionError::DeviceUnavailable(why) => write!(f, "capture device unavailable: {}", why),
            VisionError::Detection(why)         => write!(f, "hand detection failed: {}", why),
            VisionError::Disconnected           => write!(f, "capture device disconnected"),
        }
    }
}

impl std::error::Error for VisionError {}

/// Drives the "initializing sensors" indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VisionStatus {
    #[default]
    Initializing,
    /// At least one frame has been processed.
    Live,
    /// Setup failed or the device was lost; hands stay absent from here on.
    Failed,
}

/// The cells the vision loop writes. It holds the only writer of each.
pub struct VisionWriters {
    pub snapshot:  StateWriter<InteractionSnapshot>,
    pub skeletons: StateWriter<SkeletonFrame>,
    pub status:    StateWriter<VisionStatus>,
}

// ════════════════════════════════════════════════════════════════════════════
// VisionLoop
// ════════════════════════════════════════════════════════════════════════════

pub struct VisionLoop<C, D>
where
    C: CaptureDevice,
    D: HandDetector<C::Frame>,
{
    capture:  C,
    detector: D,
    out:      VisionWriters,
    viewport: Viewport,
    started:  Instant,
    frames:   u64,
    released: bool,
}

impl<C, D> VisionLoop<C, D>
where
    C: CaptureDevice,
    D: HandDetector<C::Frame>,
{
    pub fn new(capture: C, detector: D, out: VisionWriters, viewport: Viewport) -> Self {
        VisionLoop {
            capture,
            detector,
            out,
            viewport,
            started:  Instant::now(),
            frames:   0,
            released: false,
        }
    }

    pub fn frames_processed(&self) -> u64 { self.frames }

    pub fn is_released(&self) -> bool { self.released }

    fn process(&mut self, frame: &C::Frame) {
        let timestamp_ms = self.started.elapsed().as_secs_f64() * 1000.0;

        match self.detector.detect(frame, timestamp_ms) {
            Ok(hands) => {
                self.out.snapshot.publish_frame(&classify_frame(&hands, self.viewport));
                self.out.skeletons.set(SkeletonFrame::from_hands(&hands));
            }
            Err(e) => {
                log::warn!("frame {}: {}; treating as no hands", self.frames, e);
                self.clear_hands();
            }
        }

        if self.frames == 0 {
            log::info!("vision loop live");
            self.out.status.set(VisionStatus::Live);
        }
        self.frames += 1;
    }

    fn clear_hands(&mut self) {
        self.out.snapshot.publish_frame(&FrameReadings::default());
        self.out.skeletons.set(SkeletonFrame::default());
    }

    fn release_capture(&mut self) {
        if !self.released {
            self.capture.release();
            self.released = true;
            log::info!("capture device released after {} frames", self.frames);
        }
    }
}

impl<C, D> FrameTask for VisionLoop<C, D>
where
    C: CaptureDevice,
    D: HandDetector<C::Frame>,
{
    fn name(&self) -> &'static str { "vision" }

    fn step(&mut self, _tick: &FrameTick) -> Flow {
        if self.released {
            return Flow::Stop;
        }
        match self.capture.poll_frame() {
            Ok(Some(frame)) => self.process(&frame),
            Ok(None) => {}
            Err(e) => {
                log::error!("vision loop stopping after {} frames: {}", self.frames, e);
                self.clear_hands();
                self.out.status.set(VisionStatus::Failed);
                self.release_capture();
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    fn teardown(&mut self) {
        self.release_capture();
    }
}

impl<C, D> Drop for VisionLoop<C, D>
where
    C: CaptureDevice,
    D: HandDetector<C::Frame>,
{
    fn drop(&mut self) {
        self.release_capture();
    }
}

/// Open a backend and build the loop.
///
/// On failure the error is logged, the status cell is set to
/// [`VisionStatus::Failed`] and `None` is returned; the other writers are
/// dropped so every reader keeps seeing absent hands.
pub fn start_vision<C, D, F>(
    open:     F,
    out:      VisionWriters,
    viewport: Viewport,
) -> Option<VisionLoop<C, D>>
where
    C: CaptureDevice,
    D: HandDetector<C::Frame>,
    F: FnOnce() -> Result<(C, D), VisionError>,
{
    match open() {
        Ok((capture, detector)) => {
            log::info!("vision backend opened ({}x{} viewport)", viewport.width, viewport.height);
            Some(VisionLoop::new(capture, detector, out, viewport))
        }
        Err(e) => {
            log::error!("vision loop not started: {}", e);
            out.status.set(VisionStatus::Failed);
            None
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::time::Duration;

    use hand_reading::{state_cell, Handedness, Landmark, StateReader};

    use crate::scheduler::FrameClock;

    const VIEW: Viewport = Viewport::new(800.0, 600.0);

    type Detection = Result<Vec<DetectedHand>, VisionError>;

    /// What the camera does on one poll.
    enum Poll {
        Nothing,
        Frame(Detection),
        Lost,
    }

    type Script = VecDeque<Poll>;

    struct ScriptedCamera {
        script:   Script,
        releases: Rc<Cell<u32>>,
    }

    impl CaptureDevice for ScriptedCamera {
        type Frame = Detection;
        fn poll_frame(&mut self) -> Result<Option<Detection>, VisionError> {
            match self.script.pop_front() {
                Some(Poll::Frame(f))       => Ok(Some(f)),
                Some(Poll::Nothing) | None => Ok(None),
                Some(Poll::Lost)           => Err(VisionError::Disconnected),
            }
        }
        fn release(&mut self) {
            self.releases.set(self.releases.get() + 1);
        }
    }

    struct EchoDetector;

    impl HandDetector<Detection> for EchoDetector {
        fn detect(&mut self, frame: &Detection, _timestamp_ms: f64) -> Detection {
            frame.clone()
        }
    }

    fn hand(raw_x: f32, handedness: Handedness) -> DetectedHand {
        DetectedHand::new(vec![Landmark::new(raw_x, 0.5); 21], handedness)
    }

    type Readers = (StateReader<InteractionSnapshot>, StateReader<SkeletonFrame>, StateReader<VisionStatus>);

    fn cells() -> (VisionWriters, Readers) {
        let (snapshot, hands) = state_cell(InteractionSnapshot::default());
        let (skeletons, bones) = state_cell(SkeletonFrame::default());
        let (status, status_r) = state_cell(VisionStatus::Initializing);
        (VisionWriters { snapshot, skeletons, status }, (hands, bones, status_r))
    }

    struct Rig {
        vision:    VisionLoop<ScriptedCamera, EchoDetector>,
        hands:     StateReader<InteractionSnapshot>,
        skeletons: StateReader<SkeletonFrame>,
        status:    StateReader<VisionStatus>,
        releases:  Rc<Cell<u32>>,
        clock:     FrameClock,
    }

    impl Rig {
        fn new(script: Script) -> Self {
            let (out, (hands, skeletons, status)) = cells();
            let releases = Rc::new(Cell::new(0));
            let camera = ScriptedCamera { script, releases: releases.clone() };
            let vision = VisionLoop::new(camera, EchoDetector, out, VIEW);
            Rig { vision, hands, skeletons, status, releases, clock: FrameClock::new() }
        }

        fn step(&mut self) -> Flow {
            let tick = self.clock.advance(Duration::from_millis(16));
            self.vision.step(&tick)
        }
    }

    #[test]
    fn advances_only_on_new_frames() {
        let script: Script = vec![
            Poll::Nothing,
            Poll::Frame(Ok(vec![hand(0.2, Handedness::Left)])),
            Poll::Nothing,
            Poll::Nothing,
            Poll::Frame(Ok(vec![])),
        ].into();
        let mut rig = Rig::new(script);

        rig.step();
        assert_eq!(rig.vision.frames_processed(), 0);
        assert_eq!(rig.status.get(), VisionStatus::Initializing);

        rig.step();
        assert_eq!(rig.vision.frames_processed(), 1);
        assert_eq!(rig.status.get(), VisionStatus::Live);
        assert!(rig.hands.get().control.present);

        rig.step();
        rig.step();
        assert_eq!(rig.vision.frames_processed(), 1);
        assert!(rig.hands.get().control.present);

        rig.step();
        assert_eq!(rig.vision.frames_processed(), 2);
        assert!(!rig.hands.get().control.present);
    }

    #[test]
    fn skeletons_follow_each_processed_frame() {
        let script: Script = vec![
            Poll::Frame(Ok(vec![hand(0.2, Handedness::Left), hand(0.7, Handedness::Right)])),
            Poll::Nothing,
            Poll::Frame(Ok(vec![hand(0.7, Handedness::Right)])),
        ].into();
        let mut rig = Rig::new(script);
        assert!(rig.skeletons.get().is_empty());

        rig.step();
        assert_eq!(rig.skeletons.get().len(), 2);
        rig.step();
        assert_eq!(rig.skeletons.get().len(), 2);
        rig.step();
        let frame = rig.skeletons.get();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.iter().next().map(|s| s.points[0].x), Some(0.7));
    }

    #[test]
    fn detector_error_decays_both_hands() {
        let script: Script = vec![
            Poll::Frame(Ok(vec![hand(0.2, Handedness::Left), hand(0.7, Handedness::Right)])),
            Poll::Frame(Err(VisionError::Detection("gpu lost".into()))),
        ].into();
        let mut rig = Rig::new(script);

        assert_eq!(rig.step(), Flow::Continue);
        let before = rig.hands.get();
        assert!(before.control.present && before.ui.present);

        assert_eq!(rig.step(), Flow::Continue);
        let after = rig.hands.get();
        assert!(!after.control.present);
        assert!(!after.ui.present);
        assert_eq!(after.ui.position, before.ui.position);
        assert!(rig.skeletons.get().is_empty());
    }

    #[test]
    fn lost_device_stops_loop_and_releases() {
        let script: Script = vec![
            Poll::Frame(Ok(vec![hand(0.2, Handedness::Left), hand(0.7, Handedness::Right)])),
            Poll::Lost,
            Poll::Frame(Ok(vec![hand(0.2, Handedness::Left)])),
        ].into();
        let mut rig = Rig::new(script);

        assert_eq!(rig.step(), Flow::Continue);
        let before = rig.hands.get();

        assert_eq!(rig.step(), Flow::Stop);
        let after = rig.hands.get();
        assert!(!after.control.present && !after.ui.present);
        assert_eq!(after.control.position, before.control.position);
        assert!(rig.skeletons.get().is_empty());
        assert_eq!(rig.status.get(), VisionStatus::Failed);
        assert!(rig.vision.is_released());
        assert_eq!(rig.releases.get(), 1);

        // Stays stopped; nothing else is read from the device.
        assert_eq!(rig.step(), Flow::Stop);
        assert_eq!(rig.vision.frames_processed(), 1);
        rig.vision.teardown();
        assert_eq!(rig.releases.get(), 1);
    }

    #[test]
    fn teardown_releases_capture_once() {
        let mut rig = Rig::new(VecDeque::new());
        rig.step();
        rig.vision.teardown();
        rig.vision.teardown();
        assert!(rig.vision.is_released());
        assert_eq!(rig.step(), Flow::Stop);
        let releases = rig.releases.clone();
        drop(rig);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn drop_without_teardown_still_releases() {
        let rig = Rig::new(VecDeque::new());
        let releases = rig.releases.clone();
        drop(rig);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn failed_setup_reports_and_schedules_nothing() {
        let (out, (hands, skeletons, status)) = cells();

        let vision = start_vision::<ScriptedCamera, EchoDetector, _>(
            || Err(VisionError::DeviceUnavailable("permission denied".into())),
            out,
            VIEW,
        );

        assert!(vision.is_none());
        assert_eq!(status.get(), VisionStatus::Failed);
        assert!(!hands.get().control.present);
        assert!(!hands.get().ui.present);
        assert!(skeletons.get().is_empty());
    }

    #[test]
    fn successful_setup_returns_loop() {
        let (out, (_hands, _skeletons, status)) = cells();
        let releases = Rc::new(Cell::new(0));
        let r = releases.clone();

        let vision = start_vision(
            move || Ok((ScriptedCamera { script: VecDeque::new(), releases: r }, EchoDetector)),
            out,
            VIEW,
        );

        assert!(vision.is_some());
        assert_eq!(status.get(), VisionStatus::Initializing);
        drop(vision);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn error_display_names_the_cause() {
        let e = VisionError::DeviceUnavailable("no camera".into());
        assert_eq!(e.to_string(), "capture device unavailable: no camera");
        assert_eq!(VisionError::Disconnected.to_string(), "capture device disconnected");
    }
}
