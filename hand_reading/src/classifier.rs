//! Landmark classifier: one detected hand in, one normalized reading out.
//!
//! # Algorithm
//!
//! 1. **Palm centroid**: mean of wrist (0), index base (5) and pinky base (17).
//! 2. **Pinch**: Euclidean distance between thumb tip (4) and index tip (8);
//!    active iff strictly below [`PINCH_THRESHOLD`].
//! 3. **Mirroring**: `x = 1 − raw_x`, so the scene reacts like a mirror.
//! 4. **Slot**: from handedness only, never from spatial proximity.
//! 5. **Screen position**: the mirrored position scaled by the viewport.

use std::fmt;

use crate::landmark::{index, DetectedHand, HandSlot, Landmark, LANDMARK_COUNT};
use crate::reading::{FrameReadings, HandReading, Pinch, Point2, Viewport};

/// Thumb/index distance (normalized units) below which a pinch is active.
pub const PINCH_THRESHOLD: f32 = 0.05;

// ════════════════════════════════════════════════════════════════════════════
// LandmarkError
// ════════════════════════════════════════════════════════════════════════════

/// Why a detected hand could not be turned into a reading.
#[derive(Clone, Debug, PartialEq)]
pub enum LandmarkError {
    /// Fewer keypoints than the anatomical layout requires.
    MissingLandmarks { found: usize },
    /// A keypoint the classifier reads is NaN or infinite.
    NonFiniteCoordinate { index: usize },
}

impl fmt::Display for LandmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandmarkError::MissingLandmarks { found } => {
                write!(f, "expected {} landmarks, found {}", LANDMARK_COUNT, found)
            }
            LandmarkError::NonFiniteCoordinate { index } => {
                write!(f, "landmark {} has a non-finite coordinate", index)
            }
        }
    }
}

impl std::error::Error for LandmarkError {}

// ════════════════════════════════════════════════════════════════════════════
// Geometry helpers
// ════════════════════════════════════════════════════════════════════════════

fn landmark(points: &[Landmark], i: usize) -> Result<Landmark, LandmarkError> {
    let p = points
        .get(i)
        .copied()
        .ok_or(LandmarkError::MissingLandmarks { found: points.len() })?;
    if p.is_finite() { Ok(p) } else { Err(LandmarkError::NonFiniteCoordinate { index: i }) }
}

/// Raw (unmirrored) palm centroid.
pub fn palm_centroid(points: &[Landmark]) -> Result<Landmark, LandmarkError> {
    let wrist = landmark(points, index::WRIST)?;
    let first = landmark(points, index::INDEX_BASE)?;
    let pinky = landmark(points, index::PINKY_BASE)?;
    Ok(Landmark::new(
        (wrist.x + first.x + pinky.x) / 3.0,
        (wrist.y + first.y + pinky.y) / 3.0,
    ))
}

/// Thumb-tip to index-tip distance in normalized space.
pub fn pinch_distance(points: &[Landmark]) -> Result<f32, LandmarkError> {
    let thumb = landmark(points, index::THUMB_TIP)?;
    let tip   = landmark(points, index::INDEX_TIP)?;
    Ok(thumb.distance(tip))
}

impl Pinch {
    pub fn from_distance(distance: f32) -> Self {
        Pinch { active: distance < PINCH_THRESHOLD, distance }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Classification
// ════════════════════════════════════════════════════════════════════════════

/// Classify one hand into its slot and reading.
pub fn classify_hand(
    hand: &DetectedHand,
    viewport: Viewport,
) -> Result<(HandSlot, HandReading), LandmarkError> {
    if hand.landmarks.len() < LANDMARK_COUNT {
        return Err(LandmarkError::MissingLandmarks { found: hand.landmarks.len() });
    }

    let palm     = palm_centroid(&hand.landmarks)?;
    let distance = pinch_distance(&hand.landmarks)?;
    let position = Point2::new(1.0 - palm.x, palm.y);

    let reading = HandReading {
        present: true,
        position,
        pinch: Pinch::from_distance(distance),
        screen_position: viewport.to_screen(position),
    };
    Ok((hand.handedness.slot(), reading))
}

/// Classify a whole detection result.
///
/// The first well-formed hand of each handedness fills its slot; later hands
/// of the same handedness are ignored. Malformed hands are skipped and do
/// not claim a slot.
pub fn classify_frame(hands: &[DetectedHand], viewport: Viewport) -> FrameReadings {
    let mut frame = FrameReadings::default();

    for (i, hand) in hands.iter().enumerate() {
        if frame.get(hand.handedness.slot()).is_some() {
            log::debug!("ignoring extra {} hand #{} in frame", hand.handedness.label(), i);
            continue;
        }
        match classify_hand(hand, viewport) {
            Ok((slot, reading)) => *frame.slot_mut(slot) = Some(reading),
            Err(e) => log::warn!("skipping {} hand #{}: {}", hand.handedness.label(), i, e),
        }
    }

    frame
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
