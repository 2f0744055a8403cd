//! # hand_reading
//!
//! Turns per-frame hand-landmark detections into a continuously updated
//! two-hand interaction snapshot.
//!
//! * [`landmark`]: the 21-keypoint hand layout, handedness, and the
//!   [`SkeletonFrame`] copies drawn by overlays.
//! * [`classifier`]: palm centroid, pinch detection, mirroring and slot
//!   assignment for one detected hand (or a whole frame of them).
//! * [`reading`]: the [`HandReading`] / [`InteractionSnapshot`] data model
//!   and the decay-to-absent merge rule.
//! * [`store`]: single-writer / many-reader state cells used to share the
//!   snapshot (and any other per-frame value) between cooperative loops.
//!
//! ## Hand → slot mapping
//!
//! | Detector label | Slot | Drives |
//! |---|---|---|
//! | `Right` | [`HandSlot::Ui`] | the floating panel |
//! | `Left` / anything else | [`HandSlot::Control`] | the 3D object |
//!
//! ## Quick start
//!
//! ```rust
//! use hand_reading::{
//!     classify_frame, state_cell, DetectedHand, Handedness, InteractionSnapshot,
//!     Landmark, Viewport,
//! };
//!
//! let (writer, reader) = state_cell(InteractionSnapshot::default());
//! let hand = DetectedHand::new(vec![Landmark::new(0.5, 0.5); 21], Handedness::Left);
//!
//! let frame = classify_frame(&[hand], Viewport::new(1280.0, 720.0));
//! writer.publish_frame(&frame);
//!
//! assert!(reader.get().control.present);
//! assert!(!reader.get().ui.present);
//! ```

pub mod landmark;
pub mod reading;
pub mod classifier;
pub mod store;

pub use landmark::{
    DetectedHand, HandSkeleton, HandSlot, Handedness, Landmark, SkeletonFrame, HAND_CONNECTIONS,
    LANDMARK_COUNT, MAX_SKELETONS,
};
pub use reading::{FrameReadings, HandReading, InteractionSnapshot, Pinch, Point2, Viewport};
pub use classifier::{classify_frame, classify_hand, palm_centroid, pinch_distance, LandmarkError, PINCH_THRESHOLD};
pub use store::{state_cell, StateReader, StateWriter};
