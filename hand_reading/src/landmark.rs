//! Raw detector output: keypoints, handedness and the logical hand slots.

// ════════════════════════════════════════════════════════════════════════════
// Anatomical layout
// ════════════════════════════════════════════════════════════════════════════

/// Number of keypoints a conforming detector reports per hand.
pub const LANDMARK_COUNT: usize = 21;

/// Keypoint indices in the detector's fixed anatomical layout.
pub mod index {
    pub const WRIST:      usize = 0;
    pub const THUMB_TIP:  usize = 4;
    pub const INDEX_BASE: usize = 5;
    pub const INDEX_TIP:  usize = 8;
    pub const PINKY_BASE: usize = 17;
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// A single keypoint in normalized image space (0.0–1.0 on both axes,
/// origin top-left, not mirrored).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Landmark { x, y }
    }

    pub fn distance(self, other: Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Handedness / HandSlot
// ════════════════════════════════════════════════════════════════════════════

/// Handedness as reported by the detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Convert a detector category label. Only `"Right"` is treated as a
    /// right hand; every other label falls back to [`Handedness::Left`].
    pub fn from_label(label: &str) -> Self {
        if label == "Right" { Handedness::Right } else { Handedness::Left }
    }

    pub fn label(self) -> &'static str {
        match self {
            Handedness::Left  => "Left",
            Handedness::Right => "Right",
        }
    }

    /// The logical slot this hand feeds. Fixed mapping.
    pub fn slot(self) -> HandSlot {
        match self {
            Handedness::Right => HandSlot::Ui,
            Handedness::Left  => HandSlot::Control,
        }
    }
}

/// Logical hand slot in the interaction snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandSlot {
    /// Drives the orbital controller (user's left hand).
    Control,
    /// Drives the draggable panel (user's right hand).
    Ui,
}

impl From<Handedness> for HandSlot {
    fn from(h: Handedness) -> Self { h.slot() }
}

// ════════════════════════════════════════════════════════════════════════════
// DetectedHand
// ════════════════════════════════════════════════════════════════════════════

/// One hand from a detection result: keypoints plus handedness.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedHand {
    pub landmarks:  Vec<Landmark>,
    pub handedness: Handedness,
}

impl DetectedHand {
    pub fn new(landmarks: Vec<Landmark>, handedness: Handedness) -> Self {
        DetectedHand { landmarks, handedness }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Skeletons: fixed-size copies of detected hands for drawing
// ════════════════════════════════════════════════════════════════════════════

/// Bones between keypoints: thumb, four fingers, and the palm outline.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),   (1, 2),   (2, 3),   (3, 4),
    (0, 5),   (5, 6),   (6, 7),   (7, 8),
    (5, 9),   (9, 10),  (10, 11), (11, 12),
    (9, 13),  (13, 14), (14, 15), (15, 16),
    (13, 17), (0, 17),  (17, 18), (18, 19), (19, 20),
];

/// Most skeletons a [`SkeletonFrame`] holds.
pub const MAX_SKELETONS: usize = 2;

/// One hand's keypoints in raw (unmirrored) camera space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandSkeleton {
    pub handedness: Handedness,
    pub points:     [Landmark; LANDMARK_COUNT],
}

impl HandSkeleton {
    /// `None` when the hand has fewer than [`LANDMARK_COUNT`] keypoints.
    pub fn from_detected(hand: &DetectedHand) -> Option<Self> {
        let points: [Landmark; LANDMARK_COUNT] = hand.landmarks.get(..LANDMARK_COUNT)?.try_into().ok()?;
        Some(HandSkeleton { handedness: hand.handedness, points })
    }

    /// Endpoints of every bone.
    pub fn bones(&self) -> impl Iterator<Item = (Landmark, Landmark)> + '_ {
        HAND_CONNECTIONS.iter().map(move |&(a, b)| (self.points[a], self.points[b]))
    }
}

/// The hands of the most recent detection result, in detector order.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct SkeletonFrame {
    hands: [Option<HandSkeleton>; MAX_SKELETONS],
}

impl SkeletonFrame {
    /// Keep the first [`MAX_SKELETONS`] hands that carry a full keypoint set.
    pub fn from_hands(hands: &[DetectedHand]) -> Self {
        let mut frame = SkeletonFrame::default();
        let full = hands.iter().filter_map(HandSkeleton::from_detected);
        for (slot, skeleton) in frame.hands.iter_mut().zip(full) {
            *slot = Some(skeleton);
        }
        frame
    }

    pub fn iter(&self) -> impl Iterator<Item = &HandSkeleton> {
        self.hands.iter().flatten()
    }

    pub fn len(&self) -> usize { self.iter().count() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_label_maps_to_ui_slot() {
        assert_eq!(Handedness::from_label("Right"), Handedness::Right);
        assert_eq!(HandSlot::from(Handedness::Right), HandSlot::Ui);
    }

    #[test]
    fn other_labels_map_to_control_slot() {
        for label in ["Left", "left", "RIGHT", "", "Unknown"] {
            let h = Handedness::from_label(label);
            assert_eq!(h, Handedness::Left, "label {:?}", label);
            assert_eq!(h.slot(), HandSlot::Control);
        }
    }

    fn hand(n: usize, handedness: Handedness) -> DetectedHand {
        DetectedHand::new((0..n).map(|i| Landmark::new(i as f32 / 100.0, 0.5)).collect(), handedness)
    }

    #[test]
    fn connections_stay_inside_layout() {
        assert!(HAND_CONNECTIONS.iter().all(|&(a, b)| a < LANDMARK_COUNT && b < LANDMARK_COUNT));
        // Every keypoint is on at least one bone.
        for i in 0..LANDMARK_COUNT {
            assert!(HAND_CONNECTIONS.iter().any(|&(a, b)| a == i || b == i), "point {}", i);
        }
    }

    #[test]
    fn skeleton_copies_keypoints() {
        let s = HandSkeleton::from_detected(&hand(21, Handedness::Right)).unwrap();
        assert_eq!(s.handedness, Handedness::Right);
        assert_eq!(s.points[20], Landmark::new(0.2, 0.5));
        assert_eq!(s.bones().count(), HAND_CONNECTIONS.len());
        assert!(HandSkeleton::from_detected(&hand(20, Handedness::Right)).is_none());
    }

    #[test]
    fn skeleton_frame_keeps_first_two_full_hands() {
        let hands = [
            hand(5, Handedness::Left),
            hand(21, Handedness::Left),
            hand(21, Handedness::Right),
            hand(21, Handedness::Right),
        ];
        let frame = SkeletonFrame::from_hands(&hands);
        assert_eq!(frame.len(), 2);
        let sides: Vec<_> = frame.iter().map(|s| s.handedness).collect();
        assert_eq!(sides, vec![Handedness::Left, Handedness::Right]);
        assert!(SkeletonFrame::from_hands(&[]).is_empty());
    }

    #[test]
    fn landmark_distance_is_euclidean() {
        let a = Landmark::new(0.0, 0.0);
        let b = Landmark::new(0.3, 0.4);
        assert!((a.distance(b) - 0.5).abs() < 1e-6);
    }
}
