//! # holo_globe
//!
//! Two-hand gesture control for a holographic globe and a floating info
//! panel, driven by per-frame hand-landmark detections.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Hand | Action |
//! |---|---|---|
//! | Move palm left/right | Left (control) | Spin the globe (yaw, ±2π across the frame) |
//! | Move palm up/down | Left (control) | Tilt the globe (pitch, ±π/2) |
//! | Thumb/index spread | Left (control) | Zoom (scale 0.5 to 2.5) |
//! | No control hand | | Globe idles: slow spin, tilt and zoom relax |
//! | Pinch | Right (UI) | Grab the panel; it follows the palm until released |
//!
//! The panel shows which region of the globe faces the viewer, updated
//! twice a second.
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**, mouse and keyboard stand in for hands.
//! * `leap`: **Hardware mode**, polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | `L` | Show/hide the control hand |
//! | `R` | Show/hide the UI hand |
//! | Arrow keys | Move the control hand |
//! | `Z` / `X` | Narrow / widen the control hand's pinch (zoom) |
//! | Mouse | Move the UI hand |
//! | Left button | Pinch the UI hand |
//! | `Q` / `Escape` | Quit |

pub mod scheduler;
pub mod vision;
pub mod backend;
pub mod orbit;
pub mod region;
pub mod drag;
pub mod visualizer;
pub mod app;
