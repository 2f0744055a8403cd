//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                                         ┌─ panel (draggable) ──┐ │
//! │                .-~~~-.                  │ REGION               │ │
//! │             .'  ring  '.                │ Americas             │ │
//! │            (   globe    )               │ LOCK: ENGAGED        │ │
//! │             '.        .'                └──────────────────────┘ │
//! │                '-...-'        o  palm cursors, hand skeletons    │
//! │                                                                  │
//! │  ■ L-HAND (EARTH)  [CONNECTED]                                   │
//! │  ■ R-HAND (PANEL)  [SEARCHING]                      key legend   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With neither hand in view (and the sensors not offline) a boxed
//! "INITIALIZE HAND TRACKING" prompt sits over the centre.
//!
//! Drawing goes into a [`Canvas`] so a whole scene can be painted (and
//! tested) without opening a window; [`Visualizer`] owns the window, turns
//! mouse/keyboard into [`SimInput`]s and presents the canvas.

use std::f32::consts::{PI, TAU};
use std::sync::mpsc::Sender;

use anyhow::anyhow;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use hand_reading::{Handedness, HandReading, HandSkeleton, InteractionSnapshot, Landmark, SkeletonFrame};

use crate::app::AppConfig;
use crate::backend::SimInput;
use crate::drag::PanelView;
use crate::orbit::OrbitView;
use crate::region::RegionLabel;
use crate::vision::VisionStatus;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const PANEL_W:     usize = 300;
pub const PANEL_H:     usize = 110;
const BG_COLOR:        u32   = 0xFF05070F;
const PANEL_BG:        u32   = 0xFF0A1A2A;
const GLOBE_FRONT:     u32   = 0xFF00C8FF;
const GLOBE_BACK:      u32   = 0xFF0A3040;
const CLOUD_COLOR:     u32   = 0xFFDDEEFF;
const CAGE_COLOR:      u32   = 0xFF1E5A78;
const RING_COLOR:      u32   = 0xFF3A7FA0;
const TEXT_COLOR:      u32   = 0xFFE0F8FF;
const DIM_TEXT:        u32   = 0xFF6A8899;
const PRESENT_COLOR:   u32   = 0xFF30FF80;
const ABSENT_COLOR:    u32   = 0xFF404850;
const CONTROL_CURSOR:  u32   = 0xFFFFB030;
const UI_CURSOR:       u32   = 0xFF30FFD0;
const BANNER_COLOR:    u32   = 0xFFFFD700;
const FAILED_COLOR:    u32   = 0xFFFF5050;
const BONE_COLOR:      u32   = 0xFF00FFFF;
const JOINT_COLOR:     u32   = 0xFFFFFFFF;
const PROMPT_COLOR:    u32   = 0xFF00B8D4;

const JOINT_RADIUS:    f32   = 3.0;
const PROMPT_W:        usize = 300;
const PROMPT_H:        usize = 60;

/// Globe radius as a fraction of the shorter window side, at scale 1.
const GLOBE_RADIUS_FRAC: f32 = 0.22;
const RING_RADII:        [f32; 2] = [1.4, 1.6];
const CLOUD_RADIUS:      f32 = 1.03;
const CAGE_RADIUS:       f32 = 1.08;
const SEGMENTS:          usize = 64;

/// Arrow keys move the simulated control hand this far per frame.
const NUDGE_STEP:  f32 = 0.01;
/// Z / X change the simulated control hand's pinch gap this much per frame.
const SPREAD_STEP: f32 = 0.005;

/// Everything the renderer reads in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneFrame {
    pub orbit:     OrbitView,
    pub region:    RegionLabel,
    pub panel:     PanelView,
    pub hands:     InteractionSnapshot,
    pub skeletons: SkeletonFrame,
    pub status:    VisionStatus,
}

/// Tracking state shown beside a hand's name.
pub fn presence_label(present: bool) -> &'static str {
    if present { "[CONNECTED]" } else { "[SEARCHING]" }
}

// ════════════════════════════════════════════════════════════════════════════
// Globe projection
// ════════════════════════════════════════════════════════════════════════════

/// Rotate a point on the unit globe by the orbital yaw (about the vertical
/// axis) then pitch (about the horizontal axis) and project it
/// orthographically. Returns screen-space offsets (y down) and depth
/// (positive = facing the viewer).
pub fn project(p: [f32; 3], yaw: f32, pitch: f32) -> ([f32; 2], f32) {
    let ((sy, cy), (sp, cp)) = (yaw.sin_cos(), pitch.sin_cos());
    let x = p[0] * cy + p[2] * sy;
    let z = -p[0] * sy + p[2] * cy;
    let y = p[1] * cp - z * sp;
    let depth = p[1] * sp + z * cp;
    ([x, -y], depth)
}

/// Point on a sphere of radius `r` at latitude/longitude (radians).
fn sphere_point(r: f32, lat: f32, lon: f32) -> [f32; 3] {
    let ((sl, cl), (so, co)) = (lat.sin_cos(), lon.sin_cos());
    [r * cl * so, r * sl, r * cl * co]
}

struct GlobeCamera {
    cx:     f32,
    cy:     f32,
    radius: f32,
    pitch:  f32,
}

impl GlobeCamera {
    fn screen(&self, p: [f32; 3], yaw: f32) -> (f32, f32, f32) {
        let ([x, y], depth) = project(p, yaw, self.pitch);
        (self.cx + x * self.radius, self.cy + y * self.radius, depth)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas
// ════════════════════════════════════════════════════════════════════════════

/// ARGB framebuffer with the primitives the scene needs.
pub struct Canvas {
    w:   usize,
    h:   usize,
    buf: Vec<u32>,
}

impl Canvas {
    pub fn new(w: usize, h: usize) -> Self {
        let (w, h) = (w.max(1), h.max(1));
        Canvas { w, h, buf: vec![BG_COLOR; w * h] }
    }

    pub fn width(&self)  -> usize { self.w }
    pub fn height(&self) -> usize { self.h }
    pub fn pixels(&self) -> &[u32] { &self.buf }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.w && y < self.h).then(|| self.buf[y * self.w + x])
    }

    /// Paint one whole frame.
    pub fn paint(&mut self, scene: &SceneFrame) {
        self.buf.fill(BG_COLOR);

        self.draw_globe(&scene.orbit);
        self.draw_panel(&scene.panel, scene.region);
        for skeleton in scene.skeletons.iter() {
            self.draw_skeleton(skeleton);
        }
        self.draw_cursor(&scene.hands.control, CONTROL_CURSOR);
        self.draw_cursor(&scene.hands.ui, UI_CURSOR);
        self.draw_presence(&scene.hands);
        self.draw_status(scene.status);
        if !scene.hands.control.present && !scene.hands.ui.present && scene.status != VisionStatus::Failed {
            self.draw_tracking_prompt();
        }

        self.draw_label(
            "MOUSE=UI HAND  CLICK=PINCH  L/R=SHOW HAND  ARROWS=MOVE  Z/X=ZOOM  Q=QUIT",
            10, self.h.saturating_sub(16), 1, DIM_TEXT,
        );
    }

    // ── Globe ─────────────────────────────────────────────────────────────

    fn draw_globe(&mut self, orbit: &OrbitView) {
        let cam = GlobeCamera {
            cx:     self.w as f32 * 0.4,
            cy:     self.h as f32 * 0.5,
            radius: self.w.min(self.h) as f32 * GLOBE_RADIUS_FRAC * orbit.scale,
            pitch:  orbit.pitch,
        };

        // Rings lie in the equatorial plane, behind everything else.
        for r in RING_RADII {
            self.draw_curve(&cam, orbit.yaw, |t| sphere_point(r, 0.0, t * TAU), RING_COLOR, RING_COLOR);
        }

        // Parallels every 30°, meridians every 30°.
        for i in -2..=2 {
            let lat = i as f32 * PI / 6.0;
            self.draw_curve(&cam, orbit.yaw, |t| sphere_point(1.0, lat, t * TAU), GLOBE_FRONT, GLOBE_BACK);
        }
        for i in 0..12 {
            let lon = i as f32 * PI / 6.0;
            self.draw_curve(&cam, orbit.yaw, |t| sphere_point(1.0, (t - 0.5) * PI, lon), GLOBE_FRONT, GLOBE_BACK);
        }

        // Wireframe cage: coarser meridians drifting the other way.
        let cage_yaw = orbit.yaw + orbit.wireframe_yaw;
        for i in 0..8 {
            let lon = i as f32 * PI / 4.0;
            self.draw_curve(&cam, cage_yaw, |t| sphere_point(CAGE_RADIUS, (t - 0.5) * PI, lon), CAGE_COLOR, BG_COLOR);
        }

        // Cloud layer: sparse dots, front hemisphere only.
        let cloud_yaw = orbit.yaw + orbit.cloud_yaw;
        for band in [-0.9_f32, -0.35, 0.2, 0.7] {
            for k in 0..24 {
                let lon = k as f32 * TAU / 24.0 + band * 3.0;
                let (x, y, depth) = cam.screen(sphere_point(CLOUD_RADIUS, band, lon), cloud_yaw);
                if depth > 0.0 {
                    self.fill_disc(x, y, 1.5, CLOUD_COLOR);
                }
            }
        }
    }

    /// Polyline through `SEGMENTS + 1` samples of `curve(t)`, t ∈ [0, 1].
    fn draw_curve<F>(&mut self, cam: &GlobeCamera, yaw: f32, curve: F, front: u32, back: u32)
    where
        F: Fn(f32) -> [f32; 3],
    {
        let mut prev = cam.screen(curve(0.0), yaw);
        for s in 1..=SEGMENTS {
            let next = cam.screen(curve(s as f32 / SEGMENTS as f32), yaw);
            let color = if prev.2 + next.2 >= 0.0 { front } else { back };
            if color != BG_COLOR {
                self.draw_line(prev.0, prev.1, next.0, next.1, color);
            }
            prev = next;
        }
    }

    // ── Panel ─────────────────────────────────────────────────────────────

    fn draw_panel(&mut self, panel: &PanelView, region: RegionLabel) {
        let x = panel.position.x.round().max(0.0) as usize;
        let y = panel.position.y.round().max(0.0) as usize;
        if x >= self.w || y >= self.h { return; }

        self.fill_rect(x, y, PANEL_W, PANEL_H, PANEL_BG);
        self.draw_border(x, y, PANEL_W, PANEL_H, panel.border_color());
        self.draw_border(x + 1, y + 1, PANEL_W - 2, PANEL_H - 2, panel.border_color());

        self.draw_label("REGION", x + 12, y + 12, 2, DIM_TEXT);
        self.draw_label(region.name(), x + 12, y + 36, 3, TEXT_COLOR);
        self.draw_label(panel.state.lock_label(), x + 12, y + 80, 2, panel.border_color());
    }

    // ── Hands ─────────────────────────────────────────────────────────────

    fn draw_cursor(&mut self, hand: &HandReading, color: u32) {
        if !hand.present { return; }
        let p = hand.screen_position;
        if hand.is_pinching() {
            self.fill_disc(p.x, p.y, 8.0, color);
        } else {
            self.draw_circle(p.x, p.y, 10.0, color);
        }
    }

    /// Camera keypoints are unmirrored; flip x so the overlay lines up with
    /// the palm cursors.
    fn to_screen(&self, p: Landmark) -> (f32, f32) {
        ((1.0 - p.x) * self.w as f32, p.y * self.h as f32)
    }

    fn draw_skeleton(&mut self, skeleton: &HandSkeleton) {
        for (a, b) in skeleton.bones() {
            let ((x0, y0), (x1, y1)) = (self.to_screen(a), self.to_screen(b));
            self.draw_line(x0, y0, x1, y1, BONE_COLOR);
        }
        for p in skeleton.points {
            let (x, y) = self.to_screen(p);
            self.fill_disc(x, y, JOINT_RADIUS, JOINT_COLOR);
            self.draw_circle(x, y, JOINT_RADIUS + 1.0, BONE_COLOR);
        }
    }

    fn draw_presence(&mut self, hands: &InteractionSnapshot) {
        let top = self.h.saturating_sub(64);
        let rows = [(hands.control, "L-HAND (EARTH)"), (hands.ui, "R-HAND (PANEL)")];
        for (i, (hand, name)) in rows.iter().enumerate() {
            let (x, y) = (10, top + i * 24);
            let color = if hand.present { PRESENT_COLOR } else { ABSENT_COLOR };
            self.fill_rect(x, y, 12, 12, color);
            self.draw_label(name, x + 18, y + 1, 2, color);
            self.draw_label(presence_label(hand.present), x + 142, y + 1, 2, color);
        }
    }

    fn draw_tracking_prompt(&mut self) {
        let x = self.w.saturating_sub(PROMPT_W) / 2;
        let y = self.h.saturating_sub(PROMPT_H) / 2;
        self.fill_rect(x, y, PROMPT_W, PROMPT_H, BG_COLOR);
        self.draw_border(x, y, PROMPT_W, PROMPT_H, PROMPT_COLOR);
        self.draw_label_centred("INITIALIZE HAND TRACKING", x, PROMPT_W, y + 14, 2, PROMPT_COLOR);
        self.draw_label_centred("RAISE HANDS TO CAMERA", x, PROMPT_W, y + 40, 1, PROMPT_COLOR);
    }

    fn draw_status(&mut self, status: VisionStatus) {
        let (text, color) = match status {
            VisionStatus::Initializing => ("INITIALIZING SENSORS...", BANNER_COLOR),
            VisionStatus::Failed       => ("SENSORS OFFLINE", FAILED_COLOR),
            VisionStatus::Live         => return,
        };
        self.draw_label_centred(text, 0, self.w, 24, 3, color);
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(self.h) {
            for col in x..(x+w).min(self.w) {
                self.buf[row * self.w + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x+w).min(self.w) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y+h).min(self.h) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.w && y < self.h {
            self.buf[y * self.w + x] = color;
        }
    }

    fn plot(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    /// Bresenham.
    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: u32) {
        let (mut x, mut y) = (x0.round() as isize, y0.round() as isize);
        let (x1, y1) = (x1.round() as isize, y1.round() as isize);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.plot(x, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    fn draw_circle(&mut self, cx: f32, cy: f32, r: f32, color: u32) {
        let steps = 32;
        for i in 0..steps {
            let (s0, c0) = (i as f32 * TAU / steps as f32).sin_cos();
            let (s1, c1) = ((i + 1) as f32 * TAU / steps as f32).sin_cos();
            self.draw_line(cx + r * c0, cy + r * s0, cx + r * c1, cy + r * s1, color);
        }
    }

    fn fill_disc(&mut self, cx: f32, cy: f32, r: f32, color: u32) {
        let ri = r.ceil() as isize;
        let (ox, oy) = (cx.round() as isize, cy.round() as isize);
        for dy in -ri..=ri {
            for dx in -ri..=ri {
                if ((dx * dx + dy * dy) as f32) <= r * r {
                    self.plot(ox + dx, oy + dy, color);
                }
            }
        }
    }

    /// Label centred in the span `x..x + span`.
    fn draw_label_centred(&mut self, text: &str, x: usize, span: usize, y: usize, scale: usize, color: u32) {
        let width = text.chars().count() * 4 * scale;
        self.draw_label(text, x + span.saturating_sub(width) / 2, y, scale, color);
    }

    /// Minimal bitmap font: 3×5 glyphs, each pixel drawn as a
    /// `scale`×`scale` block.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale;
            if cx + 4 * scale > self.w { break; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:  Window,
    canvas:  Canvas,
    sim_tx:  Sender<SimInput>,
    pointer: Option<(f32, f32)>,
    pinched: bool,
}

impl Visualizer {
    pub fn new(cfg: &AppConfig, sim_tx: Sender<SimInput>) -> anyhow::Result<Self> {
        let (w, h) = (cfg.viewport.width as usize, cfg.viewport.height as usize);
        let mut window = Window::new(
            &cfg.title,
            w, h,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow!("cannot open {}x{} window: {}", w, h, e))?;

        window.limit_update_rate(Some(cfg.frame_interval));
        log::info!("window open ({}x{})", w, h);

        Ok(Visualizer {
            window,
            canvas: Canvas::new(w, h),
            sim_tx,
            pointer: None,
            pinched: false,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll mouse/keyboard and translate to simulated hand input.
    /// Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        let down     = |k: Key| self.window.is_key_down(k);

        if one_shot(Key::Escape) || one_shot(Key::Q) {
            return false;
        }

        let mut inputs = Vec::new();
        if one_shot(Key::L) { inputs.push(SimInput::ToggleHand(Handedness::Left)); }
        if one_shot(Key::R) { inputs.push(SimInput::ToggleHand(Handedness::Right)); }

        let mut dx = 0.0;
        let mut dy = 0.0;
        if down(Key::Left)  { dx -= NUDGE_STEP; }
        if down(Key::Right) { dx += NUDGE_STEP; }
        if down(Key::Up)    { dy -= NUDGE_STEP; }
        if down(Key::Down)  { dy += NUDGE_STEP; }
        if dx != 0.0 || dy != 0.0 {
            inputs.push(SimInput::NudgeControl { dx, dy });
        }
        if down(Key::Z) { inputs.push(SimInput::Spread(-SPREAD_STEP)); }
        if down(Key::X) { inputs.push(SimInput::Spread(SPREAD_STEP)); }

        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let p = (mx / self.canvas.width() as f32, my / self.canvas.height() as f32);
            if self.pointer != Some(p) {
                self.pointer = Some(p);
                inputs.push(SimInput::Pointer { x: p.0, y: p.1 });
            }
        }
        let pinched = self.window.get_mouse_down(MouseButton::Left);
        if pinched != self.pinched {
            self.pinched = pinched;
            inputs.push(SimInput::PointerPinch(pinched));
        }

        for input in inputs {
            // No receiver when a hardware backend is running.
            let _ = self.sim_tx.send(input);
        }
        true
    }

    /// Render one frame.
    pub fn render(&mut self, scene: &SceneFrame) {
        self.canvas.paint(scene);
        self.window
            .update_with_buffer(self.canvas.pixels(), self.canvas.width(), self.canvas.height())
            .ok();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '[' => [0b110, 0b100, 0b100, 0b100, 0b110],
        ']' => [0b011, 0b001, 0b001, 0b001, 0b011],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
