//! Cursor follower with a sparkle trail.
//!
//! The follower eases a fixed fraction of the remaining distance toward the pointer
//! every tick, so it lags behind fast moves and settles on slow ones. Pointer moves
//! shed small sparks through the host, at most one per [`SPARK_INTERVAL_MS`].

use crate::animation::Effect;
use crate::random::{pick, uniform_float};
use crate::surface::{Rgb, Surface};
use crate::timeline::Timeline;

/// Fraction of the remaining distance covered per tick.
pub const CURSOR_EASE: f64 = 0.15;
/// Minimum spacing between two sparks.
pub const SPARK_INTERVAL_MS: f64 = 60.0;
/// Sparks are removed from the page after this long.
pub const SPARK_LIFE_MS: f64 = 700.0;
/// Off-screen start so the follower does not flash at the origin.
const PARKED: f64 = -200.0;

const SPARK_COLORS: [Rgb; 4] = [
    Rgb::hex(0xf4a7b9),
    Rgb::hex(0xe8c77a),
    Rgb::hex(0xd4b8e0),
    Rgb::hex(0xffffff),
];

/// One sparkle dot. It appears at `(x, y)` and drifts by `(dx, dy)` while fading.
#[derive(Clone, Debug, PartialEq)]
pub struct CursorSpark {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub color: Rgb,
}

impl CursorSpark {
    fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            dx: uniform_float(-20.0, 20.0),
            dy: uniform_float(-30.0, 10.0),
            color: pick(&SPARK_COLORS),
        }
    }
}

/// The page element that follows the pointer, and the sparks it sheds.
pub trait CursorHost {
    fn place_cursor(&self, x: f64, y: f64);
    fn show_cursor(&self, visible: bool);
    fn spawn_spark(&self, spark: CursorSpark);
}

pub struct CursorTrail<H> {
    host: H,
    pos: (f64, f64),
    target: (f64, f64),
    // One pending entry while sparks are throttled.
    throttle: Timeline<()>,
}

impl<H: CursorHost> CursorTrail<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            pos: (PARKED, PARKED),
            target: (PARKED, PARKED),
            throttle: Timeline::new(),
        }
    }

    /// New pointer position. Returns true when a spark was spawned.
    pub fn pointer_moved(&mut self, x: f64, y: f64, now_ms: f64) -> bool {
        self.target = (x, y);
        while self.throttle.pop_due(now_ms).is_some() {}
        if !self.throttle.is_empty() {
            return false;
        }
        self.host.spawn_spark(CursorSpark::at(x, y));
        self.throttle.schedule(now_ms + SPARK_INTERVAL_MS, ());
        true
    }

    pub fn pointer_left(&self) {
        self.host.show_cursor(false);
    }

    pub fn pointer_entered(&self) {
        self.host.show_cursor(true);
    }

    pub fn position(&self) -> (f64, f64) {
        self.pos
    }

    pub fn target(&self) -> (f64, f64) {
        self.target
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

impl<H: CursorHost> Effect for CursorTrail<H> {
    // The follower is a page element, not canvas pixels.
    fn prepare(&mut self, _surface: &mut dyn Surface) {}

    fn update(&mut self, _tick: u32, _size: (f64, f64)) {
        self.pos.0 += (self.target.0 - self.pos.0) * CURSOR_EASE;
        self.pos.1 += (self.target.1 - self.pos.1) * CURSOR_EASE;
    }

    fn draw(&self, _surface: &mut dyn Surface) {
        self.host.place_cursor(self.pos.0, self.pos.1);
    }
}
