//! Drawing sink consumed by the effects.
//!
//! The core never touches a canvas directly: it asks a [`Surface`] for its size and
//! issues a handful of 2D primitives. The browser implementation lives in
//! `web::canvas`; [`HeadlessSurface`] keeps counters instead of pixels so the
//! simulations can be exercised by native tests.

use std::fmt;

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Build from a `0xrrggbb` literal (palette tables).
    pub const fn hex(code: u32) -> Self {
        Rgb((code >> 16) as u8, (code >> 8) as u8, code as u8)
    }

    pub fn css(&self, alpha: f64) -> String {
        format!("rgba({},{},{},{:.3})", self.0, self.1, self.2, alpha.clamp(0.0, 1.0))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Confetti piece outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Rect { w: f64, h: f64 },
    Circle { r: f64 },
    Glyph { text: &'static str, px: f64 },
}

pub trait Surface {
    /// Width and height in canvas pixels.
    fn size(&self) -> (f64, f64);
    fn clear(&mut self);
    /// Paint a translucent full-surface wash (trail fading).
    fn fade(&mut self, color: Rgb, alpha: f64);
    /// Soft radial gradient from `color` to transparent.
    fn glow(&mut self, x: f64, y: f64, radius: f64, color: Rgb, alpha: f64);
    fn dot(&mut self, x: f64, y: f64, radius: f64, color: Rgb, alpha: f64);
    fn segment(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgb, alpha: f64);
    /// Shape centered on `(x, y)` rotated by `angle` radians.
    fn shape(&mut self, x: f64, y: f64, angle: f64, shape: Shape, color: Rgb, alpha: f64);
    fn set_visible(&mut self, _visible: bool) {}
}

/// In-memory surface that records what was drawn since the last clear.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    pub width: f64,
    pub height: f64,
    pub visible: bool,
    /// Primitives issued since the last `clear`.
    pub draws: usize,
    pub clears: usize,
    pub fades: usize,
    pub segments: usize,
    pub last_shape: Option<Shape>,
}

impl HeadlessSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            visible: true,
            draws: 0,
            clears: 0,
            fades: 0,
            segments: 0,
            last_shape: None,
        }
    }

    /// True when nothing has been drawn since the last full clear.
    pub fn is_blank(&self) -> bool {
        self.draws == 0
    }
}

impl Surface for HeadlessSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
    fn clear(&mut self) {
        self.draws = 0;
        self.clears += 1;
    }
    fn fade(&mut self, _color: Rgb, _alpha: f64) {
        self.fades += 1;
    }
    fn glow(&mut self, _x: f64, _y: f64, _radius: f64, _color: Rgb, _alpha: f64) {
        self.draws += 1;
    }
    fn dot(&mut self, _x: f64, _y: f64, _radius: f64, _color: Rgb, _alpha: f64) {
        self.draws += 1;
    }
    fn segment(&mut self, _from: (f64, f64), _to: (f64, f64), _w: f64, _color: Rgb, _alpha: f64) {
        self.draws += 1;
        self.segments += 1;
    }
    fn shape(&mut self, _x: f64, _y: f64, _angle: f64, shape: Shape, _color: Rgb, _alpha: f64) {
        self.draws += 1;
        self.last_shape = Some(shape);
    }
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
