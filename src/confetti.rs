//! Falling confetti run with a fixed length and a fade-out tail.

use std::f64::consts::TAU;

use crate::animation::Effect;
use crate::random::{pick, uniform_float, uniform_int};
use crate::surface::{Rgb, Shape, Surface};
use crate::tier::RenderQualityTier;

/// Ticks over which the run fades to nothing.
pub const FADE_TAIL: u32 = 60;

const COLORS: [Rgb; 9] = [
    Rgb::hex(0xf4a7b9),
    Rgb::hex(0xe8c77a),
    Rgb::hex(0xd4b8e0),
    Rgb::hex(0xf7c5d0),
    Rgb::hex(0xff6b9d),
    Rgb::hex(0xffd700),
    Rgb::hex(0xa8e6cf),
    Rgb::hex(0xff8b94),
    Rgb::hex(0xc3a0d8),
];

const GLYPHS: [&str; 8] = ["🎉", "🎊", "🌸", "💕", "✨", "🎈", "💫", "🎀"];

/// Notes fanned out around the trigger button with every launch.
pub const NOTE_COUNT: usize = 12;
/// Notes are removed from the page after this long.
pub const NOTE_LIFE_MS: f64 = 1_400.0;
/// Extra upward lift applied to every note's destination.
const NOTE_LIFT: f64 = 40.0;
const NOTE_GLYPHS: [&str; 6] = ["🎵", "🎶", "🎵", "🎸", "🎺", "🎻"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceShape {
    Rect,
    Circle,
    Glyph,
}

#[derive(Clone, Debug)]
pub struct Piece {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub angle: f64,
    pub speed: f64,
    pub drift: f64,
    pub spin: f64,
    pub color: Rgb,
    pub shape: PieceShape,
    pub glyph: &'static str,
    pub opacity: f64,
}

impl Piece {
    fn new(width: f64, glyphs: bool) -> Self {
        let shape = match uniform_int(0, if glyphs { 3 } else { 2 }) {
            0 => PieceShape::Rect,
            1 => PieceShape::Circle,
            _ => PieceShape::Glyph,
        };
        Self {
            x: uniform_float(0.0, width),
            y: uniform_float(-100.0, -10.0),
            w: uniform_float(6.0, 14.0),
            h: uniform_float(6.0, 14.0),
            angle: uniform_float(0.0, TAU),
            speed: uniform_float(2.0, 7.0),
            drift: uniform_float(-1.5, 1.5),
            spin: uniform_float(-0.12, 0.12),
            color: pick(&COLORS),
            shape,
            glyph: pick(&GLYPHS),
            opacity: 1.0,
        }
    }

    fn update(&mut self, (w, h): (f64, f64)) {
        self.y += self.speed;
        self.x += self.drift;
        self.angle += self.spin;
        if self.y > h + 20.0 {
            self.y = -10.0;
            self.x = uniform_float(0.0, w);
        }
    }

    fn outline(&self) -> Shape {
        match self.shape {
            PieceShape::Rect => Shape::Rect {
                w: self.w,
                h: self.h,
            },
            PieceShape::Circle => Shape::Circle { r: self.w / 2.0 },
            PieceShape::Glyph => Shape::Glyph {
                text: self.glyph,
                px: self.w + 6.0,
            },
        }
    }
}

/// Opacity of every piece after `tick` of `duration` ticks have run.
pub fn tail_opacity(tick: u32, duration: u32) -> f64 {
    let remaining = duration.saturating_sub(tick);
    if remaining >= FADE_TAIL {
        1.0
    } else {
        remaining as f64 / FADE_TAIL as f64
    }
}

/// A music note flying out from the trigger button. Offsets are relative to the
/// button's center.
#[derive(Clone, Debug, PartialEq)]
pub struct MusicNote {
    pub glyph: &'static str,
    pub dx: f64,
    pub dy: f64,
    pub size_rem: f64,
    pub flight_secs: f64,
}

/// Evenly spaced ring of [`NOTE_COUNT`] notes at random distances, lifted upward.
pub fn music_notes() -> Vec<MusicNote> {
    (0..NOTE_COUNT)
        .map(|i| {
            let angle = i as f64 / NOTE_COUNT as f64 * TAU;
            let dist = uniform_float(40.0, 120.0);
            MusicNote {
                glyph: NOTE_GLYPHS[i % NOTE_GLYPHS.len()],
                dx: angle.cos() * dist,
                dy: angle.sin() * dist - NOTE_LIFT,
                size_rem: uniform_float(1.0, 2.0),
                flight_secs: uniform_float(0.6, 1.2),
            }
        })
        .collect()
}

/// Places the notes of a burst on the page.
pub trait NoteHost {
    /// Center of the trigger button, or `None` when it is not on the page.
    fn origin(&self) -> Option<(f64, f64)>;
    fn spawn_note(&self, origin: (f64, f64), note: &MusicNote);
}

/// Fire one ring of notes. Returns how many were spawned.
pub fn burst_notes(host: &impl NoteHost) -> usize {
    let Some(origin) = host.origin() else {
        return 0;
    };
    let notes = music_notes();
    for note in &notes {
        host.spawn_note(origin, note);
    }
    notes.len()
}

pub struct ConfettiDriver {
    pieces: Vec<Piece>,
    duration: u32,
    glyphs: bool,
}

impl ConfettiDriver {
    pub fn new(tier: &RenderQualityTier, size: (f64, f64)) -> Self {
        let mut driver = Self {
            pieces: Vec::new(),
            duration: tier.confetti_duration,
            glyphs: tier.glyph_confetti,
        };
        driver.repopulate(tier.confetti_count, size.0);
        driver
    }

    /// Fresh population for a new run. The caller rewinds the owning loop.
    pub fn restart(&mut self, tier: &RenderQualityTier, size: (f64, f64)) {
        self.duration = tier.confetti_duration;
        self.glyphs = tier.glyph_confetti;
        self.repopulate(tier.confetti_count, size.0);
    }

    fn repopulate(&mut self, count: usize, width: f64) {
        self.pieces.clear();
        self.pieces.extend((0..count).map(|_| Piece::new(width, self.glyphs)));
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }
}

impl Effect for ConfettiDriver {
    fn update(&mut self, tick: u32, size: (f64, f64)) {
        let opacity = tail_opacity(tick, self.duration);
        for p in &mut self.pieces {
            p.opacity = opacity;
            p.update(size);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        for p in &self.pieces {
            if p.opacity <= 0.0 {
                continue;
            }
            surface.shape(p.x, p.y, p.angle, p.outline(), p.color, p.opacity);
        }
    }

    fn finish(&mut self, surface: &mut dyn Surface) {
        surface.clear();
        surface.set_visible(false);
    }
}
