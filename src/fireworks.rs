//! Firework sparks, bursts and the timed show that launches them.

use std::f64::consts::TAU;

use crate::animation::Effect;
use crate::random::{pick, uniform_float};
use crate::surface::{Rgb, Surface};
use crate::tier::RenderQualityTier;

pub const GRAVITY: f64 = 0.065;
pub const DRAG: f64 = 0.97;
pub const ALPHA_DECAY: f64 = 0.017;
/// Extra ticks after the budget so the last sparks can die out.
pub const TAIL_TICKS: u32 = 60;
/// Launches are spread over this fraction of the frame budget.
pub const LAUNCH_SPAN: f64 = 0.75;

const BURST_COLORS: [Rgb; 8] = [
    Rgb::hex(0xff6b9d), // pink
    Rgb::hex(0xffd700), // gold
    Rgb::hex(0xf4a7b9), // blush
    Rgb::hex(0xa8e6cf), // mint
    Rgb::hex(0xc3a0d8), // lilac
    Rgb::hex(0xff8b94), // coral
    Rgb::hex(0x7ec8ff), // sky
    Rgb::hex(0xffffff),
];

const ACCENT_COLOR: Rgb = Rgb::hex(0xfff3c4);
const BACKDROP: Rgb = Rgb(10, 6, 20);
const BACKDROP_ALPHA: f64 = 0.22;

#[derive(Clone, Debug)]
pub struct Spark {
    pub x: f64,
    pub y: f64,
    pub px: f64,
    pub py: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub alpha: f64,
    pub color: Rgb,
    pub trail: bool,
}

impl Spark {
    pub fn new(x: f64, y: f64, angle: f64, speed: f64, radius: f64, color: Rgb, trail: bool) -> Self {
        Self {
            x,
            y,
            px: x,
            py: y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            radius,
            alpha: 1.0,
            color,
            trail,
        }
    }

    pub fn update(&mut self) {
        self.px = self.x;
        self.py = self.y;
        self.x += self.vx;
        self.y += self.vy;
        self.vy += GRAVITY;
        self.vx *= DRAG;
        self.vy *= DRAG;
        self.alpha -= ALPHA_DECAY;
    }

    pub fn is_dead(&self) -> bool {
        self.alpha <= 0.0
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        if self.is_dead() {
            return;
        }
        if self.trail {
            surface.segment((self.px, self.py), (self.x, self.y), self.radius, self.color, self.alpha);
        }
        surface.glow(self.x, self.y, self.radius * 2.0, self.color, self.alpha);
    }
}

/// One-shot emission point.
#[derive(Clone, Debug)]
pub struct Burst {
    pub delay: u32,
    pub x: f64,
    pub y: f64,
    pub color: Rgb,
    emitted: bool,
    emitted_count: usize,
    sparks: Vec<Spark>,
}

impl Burst {
    pub fn new(delay: u32, x: f64, y: f64, color: Rgb) -> Self {
        Self {
            delay,
            x,
            y,
            color,
            emitted: false,
            emitted_count: 0,
            sparks: Vec::new(),
        }
    }

    /// Emit every spark at once. Subsequent calls are no-ops.
    pub fn emit(&mut self, tier: &RenderQualityTier) {
        if self.emitted {
            return;
        }
        self.emitted = true;
        let (lo, hi) = tier.spark_speed;
        self.sparks.reserve(tier.sparks_per_burst + tier.accent_sparks);
        for _ in 0..tier.sparks_per_burst {
            self.sparks.push(Spark::new(
                self.x,
                self.y,
                uniform_float(0.0, TAU),
                uniform_float(lo, hi),
                uniform_float(1.2, 2.6),
                self.color,
                tier.spark_trails,
            ));
        }
        for _ in 0..tier.accent_sparks {
            self.sparks.push(Spark::new(
                self.x,
                self.y,
                uniform_float(0.0, TAU),
                uniform_float(lo, hi) * 0.6,
                uniform_float(0.6, 1.2),
                ACCENT_COLOR,
                tier.spark_trails,
            ));
        }
        self.emitted_count = self.sparks.len();
    }

    /// Emit when `frame` has reached the scheduled delay.
    pub fn maybe_emit(&mut self, frame: u32, tier: &RenderQualityTier) {
        if frame >= self.delay {
            self.emit(tier);
        }
    }

    pub fn update(&mut self) {
        for s in &mut self.sparks {
            s.update();
        }
        self.sparks.retain(|s| !s.is_dead());
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for s in &self.sparks {
            s.draw(surface);
        }
    }

    pub fn has_emitted(&self) -> bool {
        self.emitted
    }

    /// Sparks produced by the (single) emission.
    pub fn emitted_count(&self) -> usize {
        self.emitted_count
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    pub fn is_spent(&self) -> bool {
        self.emitted && self.sparks.is_empty()
    }
}

/// Launch frames evenly spaced across the first three quarters of the budget.
pub fn launch_frames(count: usize, total_frames: u32) -> Vec<u32> {
    if count == 0 {
        return Vec::new();
    }
    let span = total_frames as f64 * LAUNCH_SPAN;
    (0..count)
        .map(|i| (i as f64 * span / count as f64).floor() as u32)
        .collect()
}

/// The overlay's firework sequence.
pub struct FireworkShow {
    tier: RenderQualityTier,
    bursts: Vec<Burst>,
    frame: u32,
}

impl FireworkShow {
    pub fn new(tier: &RenderQualityTier, (w, h): (f64, f64)) -> Self {
        let bursts = launch_frames(tier.firework_bursts, tier.firework_frames)
            .into_iter()
            .map(|delay| {
                Burst::new(
                    delay,
                    uniform_float(w * 0.15, w * 0.85),
                    uniform_float(h * 0.08, h * 0.55),
                    pick(&BURST_COLORS),
                )
            })
            .collect::<Vec<_>>();
        log::debug!(
            "fireworks: {} bursts over {} frames",
            bursts.len(),
            tier.firework_frames
        );
        Self {
            tier: tier.clone(),
            bursts,
            frame: 0,
        }
    }

    /// Number of ticks the show needs, tail included.
    pub fn runtime(&self) -> u32 {
        self.tier.firework_frames + TAIL_TICKS
    }

    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }

    pub fn live_sparks(&self) -> usize {
        self.bursts.iter().map(|b| b.sparks().len()).sum()
    }
}

impl Effect for FireworkShow {
    fn prepare(&mut self, surface: &mut dyn Surface) {
        if self.tier.fade_trails {
            surface.fade(BACKDROP, BACKDROP_ALPHA);
        } else {
            surface.clear();
        }
    }

    fn update(&mut self, _tick: u32, _size: (f64, f64)) {
        for b in &mut self.bursts {
            b.maybe_emit(self.frame, &self.tier);
            b.update();
        }
        self.frame += 1;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        for b in &self.bursts {
            b.draw(surface);
        }
    }
}
