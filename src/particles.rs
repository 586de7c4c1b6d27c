//! Ambient background particles: bokeh glows and a drifting starfield.
//!
//! Both run from a fixed-size pool. A particle that outlives its sampled lifetime or
//! drifts off the top is resampled in place, never dropped, so the pool size is
//! fixed for the lifetime of the loop.

use crate::animation::Effect;
use crate::random::{pick_or, uniform_float, uniform_int};
use crate::surface::{Rgb, Surface};

/// Ticks spent fading in at birth and fading out before reset.
pub const FADE_TICKS: f64 = 40.0;
/// Color for kinds built without a palette.
pub const FALLBACK_COLOR: Rgb = Rgb::hex(0xffffff);

const BOKEH_COLORS: [Rgb; 6] = [
    Rgb::hex(0xf4a7b9),
    Rgb::hex(0xe8c77a),
    Rgb::hex(0xd4b8e0),
    Rgb::hex(0xf7c5d0),
    Rgb::hex(0xffffff),
    Rgb::hex(0xfff6b0),
];

const STAR_COLORS: [Rgb; 4] = [
    Rgb::hex(0xffffff),
    Rgb::hex(0xfdf6e3),
    Rgb::hex(0xfff6b0),
    Rgb::hex(0xe6e0ff),
];

/// Sampling ranges for one kind of particle. Positions and velocities are in the
/// field's own units (pixels for bokeh, fractions of the surface for stars).
#[derive(Clone, Copy, Debug)]
pub struct ParticleKind {
    pub radius: (f64, f64),
    pub alpha: (f64, f64),
    pub vx: (f64, f64),
    pub vy: (f64, f64),
    pub lifetime: (i64, i64),
    /// Respawn band as fractions of the height, plus an absolute overshoot below.
    pub respawn_from: f64,
    pub respawn_overshoot: f64,
    /// Resets once `y` drops below this.
    pub top_bound: f64,
    /// An empty palette draws every particle in [`FALLBACK_COLOR`].
    pub palette: &'static [Rgb],
    /// Normalized coordinates are scaled by the surface size at draw time.
    pub normalized: bool,
    /// Glow radius multiplier; `None` draws a plain dot.
    pub glow: Option<f64>,
}

impl ParticleKind {
    pub const BOKEH: ParticleKind = ParticleKind {
        radius: (1.5, 6.0),
        alpha: (0.05, 0.45),
        vx: (-0.2, 0.2),
        vy: (-0.5, -0.15),
        lifetime: (160, 320),
        respawn_from: 0.9,
        respawn_overshoot: 20.0,
        top_bound: -30.0,
        palette: &BOKEH_COLORS,
        normalized: false,
        glow: Some(2.5),
    };

    pub const STAR: ParticleKind = ParticleKind {
        radius: (0.4, 1.6),
        alpha: (0.25, 0.9),
        vx: (-0.0002, 0.0002),
        vy: (-0.0008, -0.0002),
        lifetime: (240, 520),
        respawn_from: 0.9,
        respawn_overshoot: 0.02,
        top_bound: -0.02,
        palette: &STAR_COLORS,
        normalized: true,
        glow: None,
    };
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub alpha: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: Rgb,
    age: u32,
    max_life: u32,
}

impl Particle {
    fn spawn(kind: &ParticleKind, bounds: (f64, f64)) -> Self {
        let mut p = Particle {
            x: 0.0,
            y: 0.0,
            radius: 0.0,
            alpha: 0.0,
            vx: 0.0,
            vy: 0.0,
            color: FALLBACK_COLOR,
            age: 0,
            max_life: 1,
        };
        p.reset(kind, bounds, true);
        p
    }

    /// Resample every attribute. `initial` spreads particles over the whole area;
    /// later resets emit from just below the bottom edge.
    pub fn reset(&mut self, kind: &ParticleKind, (w, h): (f64, f64), initial: bool) {
        self.x = uniform_float(0.0, w);
        self.y = if initial {
            uniform_float(0.0, h)
        } else {
            uniform_float(h * kind.respawn_from, h + kind.respawn_overshoot)
        };
        self.radius = uniform_float(kind.radius.0, kind.radius.1);
        self.alpha = uniform_float(kind.alpha.0, kind.alpha.1);
        self.vx = uniform_float(kind.vx.0, kind.vx.1);
        self.vy = uniform_float(kind.vy.0, kind.vy.1);
        self.color = pick_or(kind.palette, FALLBACK_COLOR);
        self.age = 0;
        self.max_life = uniform_int(kind.lifetime.0, kind.lifetime.1) as u32;
    }

    /// Returns true when the particle was recycled this tick.
    pub fn update(&mut self, kind: &ParticleKind, bounds: (f64, f64)) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.age += 1;
        if self.age >= self.max_life || self.y < kind.top_bound {
            self.reset(kind, bounds, false);
            return true;
        }
        false
    }

    /// Fade-in/fade-out multiplier in `[0, 1]`.
    pub fn envelope(&self) -> f64 {
        let age = self.age as f64;
        let left = (self.max_life as f64 - age).max(0.0);
        (age / FADE_TICKS).min(1.0) * (left / FADE_TICKS).min(1.0)
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn max_life(&self) -> u32 {
        self.max_life
    }
}

/// Fixed pool of one particle kind.
pub struct ParticleField {
    kind: ParticleKind,
    bounds: (f64, f64),
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(kind: ParticleKind, count: usize, surface_size: (f64, f64)) -> Self {
        let bounds = if kind.normalized { (1.0, 1.0) } else { surface_size };
        let particles = (0..count).map(|_| Particle::spawn(&kind, bounds)).collect();
        Self {
            kind,
            bounds,
            particles,
        }
    }

    pub fn bokeh(count: usize, surface_size: (f64, f64)) -> Self {
        Self::new(ParticleKind::BOKEH, count, surface_size)
    }

    pub fn stars(count: usize) -> Self {
        Self::new(ParticleKind::STAR, count, (1.0, 1.0))
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

impl Effect for ParticleField {
    fn update(&mut self, _tick: u32, size: (f64, f64)) {
        // Pixel-space pools follow the canvas through resizes.
        if !self.kind.normalized {
            self.bounds = size;
        }
        for p in &mut self.particles {
            p.update(&self.kind, self.bounds);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let (sx, sy) = if self.kind.normalized {
            surface.size()
        } else {
            (1.0, 1.0)
        };
        for p in &self.particles {
            let alpha = p.alpha * p.envelope();
            if alpha <= 0.0 {
                continue;
            }
            match self.kind.glow {
                Some(mult) => surface.glow(p.x * sx, p.y * sy, p.radius * mult, p.color, alpha),
                None => surface.dot(p.x * sx, p.y * sy, p.radius, p.color, alpha),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationLoop;
    use crate::surface::HeadlessSurface;

    #[test]
    fn test_age_never_exceeds_lifetime_before_reset() {
        let kind = ParticleKind::BOKEH;
        let bounds = (800.0, 600.0);
        let mut p = Particle::spawn(&kind, bounds);
        for _ in 0..5_000 {
            let max = p.max_life();
            let recycled = p.update(&kind, bounds);
            if !recycled {
                assert!(p.age() <= max, "age {} > max {}", p.age(), max);
            } else {
                assert_eq!(p.age(), 0);
            }
        }
    }

    #[test]
    fn test_reset_respawns_near_bottom() {
        let kind = ParticleKind::BOKEH;
        let mut p = Particle::spawn(&kind, (800.0, 600.0));
        for _ in 0..200 {
            p.reset(&kind, (800.0, 600.0), false);
            assert!(p.y >= 540.0 && p.y < 620.0, "y = {}", p.y);
            assert!(p.vy < 0.0, "bokeh drifts upward");
            assert!((160..320).contains(&p.max_life()));
        }
    }

    #[test]
    fn test_particle_above_top_is_recycled() {
        let kind = ParticleKind::BOKEH;
        let mut p = Particle::spawn(&kind, (800.0, 600.0));
        p.y = -29.9;
        p.vy = -0.5;
        assert!(p.update(&kind, (800.0, 600.0)));
        assert!(p.y >= 540.0);
    }

    #[test]
    fn test_envelope_fades_at_both_ends() {
        let kind = ParticleKind::BOKEH;
        let mut p = Particle::spawn(&kind, (100.0, 100.0));
        assert_eq!(p.envelope(), 0.0);
        p.max_life = 200;
        p.age = 100;
        assert_eq!(p.envelope(), 1.0);
        p.age = 180;
        assert!((p.envelope() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_palette_uses_fallback() {
        let kind = ParticleKind {
            palette: &[],
            ..ParticleKind::BOKEH
        };
        let mut p = Particle::spawn(&kind, (200.0, 200.0));
        assert_eq!(p.color, FALLBACK_COLOR);
        p.reset(&kind, (200.0, 200.0), false);
        assert_eq!(p.color, FALLBACK_COLOR);
    }

    #[test]
    fn test_pool_size_constant() {
        let mut s = HeadlessSurface::new(640.0, 480.0);
        let mut l = AnimationLoop::endless(ParticleField::bokeh(80, s.size()));
        for _ in 0..1_000 {
            l.tick(&mut s);
            assert_eq!(l.effect().len(), 80);
        }
    }

    #[test]
    fn test_stars_stay_normalized() {
        let mut s = HeadlessSurface::new(1920.0, 1080.0);
        let mut l = AnimationLoop::endless(ParticleField::stars(50));
        for _ in 0..600 {
            l.tick(&mut s);
        }
        for p in l.effect().particles() {
            assert!(p.x >= -0.2 && p.x <= 1.2, "x = {}", p.x);
            assert!(p.y >= ParticleKind::STAR.top_bound && p.y <= 1.02 + 1e-9);
        }
    }
}
