// Integration tests (native) for the `celebration-fx` crate.
// These avoid wasm/browser APIs: effects draw onto a HeadlessSurface and the
// overlay talks to a recording host.

use celebration_fx::candles::{CandleController, CandleState, Celebration};
use celebration_fx::confetti::ConfettiDriver;
use celebration_fx::fireworks::{Burst, FireworkShow, TAIL_TICKS};
use celebration_fx::overlay::{EmojiDrop, GrandOverlay, OverlayHost};
use celebration_fx::particles::ParticleField;
use celebration_fx::{AnimationLoop, HeadlessSurface, LoopStatus, RenderQualityTier, Rgb, Surface};

#[derive(Default)]
struct Host {
    opened: u32,
    drops: u32,
    confetti: u32,
    message: bool,
    armed: bool,
}

impl OverlayHost for Host {
    fn show_overlay(&mut self, visible: bool) {
        if visible {
            self.opened += 1;
        }
    }
    fn show_message(&mut self, visible: bool) {
        self.message = visible;
    }
    fn spawn_emoji(&mut self, _drop: EmojiDrop) {
        self.drops += 1;
    }
    fn clear_emoji(&mut self) {}
    fn start_confetti(&mut self) {
        self.confetti += 1;
    }
    fn ensure_audio(&mut self, _volume: f64) {}
    fn arm_dismiss(&mut self) {
        self.armed = true;
    }
    fn disarm_dismiss(&mut self) {
        self.armed = false;
    }
}

fn small_tier() -> RenderQualityTier {
    RenderQualityTier {
        firework_bursts: 4,
        firework_frames: 100,
        sparks_per_burst: 12,
        accent_sparks: 3,
        emoji_drops: 5,
        ..RenderQualityTier::full()
    }
}

// Lighting the whole cake opens the finale once; a second full cycle opens it
// again after the overlay was dismissed.
#[test]
fn candles_gate_the_overlay() {
    let mut cake = CandleController::new(4);
    let mut overlay = GrandOverlay::new(
        HeadlessSurface::new(1280.0, 720.0),
        Host::default(),
        small_tier(),
    );

    cake.light_sequentially(0.0);
    let mut now = 0.0;
    let mut celebrations = 0;
    while let Some(due) = cake.next_due() {
        now = due;
        if let (_, Some(Celebration)) = cake.poll(now) {
            celebrations += 1;
            assert!(overlay.open(now + 300.0));
        }
    }
    assert_eq!(celebrations, 1);
    assert_eq!(cake.candles().state(), CandleState::FullyLit { triggered: true });
    assert!(overlay.is_open());

    // A stray toggle while the overlay is up cannot open it twice.
    assert_eq!(cake.toggle(0), None);
    if let Some(Celebration) = cake.toggle(0) {
        assert!(!overlay.open(now + 400.0));
    }
    assert_eq!(overlay.host().opened, 1);

    overlay.close();
    assert_eq!(cake.toggle(3), None);
    assert_eq!(cake.toggle(3), Some(Celebration));
    assert!(overlay.open(now + 10_000.0));
    assert_eq!(overlay.host().opened, 2);
    assert_eq!(overlay.host().confetti, 2);
}

#[test]
fn overlay_runs_fireworks_to_completion() {
    let tier = small_tier();
    let mut overlay = GrandOverlay::new(HeadlessSurface::new(800.0, 600.0), Host::default(), tier.clone());
    overlay.open(0.0);
    let mut ticks = 0;
    let mut peak_draws = 0;
    loop {
        ticks += 1;
        let status = overlay.frame();
        peak_draws = peak_draws.max(overlay.surface().draws);
        if status != LoopStatus::Running {
            assert_eq!(status, LoopStatus::Finished);
            break;
        }
    }
    assert_eq!(ticks, tier.firework_frames + TAIL_TICKS);
    assert!(peak_draws > 0);
    assert!(overlay.surface().is_blank());

    overlay.poll(60_000.0);
    assert!(overlay.host().message);
    assert!(overlay.host().armed);
    assert_eq!(overlay.host().drops, 5);
}

#[test]
fn show_leaves_every_burst_spent() {
    let tier = small_tier();
    let mut s = HeadlessSurface::new(800.0, 600.0);
    let show = FireworkShow::new(&tier, s.size());
    let runtime = show.runtime();
    let mut lp = AnimationLoop::bounded(show, runtime);
    while lp.tick(&mut s) == LoopStatus::Running {}
    assert_eq!(lp.ticks(), runtime);
    assert!(lp.effect().bursts().iter().all(Burst::is_spent));
    assert_eq!(lp.effect().live_sparks(), 0);
    assert!(s.is_blank());
}

#[test]
fn confetti_retrigger_replaces_run() {
    let tier = RenderQualityTier {
        confetti_count: 30,
        confetti_duration: 320,
        ..RenderQualityTier::full()
    };
    let mut s = HeadlessSurface::new(640.0, 480.0);
    let mut lp = AnimationLoop::bounded(ConfettiDriver::new(&tier, s.size()), 320);
    for _ in 0..200 {
        lp.tick(&mut s);
    }
    // Second trigger mid-run: same population size, counter back to zero.
    lp.effect_mut().restart(&tier, s.size());
    lp.rewind();
    assert_eq!(lp.effect().pieces().len(), 30);
    let mut ticks = 0;
    while lp.tick(&mut s) == LoopStatus::Running {
        ticks += 1;
    }
    assert_eq!(ticks + 1, 320);
    assert!(!s.visible);
    assert!(s.is_blank());
}

#[test]
fn background_pools_keep_their_size() {
    let mut s = HeadlessSurface::new(1024.0, 768.0);
    let mut bokeh = AnimationLoop::endless(ParticleField::bokeh(80, s.size()));
    let mut stars = AnimationLoop::endless(ParticleField::stars(140));
    for _ in 0..2_000 {
        assert_eq!(bokeh.tick(&mut s), LoopStatus::Running);
        assert_eq!(stars.tick(&mut s), LoopStatus::Running);
    }
    assert_eq!(bokeh.effect().len(), 80);
    assert_eq!(stars.effect().len(), 140);
    // Window shrinks: new respawns land inside the new bounds.
    s.width = 320.0;
    s.height = 240.0;
    for _ in 0..400 {
        bokeh.tick(&mut s);
    }
    assert!(bokeh.effect().particles().iter().all(|p| p.x < 320.0 + 0.2 * 320.0));
}

#[test]
fn headless_surface_counts_primitives() {
    let mut s = HeadlessSurface::new(10.0, 10.0);
    s.glow(1.0, 1.0, 2.0, Rgb(1, 1, 1), 0.5);
    s.fade(Rgb(0, 0, 0), 0.2);
    assert_eq!(s.draws, 1);
    assert_eq!(s.fades, 1);
}
