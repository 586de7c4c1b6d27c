//! Grand overlay: the full-screen finale.
//!
//! Opening it starts fireworks on the injected surface, rains emoji through the
//! host, restarts confetti, makes sure the music is playing and later reveals the
//! final message. A click dismisses it, but only after a short grace period so the
//! gesture that opened it cannot close it again.

use crate::animation::{AnimationLoop, CancelToken, LoopStatus};
use crate::fireworks::FireworkShow;
use crate::random::{pick, uniform_float};
use crate::surface::Surface;
use crate::tier::RenderQualityTier;
use crate::timeline::Timeline;

pub const MESSAGE_DELAY_MS: f64 = 2_400.0;
pub const DISMISS_GRACE_MS: f64 = 1_200.0;
pub const MUSIC_VOLUME: f64 = 0.45;

const RAIN_GLYPHS: [&str; 10] = ["🎉", "🎊", "🎈", "💖", "✨", "🎂", "🌸", "💫", "🎁", "🥳"];

/// One falling emoji, positioned by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct EmojiDrop {
    pub glyph: &'static str,
    /// Horizontal position, percent of the overlay width.
    pub left_pct: f64,
    pub size_rem: f64,
    pub fall_secs: f64,
}

impl EmojiDrop {
    fn random() -> Self {
        Self {
            glyph: pick(&RAIN_GLYPHS),
            left_pct: uniform_float(0.0, 100.0),
            size_rem: uniform_float(1.4, 2.8),
            fall_secs: uniform_float(3.0, 6.0),
        }
    }
}

/// Everything the overlay does to the page outside its own canvas.
pub trait OverlayHost {
    fn show_overlay(&mut self, visible: bool);
    fn show_message(&mut self, visible: bool);
    fn spawn_emoji(&mut self, drop: EmojiDrop);
    fn clear_emoji(&mut self);
    fn start_confetti(&mut self);
    fn ensure_audio(&mut self, volume: f64);
    /// Install the click-to-dismiss handler.
    fn arm_dismiss(&mut self);
    fn disarm_dismiss(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OverlayStep {
    RevealMessage,
    ArmDismiss,
    Rain,
}

pub struct GrandOverlay<S, H> {
    surface: S,
    host: H,
    tier: RenderQualityTier,
    open: bool,
    show: Option<AnimationLoop<FireworkShow>>,
    timeline: Timeline<OverlayStep>,
    drops_left: usize,
}

impl<S: Surface, H: OverlayHost> GrandOverlay<S, H> {
    pub fn new(surface: S, host: H, tier: RenderQualityTier) -> Self {
        Self {
            surface,
            host,
            tier,
            open: false,
            show: None,
            timeline: Timeline::new(),
            drops_left: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns false (and does nothing) when already open.
    pub fn open(&mut self, now_ms: f64) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        log::info!("overlay: open");

        self.host.show_overlay(true);
        self.host.ensure_audio(MUSIC_VOLUME);
        self.host.start_confetti();

        self.surface.set_visible(true);
        self.surface.clear();
        let show = FireworkShow::new(&self.tier, self.surface.size());
        let runtime = show.runtime();
        self.show = Some(AnimationLoop::bounded(show, runtime));

        self.drops_left = self.tier.emoji_drops;
        self.timeline.clear();
        self.timeline.schedule(now_ms, OverlayStep::Rain);
        self.timeline.schedule(now_ms + DISMISS_GRACE_MS, OverlayStep::ArmDismiss);
        self.timeline.schedule(now_ms + MESSAGE_DELAY_MS, OverlayStep::RevealMessage);
        true
    }

    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        log::info!("overlay: close");
        if let Some(show) = self.show.take() {
            show.cancel();
        }
        self.surface.clear();
        self.timeline.clear();
        self.drops_left = 0;
        self.host.clear_emoji();
        self.host.show_message(false);
        self.host.disarm_dismiss();
        self.host.show_overlay(false);
    }

    /// One firework tick.
    pub fn frame(&mut self) -> LoopStatus {
        match self.show.as_mut() {
            Some(show) if self.open => show.tick(&mut self.surface),
            _ => LoopStatus::Cancelled,
        }
    }

    /// Run whatever timed steps have come due.
    pub fn poll(&mut self, now_ms: f64) {
        if !self.open {
            return;
        }
        while let Some((at, step)) = self.timeline.pop_due(now_ms) {
            match step {
                OverlayStep::RevealMessage => self.host.show_message(true),
                OverlayStep::ArmDismiss => self.host.arm_dismiss(),
                OverlayStep::Rain => {
                    if self.drops_left > 0 {
                        self.drops_left -= 1;
                        self.host.spawn_emoji(EmojiDrop::random());
                    }
                    if self.drops_left > 0 {
                        self.timeline
                            .schedule(at + self.tier.emoji_interval_ms, OverlayStep::Rain);
                    }
                }
            }
        }
    }

    pub fn next_due(&self) -> Option<f64> {
        self.timeline.next_due()
    }

    /// Cancellation handle of the running firework loop.
    pub fn show_token(&self) -> Option<CancelToken> {
        self.show.as_ref().map(|s| s.token())
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessSurface;

    #[derive(Default)]
    struct Recorder {
        overlay_visible: bool,
        message_visible: bool,
        drops: usize,
        clears: usize,
        confetti: usize,
        audio: usize,
        armed: bool,
        opens: usize,
    }

    impl OverlayHost for Recorder {
        fn show_overlay(&mut self, visible: bool) {
            if visible {
                self.opens += 1;
            }
            self.overlay_visible = visible;
        }
        fn show_message(&mut self, visible: bool) {
            self.message_visible = visible;
        }
        fn spawn_emoji(&mut self, drop: EmojiDrop) {
            assert!((0.0..100.0).contains(&drop.left_pct));
            self.drops += 1;
        }
        fn clear_emoji(&mut self) {
            self.clears += 1;
            self.drops = 0;
        }
        fn start_confetti(&mut self) {
            self.confetti += 1;
        }
        fn ensure_audio(&mut self, volume: f64) {
            assert_eq!(volume, MUSIC_VOLUME);
            self.audio += 1;
        }
        fn arm_dismiss(&mut self) {
            self.armed = true;
        }
        fn disarm_dismiss(&mut self) {
            self.armed = false;
        }
    }

    fn overlay() -> GrandOverlay<HeadlessSurface, Recorder> {
        let tier = RenderQualityTier {
            firework_frames: 60,
            firework_bursts: 3,
            sparks_per_burst: 10,
            accent_sparks: 0,
            emoji_drops: 3,
            emoji_interval_ms: 100.0,
            ..RenderQualityTier::full()
        };
        GrandOverlay::new(HeadlessSurface::new(800.0, 600.0), Recorder::default(), tier)
    }

    #[test]
    fn test_open_is_idempotent() {
        let mut o = overlay();
        assert!(o.open(0.0));
        assert!(!o.open(10.0));
        let h = o.host();
        assert_eq!(h.opens, 1);
        assert_eq!(h.confetti, 1);
        assert_eq!(h.audio, 1);
        o.poll(0.0);
        o.poll(0.0);
        assert_eq!(o.host().drops, 1);
    }

    #[test]
    fn test_timed_steps() {
        let mut o = overlay();
        o.open(1_000.0);
        o.poll(1_000.0);
        assert!(!o.host().armed);
        o.poll(1_000.0 + DISMISS_GRACE_MS);
        assert!(o.host().armed);
        assert!(!o.host().message_visible);
        assert_eq!(o.host().drops, 3);
        o.poll(1_000.0 + MESSAGE_DELAY_MS);
        assert!(o.host().message_visible);
        assert_eq!(o.next_due(), None);
    }

    #[test]
    fn test_close_cancels_fireworks() {
        let mut o = overlay();
        o.open(0.0);
        for _ in 0..10 {
            assert_eq!(o.frame(), LoopStatus::Running);
        }
        let token = o.show_token().expect("show running");
        o.poll(5_000.0);
        o.close();
        assert!(token.is_cancelled());
        assert!(o.surface().is_blank());
        assert_eq!(o.frame(), LoopStatus::Cancelled);
        assert!(o.surface().is_blank());
        let h = o.host();
        assert!(!h.overlay_visible && !h.message_visible && !h.armed);
        assert_eq!(h.clears, 1);
    }

    #[test]
    fn test_reopen_reruns_everything() {
        let mut o = overlay();
        o.open(0.0);
        o.close();
        assert!(o.open(10_000.0));
        assert_eq!(o.host().opens, 2);
        assert_eq!(o.host().confetti, 2);
        assert_eq!(o.frame(), LoopStatus::Running);
    }

    #[test]
    fn test_open_shows_a_hidden_canvas() {
        let mut o = overlay();
        o.surface_mut().set_visible(false);
        o.surface_mut().width = 1_280.0;
        o.open(0.0);
        assert!(o.surface().visible);
        assert_eq!(o.surface().clears, 1);
        assert_eq!(o.frame(), LoopStatus::Running);
    }

    #[test]
    fn test_fireworks_finish_while_open() {
        let mut o = overlay();
        o.open(0.0);
        let mut ticks = 1;
        while o.frame() == LoopStatus::Running {
            ticks += 1;
        }
        assert_eq!(ticks, 120);
        assert!(o.surface().is_blank());
        assert!(o.is_open());
    }
}
