//! Per-frame animation driver.
//!
//! Every canvas effect follows the same contract per display refresh: clear or fade
//! the surface, advance each entity exactly one tick, draw, then either ask for the
//! next frame or stop once a tick budget is used up. [`AnimationLoop`] is that
//! contract; `web::frame` only decides *when* `tick` gets called.

use std::cell::Cell;
use std::rc::Rc;

use crate::surface::Surface;

/// A self-contained visual effect driven one tick at a time.
pub trait Effect {
    /// Prepare the surface for a new frame. Full clear unless overridden.
    fn prepare(&mut self, surface: &mut dyn Surface) {
        surface.clear();
    }
    /// Advance the simulation. `tick` is the 1-based count of ticks run so far,
    /// including this one.
    fn update(&mut self, tick: u32, size: (f64, f64));
    fn draw(&self, surface: &mut dyn Surface);
    /// Called once when the budget is used up.
    fn finish(&mut self, surface: &mut dyn Surface) {
        surface.clear();
    }
}

/// Shared liveness flag. Clones observe the same state.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn cancel(&self) {
        self.0.set(true);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopStatus {
    /// Request another frame.
    Running,
    /// Budget reached; the surface was finished (cleared).
    Finished,
    /// Stopped from outside; nothing was drawn.
    Cancelled,
}

pub struct AnimationLoop<E> {
    effect: E,
    ticks: u32,
    budget: Option<u32>,
    finished: bool,
    token: CancelToken,
}

impl<E: Effect> AnimationLoop<E> {
    /// Loop that runs for the page's lifetime.
    pub fn endless(effect: E) -> Self {
        Self::build(effect, None)
    }

    /// Loop that stops after exactly `ticks` ticks.
    pub fn bounded(effect: E, ticks: u32) -> Self {
        Self::build(effect, Some(ticks))
    }

    fn build(effect: E, budget: Option<u32>) -> Self {
        Self {
            effect,
            ticks: 0,
            budget,
            finished: false,
            token: CancelToken::new(),
        }
    }

    pub fn tick(&mut self, surface: &mut dyn Surface) -> LoopStatus {
        if self.token.is_cancelled() {
            return LoopStatus::Cancelled;
        }
        if self.finished {
            return LoopStatus::Finished;
        }
        self.effect.prepare(surface);
        self.ticks += 1;
        self.effect.update(self.ticks, surface.size());
        self.effect.draw(surface);
        match self.budget {
            Some(budget) if self.ticks >= budget => {
                self.finished = true;
                self.effect.finish(surface);
                LoopStatus::Finished
            }
            _ => LoopStatus::Running,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Handle for whoever schedules frames; cancelling it stops this loop.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn effect(&self) -> &E {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    /// Start over with the same effect: tick counter back to zero, live again.
    pub fn rewind(&mut self) {
        self.ticks = 0;
        self.finished = false;
        self.token = CancelToken::new();
    }
}
