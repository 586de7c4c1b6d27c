//! Cake candles and the celebration trigger.
//!
//! Lighting every candle fires the celebration once. Blowing one out re-arms it, so
//! relighting fires it again.

use crate::timeline::Timeline;

/// Gap between candles during the automatic lighting.
pub const STAGGER_MS: f64 = 200.0;
/// Settle time after the last candle before the lit count is checked.
pub const SETTLE_MS: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandleState {
    Unlit,
    PartiallyLit,
    FullyLit { triggered: bool },
}

/// Emitted on the transition into fully lit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Celebration;

#[derive(Clone, Debug)]
pub struct CandleSet {
    lit: Vec<bool>,
    triggered: bool,
}

impl CandleSet {
    pub fn new(count: usize) -> Self {
        Self {
            lit: vec![false; count],
            triggered: false,
        }
    }

    pub fn len(&self) -> usize {
        self.lit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lit.is_empty()
    }

    pub fn is_lit(&self, idx: usize) -> bool {
        self.lit.get(idx).copied().unwrap_or(false)
    }

    pub fn lit_count(&self) -> usize {
        self.lit.iter().filter(|l| **l).count()
    }

    /// Flip one candle and recompute. Out-of-range indices are ignored.
    pub fn toggle(&mut self, idx: usize) -> Option<Celebration> {
        let cur = self.is_lit(idx);
        self.set(idx, !cur);
        self.recompute()
    }

    /// Set one candle without recomputing (used mid-sequence).
    pub fn set(&mut self, idx: usize, lit: bool) {
        if let Some(slot) = self.lit.get_mut(idx) {
            *slot = lit;
        }
    }

    pub fn recompute(&mut self) -> Option<Celebration> {
        if self.lit.is_empty() {
            return None;
        }
        let count = self.lit_count();
        if count == self.lit.len() {
            if !self.triggered {
                self.triggered = true;
                log::info!("candles: all {} lit", count);
                return Some(Celebration);
            }
        } else {
            self.triggered = false;
        }
        None
    }

    pub fn state(&self) -> CandleState {
        match self.lit_count() {
            0 => CandleState::Unlit,
            n if n == self.lit.len() => CandleState::FullyLit {
                triggered: self.triggered,
            },
            _ => CandleState::PartiallyLit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CandleStep {
    Light(usize),
    Settle,
}

/// Candle set plus the one-time automatic lighting sequence.
#[derive(Debug)]
pub struct CandleController {
    candles: CandleSet,
    timeline: Timeline<CandleStep>,
    sequence_started: bool,
}

impl CandleController {
    pub fn new(count: usize) -> Self {
        Self {
            candles: CandleSet::new(count),
            timeline: Timeline::new(),
            sequence_started: false,
        }
    }

    pub fn candles(&self) -> &CandleSet {
        &self.candles
    }

    pub fn toggle(&mut self, idx: usize) -> Option<Celebration> {
        self.candles.toggle(idx)
    }

    /// Queue the staggered lighting. Only the first call does anything.
    pub fn light_sequentially(&mut self, now_ms: f64) -> bool {
        if self.sequence_started || self.candles.is_empty() {
            return false;
        }
        self.sequence_started = true;
        let n = self.candles.len();
        for i in 0..n {
            self.timeline.schedule(now_ms + i as f64 * STAGGER_MS, CandleStep::Light(i));
        }
        self.timeline
            .schedule(now_ms + n as f64 * STAGGER_MS + SETTLE_MS, CandleStep::Settle);
        true
    }

    /// Apply due steps. Returns the indices lit by this call and any celebration.
    pub fn poll(&mut self, now_ms: f64) -> (Vec<usize>, Option<Celebration>) {
        let mut lit = Vec::new();
        let mut celebration = None;
        for step in self.timeline.drain_due(now_ms) {
            match step {
                CandleStep::Light(i) => {
                    self.candles.set(i, true);
                    lit.push(i);
                }
                CandleStep::Settle => celebration = celebration.or(self.candles.recompute()),
            }
        }
        (lit, celebration)
    }

    pub fn next_due(&self) -> Option<f64> {
        self.timeline.next_due()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_once_per_cycle() {
        let n = 5;
        let mut c = CandleSet::new(n);
        for i in 0..n - 1 {
            assert_eq!(c.toggle(i), None);
        }
        assert_eq!(c.state(), CandleState::PartiallyLit);
        assert_eq!(c.toggle(n - 1), Some(Celebration));
        assert_eq!(c.state(), CandleState::FullyLit { triggered: true });
        // Recomputing while still fully lit must not fire again.
        assert_eq!(c.recompute(), None);

        assert_eq!(c.toggle(2), None);
        assert_eq!(c.state(), CandleState::PartiallyLit);
        assert_eq!(c.toggle(2), Some(Celebration));
    }

    #[test]
    fn test_unlit_and_out_of_range() {
        let mut c = CandleSet::new(2);
        assert_eq!(c.state(), CandleState::Unlit);
        assert_eq!(c.toggle(7), None);
        assert_eq!(c.lit_count(), 0);
    }

    #[test]
    fn test_empty_set_never_triggers() {
        let mut c = CandleSet::new(0);
        assert_eq!(c.recompute(), None);
        let mut ctl = CandleController::new(0);
        assert!(!ctl.light_sequentially(0.0));
    }

    #[test]
    fn test_sequential_lighting_is_staggered() {
        let mut ctl = CandleController::new(3);
        assert!(ctl.light_sequentially(1_000.0));
        assert!(!ctl.light_sequentially(1_000.0));
        assert_eq!(ctl.poll(1_000.0), (vec![0], None));
        assert_eq!(ctl.poll(1_199.0), (vec![], None));
        assert_eq!(ctl.poll(1_400.0), (vec![1, 2], None));
        assert_eq!(ctl.candles().state(), CandleState::FullyLit { triggered: false });
        assert_eq!(ctl.next_due(), Some(1_700.0));
        assert_eq!(ctl.poll(1_700.0), (vec![], Some(Celebration)));
        assert_eq!(ctl.next_due(), None);
    }

    #[test]
    fn test_manual_finish_before_settle_fires_once() {
        let mut ctl = CandleController::new(2);
        ctl.light_sequentially(0.0);
        ctl.poll(0.0);
        // User lights the second candle before the sequence gets there.
        assert_eq!(ctl.toggle(1), Some(Celebration));
        assert_eq!(ctl.poll(1_000.0), (vec![1], None));
    }
}
