//! Millisecond-keyed queue of pending one-shot steps.
//!
//! Stands in for `setTimeout` inside the core so staggered sequences stay
//! deterministic: the host reports the current time through `drain_due` and the
//! controllers act on whatever has come due.

#[derive(Debug, Clone)]
pub struct Timeline<A> {
    // Sorted by due time; equal times keep insertion order.
    pending: Vec<(f64, A)>,
}

impl<A> Default for Timeline<A> {
    fn default() -> Self {
        Self { pending: Vec::new() }
    }
}

impl<A> Timeline<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at_ms: f64, step: A) {
        let idx = self.pending.partition_point(|(t, _)| *t <= at_ms);
        self.pending.insert(idx, (at_ms, step));
    }

    /// Remove and return every step due at or before `now_ms`, earliest first.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<A> {
        let n = self.pending.partition_point(|(t, _)| *t <= now_ms);
        self.pending.drain(..n).map(|(_, a)| a).collect()
    }

    /// Remove the earliest step if it is due, with its scheduled time.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(f64, A)> {
        match self.pending.first() {
            Some((t, _)) if *t <= now_ms => Some(self.pending.remove(0)),
            _ => None,
        }
    }

    pub fn next_due(&self) -> Option<f64> {
        self.pending.first().map(|(t, _)| *t)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_in_time_order() {
        let mut t = Timeline::new();
        t.schedule(300.0, "c");
        t.schedule(100.0, "a");
        t.schedule(200.0, "b");
        t.schedule(100.0, "a2");
        assert_eq!(t.next_due(), Some(100.0));
        assert_eq!(t.drain_due(50.0), Vec::<&str>::new());
        assert_eq!(t.drain_due(200.0), vec!["a", "a2", "b"]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.drain_due(1_000.0), vec!["c"]);
        assert!(t.is_empty());
        assert_eq!(t.next_due(), None);
    }

    #[test]
    fn test_pop_due_sees_steps_scheduled_while_draining() {
        let mut t = Timeline::new();
        t.schedule(0.0, 0);
        let mut seen = Vec::new();
        while let Some((at, n)) = t.pop_due(250.0) {
            seen.push(n);
            if n < 5 {
                t.schedule(at + 100.0, n + 1);
            }
        }
        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(t.next_due(), Some(300.0));
    }

    #[test]
    fn test_clear_drops_pending() {
        let mut t = Timeline::new();
        t.schedule(10.0, 1);
        t.clear();
        assert!(t.drain_due(100.0).is_empty());
    }
}
