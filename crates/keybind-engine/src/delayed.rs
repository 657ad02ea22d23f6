//! Deadlines for hold-to-fire bindings.
//!
//! A timer is armed on key down and cancelled on key up; the tick sweep collects the
//! timers whose deadline has passed. Deadlines are compared against the engine clock,
//! so a trigger fires on the first tick at or after its deadline.

use std::collections::HashMap;

use tracing::trace;

/// Per-identifier deadlines, in clock milliseconds.
#[derive(Debug, Default)]
pub struct DelayedTimers {
    deadlines: HashMap<String, u64>,
}

impl DelayedTimers {
    /// Create with nothing armed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm or re-arm the timer for `ident`.
    pub fn arm(&mut self, ident: &str, deadline: u64) {
        trace!("delayed_arm" = %ident, deadline);
        self.deadlines.insert(ident.to_string(), deadline);
    }

    /// Cancel the timer for `ident`; returns whether one was armed.
    pub fn cancel(&mut self, ident: &str) -> bool {
        self.deadlines.remove(ident).is_some()
    }

    /// Return true if a timer is armed for `ident`.
    #[cfg(test)]
    pub fn is_armed(&self, ident: &str) -> bool {
        self.deadlines.contains_key(ident)
    }

    /// Remove and return every identifier due at `now`, earliest deadline first.
    pub fn take_due(&mut self, now: u64) -> Vec<String> {
        let mut due: Vec<(u64, String)> = self
            .deadlines
            .iter()
            .filter(|&(_, &deadline)| deadline <= now)
            .map(|(ident, &deadline)| (deadline, ident.clone()))
            .collect();
        if due.is_empty() {
            return Vec::new();
        }
        due.sort();
        for (_, ident) in &due {
            self.deadlines.remove(ident);
        }
        due.into_iter().map(|(_, ident)| ident).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_after_deadline() {
        let mut t = DelayedTimers::new();
        t.arm("a", 500);
        assert!(t.take_due(499).is_empty());
        assert_eq!(t.take_due(500), vec!["a"]);
        assert!(!t.is_armed("a"));
        assert!(t.take_due(10_000).is_empty());
    }

    #[test]
    fn cancel_disarms() {
        let mut t = DelayedTimers::new();
        t.arm("a", 500);
        assert!(t.cancel("a"));
        assert!(!t.cancel("a"));
        assert!(t.take_due(1000).is_empty());
    }

    #[test]
    fn due_order_is_by_deadline_then_ident() {
        let mut t = DelayedTimers::new();
        t.arm("late", 300);
        t.arm("b", 100);
        t.arm("a", 100);
        t.arm("future", 900);
        assert_eq!(t.take_due(300), vec!["a", "b", "late"]);
        assert!(t.is_armed("future"));
    }

    #[test]
    fn rearm_replaces_deadline() {
        let mut t = DelayedTimers::new();
        t.arm("a", 100);
        t.arm("a", 400);
        assert!(t.take_due(200).is_empty());
        assert_eq!(t.take_due(400), vec!["a"]);
    }
}
