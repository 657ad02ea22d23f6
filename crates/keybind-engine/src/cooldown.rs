use std::collections::HashMap;

/// Per-identifier spam prevention deadlines, in clock milliseconds.
#[derive(Debug, Default)]
pub struct CooldownLedger {
    until: HashMap<String, u64>,
}

impl CooldownLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a fire at `now` unless `ident` is still cooling down. An accepted fire
    /// starts a new window of `window_ms`.
    pub fn try_fire(&mut self, ident: &str, now: u64, window_ms: u64) -> bool {
        if self.until.get(ident).is_some_and(|&until| until > now) {
            return false;
        }
        self.until
            .insert(ident.to_string(), now.saturating_add(window_ms));
        true
    }

    /// Milliseconds left before `ident` may fire again, if it is cooling down.
    pub fn remaining(&self, ident: &str, now: u64) -> Option<u64> {
        self.until
            .get(ident)
            .filter(|&&until| until > now)
            .map(|until| until - now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_blocks_until_elapsed() {
        let mut l = CooldownLedger::new();
        assert!(l.try_fire("a", 0, 1000));
        assert!(!l.try_fire("a", 999, 1000));
        assert_eq!(l.remaining("a", 400), Some(600));
        assert!(l.try_fire("a", 1000, 1000));
        assert_eq!(l.remaining("a", 1000), Some(1000));
    }

    #[test]
    fn rejected_fire_does_not_extend_window() {
        let mut l = CooldownLedger::new();
        assert!(l.try_fire("a", 0, 1000));
        assert!(!l.try_fire("a", 500, 1000));
        assert!(l.try_fire("a", 1000, 1000));
    }

    #[test]
    fn identifiers_are_independent() {
        let mut l = CooldownLedger::new();
        assert!(l.try_fire("a", 0, 1000));
        assert!(l.try_fire("b", 10, 1000));
        assert_eq!(l.remaining("c", 10), None);
    }
}
