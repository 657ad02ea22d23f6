use std::collections::HashSet;

use tracing::trace;
use vkey::{Key, Modifier};

use crate::deps::InputSource;

/// Tracks which modifier keys were physically down at the last tick.
#[derive(Debug, Default)]
pub struct ModifierTracker {
    pressed: HashSet<Modifier>,
}

impl ModifierTracker {
    /// Create a tracker with nothing pressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll every modifier from `input`; returns true if any is down.
    pub fn refresh(&mut self, input: &dyn InputSource) -> bool {
        for m in Modifier::ALL {
            let down = input.is_key_down(Key::from(m).code());
            let changed = if down {
                self.pressed.insert(m)
            } else {
                self.pressed.remove(&m)
            };
            if changed {
                trace!("modifier" = m.to_spec(), down);
            }
        }
        self.any_pressed()
    }

    /// Return true if `m` was down at the last refresh.
    pub fn is_pressed(&self, m: Modifier) -> bool {
        self.pressed.contains(&m)
    }

    /// Return true if any modifier was down at the last refresh.
    pub fn any_pressed(&self) -> bool {
        !self.pressed.is_empty()
    }
}
