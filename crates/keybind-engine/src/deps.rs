use std::time::Instant;

use vkey::KeyCode;

use crate::restriction::StateSnapshot;

// ---- Host collaborator abstractions ----

/// Physical key state polled by the tick sweep.
pub trait InputSource: Send + Sync {
    /// Return true while `code` is physically held.
    fn is_key_down(&self, code: KeyCode) -> bool;
}

/// Overlay/menu state that can suppress dispatch.
pub trait MenuQuery: Send + Sync {
    /// Return true while any menu page is open.
    fn is_any_page_open(&self) -> bool;
    /// Return true while `page` is the open page. Hosts without named pages keep the default.
    fn is_page_open(&self, _page: &str) -> bool {
        false
    }
}

/// Player/world state consumed by restriction checks.
pub trait PlayerState: Send + Sync {
    /// Capture the current player state.
    fn snapshot(&self) -> StateSnapshot;
}

/// Low-level native call used to suppress a conflicting default action.
pub trait NativeControls: Send + Sync {
    /// Disable `control` in action group `group` for the current frame.
    fn disable_control_action(&self, group: u32, control: u32);
}

/// Monotonic millisecond clock.
pub trait Clock: Send + Sync {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Start a clock at zero.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
