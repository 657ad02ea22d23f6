//! In-memory host collaborators.
//!
//! These stand in for the game client when driving the engine from tests or from a
//! scripted replay. Every type is a cheap handle over shared state: clone one into
//! [`Services`] and keep another to steer the simulation.

use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use keystore::KeyStore;
use parking_lot::Mutex;
use vkey::KeyCode;

use crate::{
    Services,
    deps::{Clock, InputSource, MenuQuery, NativeControls, PlayerState},
    restriction::StateSnapshot,
};

/// Clock that only moves when told to.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    /// Jump to an absolute time.
    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Set of physically held keys.
#[derive(Clone, Debug, Default)]
pub struct SimInput {
    held: Arc<Mutex<HashSet<KeyCode>>>,
}

impl SimInput {
    /// Nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `code`.
    pub fn press(&self, code: KeyCode) {
        self.held.lock().insert(code);
    }

    /// Let go of `code`.
    pub fn release(&self, code: KeyCode) {
        self.held.lock().remove(&code);
    }
}

impl InputSource for SimInput {
    fn is_key_down(&self, code: KeyCode) -> bool {
        self.held.lock().contains(&code)
    }
}

/// At most one open menu page, identified by name.
#[derive(Clone, Debug, Default)]
pub struct SimMenus {
    open: Arc<Mutex<Option<String>>>,
}

impl SimMenus {
    /// Every page closed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `page`, or close every page with `None`.
    pub fn set_open(&self, page: Option<&str>) {
        *self.open.lock() = page.map(str::to_string);
    }
}

impl MenuQuery for SimMenus {
    fn is_any_page_open(&self) -> bool {
        self.open.lock().is_some()
    }

    fn is_page_open(&self, page: &str) -> bool {
        self.open.lock().as_deref() == Some(page)
    }
}

/// Player state replaced wholesale or edited in place.
#[derive(Clone, Debug, Default)]
pub struct SimPlayer {
    state: Arc<Mutex<StateSnapshot>>,
}

impl SimPlayer {
    /// Default snapshot: on foot, unarmed, not aiming.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole snapshot.
    pub fn set(&self, state: StateSnapshot) {
        *self.state.lock() = state;
    }

    /// Edit the snapshot in place.
    pub fn update(&self, f: impl FnOnce(&mut StateSnapshot)) {
        f(&mut self.state.lock());
    }
}

impl PlayerState for SimPlayer {
    fn snapshot(&self) -> StateSnapshot {
        self.state.lock().clone()
    }
}

/// Records native suppression calls as `(group, control)` pairs.
#[derive(Clone, Debug, Default)]
pub struct RecordingNatives {
    calls: Arc<Mutex<Vec<(u32, u32)>>>,
}

impl RecordingNatives {
    /// No calls recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls so far, oldest first.
    pub fn calls(&self) -> Vec<(u32, u32)> {
        self.calls.lock().clone()
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl NativeControls for RecordingNatives {
    fn disable_control_action(&self, group: u32, control: u32) {
        self.calls.lock().push((group, control));
    }
}

/// Every simulated collaborator in one bundle.
#[derive(Clone, Debug, Default)]
pub struct SimHost {
    /// Time source.
    pub clock: ManualClock,
    /// Held keys.
    pub input: SimInput,
    /// Open menu page.
    pub menus: SimMenus,
    /// Player state.
    pub player: SimPlayer,
    /// Suppression calls.
    pub natives: RecordingNatives,
}

impl SimHost {
    /// Fresh host at time zero with nothing held or open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build engine services backed by this host and `store`.
    pub fn services(&self, store: Arc<dyn KeyStore>) -> Services {
        Services {
            input: Arc::new(self.input.clone()),
            menus: Arc::new(self.menus.clone()),
            player: Arc::new(self.player.clone()),
            natives: Arc::new(self.natives.clone()),
            store,
            clock: Arc::new(self.clock.clone()),
        }
    }
}
