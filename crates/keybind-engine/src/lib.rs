//! Keybind Engine
//!
//! The engine decides, for every registered binding and every input event, whether
//! a callback fires:
//! - edge-triggered `key_down`/`key_up` callbacks, gated by disabled state, spam
//!   prevention, open menus, required modifiers and gameplay restrictions
//! - hold-to-fire delayed triggers, armed on key down and cancelled on key up
//! - while-pressed callbacks, swept on every tick
//!
//! User remaps are written through a [`keystore::KeyStore`] and restored on [`Engine::add`].
//!
//! The host drives the engine from a single thread: forward raw key events to
//! [`Engine::key_down`]/[`Engine::key_up`] and call [`Engine::tick`] once per frame.
//! Lookup misses and failed gates are silent; they only show up in trace logs.
use std::time::{Duration, Instant};

mod binding;
mod config;
mod cooldown;
mod delayed;
mod deps;
mod modifier_state;
mod registry;
mod restriction;
mod services;
pub mod sim;

use tracing::{debug, trace, warn};

pub use binding::{Binding, Callback, Lookup};
pub use config::{EngineConfig, NativeControl};
pub use deps::{Clock, InputSource, MenuQuery, NativeControls, PlayerState, SystemClock};
pub use restriction::{DRIVER_SEAT, RestrictionSet, StateSnapshot, Vehicle, is_valid};
pub use services::Services;
pub use vkey::{KeyCode, Modifier};

use cooldown::CooldownLedger;
use delayed::DelayedTimers;
use modifier_state::ModifierTracker;
use registry::{BindingId, Registry};

/// Engine owns the binding registry and all dispatch state.
///
/// Construct via [`Engine::new`], register bindings with [`Engine::add`], then feed
/// input events and ticks. Dropping the engine discards every binding and timer.
pub struct Engine {
    /// Binding records and key/identifier indexes.
    registry: Registry,
    /// Modifier state sampled on each tick.
    modifiers: ModifierTracker,
    /// Spam prevention windows by identifier.
    cooldowns: CooldownLedger,
    /// Armed hold-to-fire deadlines by identifier.
    delayed: DelayedTimers,
    /// Host collaborators.
    services: Services,
    /// Tuning.
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with the default configuration.
    pub fn new(services: Services) -> Self {
        Self::with_config(services, EngineConfig::default())
    }

    /// Create an engine with an explicit configuration.
    pub fn with_config(services: Services, config: EngineConfig) -> Self {
        Self {
            registry: Registry::new(),
            modifiers: ModifierTracker::new(),
            cooldowns: CooldownLedger::new(),
            delayed: DelayedTimers::new(),
            services,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a binding, restoring a persisted remap for its identifier if one exists.
    ///
    /// The restored code replaces `key`; `default_key` keeps the value the caller built
    /// the binding with.
    pub fn add(&mut self, mut binding: Binding) {
        let skey = self.config.storage_key(binding.identifier());
        if self.services.store.has(&skey) {
            match self
                .services
                .store
                .get(&skey)
                .and_then(|v| KeyCode::try_from(v).ok())
            {
                Some(code) => {
                    debug!(
                        "Restored remap for '{}': {} -> {}",
                        binding.identifier(),
                        vkey::to_spec(binding.key()),
                        vkey::to_spec(code)
                    );
                    binding.set_key(code);
                }
                None => warn!(
                    "Ignoring invalid stored key for '{}' ({})",
                    binding.identifier(),
                    skey
                ),
            }
        }
        self.registry.insert(binding);
    }

    /// Evaluate only the restrictions of the first binding matching `lookup`.
    ///
    /// Disabled state, cooldowns and menus are ignored; this is meant for UI display.
    /// Returns false when nothing matches.
    pub fn check_validation(&self, lookup: impl Into<Lookup>) -> bool {
        self.registry
            .lookup_one(&lookup.into())
            .is_some_and(|b| self.restrictions_ok(b))
    }

    /// Disable the first binding matching `lookup`.
    pub fn disable(&mut self, lookup: impl Into<Lookup>) {
        self.registry.set_disabled(&lookup.into(), true);
    }

    /// Enable the first binding matching `lookup`.
    pub fn enable(&mut self, lookup: impl Into<Lookup>) {
        self.registry.set_disabled(&lookup.into(), false);
    }

    /// Move the first binding matching `lookup` to `new_key` and persist the remap.
    ///
    /// Ignored when nothing matches or the binding refuses rebinds.
    pub fn rebind(&mut self, lookup: impl Into<Lookup>, new_key: KeyCode) {
        let lookup = lookup.into();
        match self.registry.first_id(&lookup) {
            Some(id) => self.rebind_id(id, new_key),
            None => trace!("rebind: no keybind for {}", lookup),
        }
    }

    /// Rebind the first binding matching `lookup` back to its default key.
    pub fn reset(&mut self, lookup: impl Into<Lookup>) {
        let lookup = lookup.into();
        let Some(id) = self.registry.first_id(&lookup) else {
            trace!("reset: no keybind for {}", lookup);
            return;
        };
        if let Some(default_key) = self.registry.get(id).map(Binding::default_key) {
            self.rebind_id(id, default_key);
        }
    }

    /// Every binding, in registration order.
    pub fn hotkeys(&self) -> impl Iterator<Item = &Binding> {
        self.registry.list()
    }

    /// First binding matching `lookup`.
    pub fn hotkey(&self, lookup: impl Into<Lookup>) -> Option<&Binding> {
        self.registry.lookup_one(&lookup.into())
    }

    /// Every binding matching `lookup`, in registration order.
    pub fn hotkeys_for(&self, lookup: impl Into<Lookup>) -> Vec<&Binding> {
        self.registry.lookup_all(&lookup.into())
    }

    /// Return true if `m` was held at the last tick.
    pub fn is_modifier_pressed(&self, m: Modifier) -> bool {
        self.modifiers.is_pressed(m)
    }

    /// Return true if any modifier was held at the last tick.
    pub fn any_modifier_pressed(&self) -> bool {
        self.modifiers.any_pressed()
    }

    /// Handle a key down event for `code`.
    pub fn key_down(&mut self, code: KeyCode) {
        let start = Instant::now();
        let now = self.services.clock.now_ms();
        trace!("Key down: {} at {}ms", vkey::to_spec(code), now);
        for id in self.registry.ids_for(&Lookup::Key(code)) {
            self.key_down_one(id, now);
        }
        self.warn_if_slow("key_down", start);
    }

    /// Handle a key up event for `code`.
    ///
    /// Every matching binding is visited: a failed gate on one does not stop the next.
    pub fn key_up(&mut self, code: KeyCode) {
        let start = Instant::now();
        trace!("Key up: {}", vkey::to_spec(code));
        for id in self.registry.ids_for(&Lookup::Key(code)) {
            self.key_up_one(id);
        }
        self.warn_if_slow("key_up", start);
    }

    /// Per-frame update: refresh modifiers, fire due delayed triggers, then run
    /// while-pressed callbacks for held keys.
    ///
    /// The while-pressed sweep checks only the disabled flag and the physical key
    /// state; cooldowns, menus, modifiers and restrictions do not apply to it.
    pub fn tick(&mut self) {
        let start = Instant::now();
        let now = self.services.clock.now_ms();

        if self.modifiers.refresh(self.services.input.as_ref())
            && let Some(nc) = self.config.suppress_on_modifier
        {
            self.services
                .natives
                .disable_control_action(nc.group, nc.control);
        }

        for ident in self.delayed.take_due(now) {
            match self.registry.lookup_one_mut(&Lookup::Ident(ident)) {
                Some(b) => {
                    if b.fire_delayed() {
                        debug!("Delayed trigger fired: '{}' at {}ms", b.identifier(), now);
                    }
                }
                None => trace!("delayed trigger for a vanished keybind"),
            }
        }

        for id in self.registry.ids() {
            let held = self.registry.get(id).is_some_and(|b| {
                !b.is_disabled()
                    && b.has_while_pressed()
                    && self.services.input.is_key_down(b.key())
            });
            if held && let Some(b) = self.registry.get_mut(id) {
                b.fire_while_pressed();
            }
        }

        self.warn_if_slow("tick", start);
    }

    /// Run the key down gates for one binding and fire or arm it.
    fn key_down_one(&mut self, id: BindingId, now: u64) {
        let Some(b) = self.registry.get(id) else {
            return;
        };
        let ident = b.identifier();

        if b.is_disabled() {
            trace!("'{}' skipped: disabled", ident);
            return;
        }
        if let Some(window) = b.spam_prevention_ms()
            && !self.cooldowns.try_fire(ident, now, window)
        {
            trace!(
                "'{}' skipped: cooling down for {:?}ms",
                ident,
                self.cooldowns.remaining(ident, now)
            );
            return;
        }
        if !self.menu_allows(b) {
            trace!("'{}' skipped: menu open", ident);
            return;
        }
        if !self.modifier_held(b) {
            trace!("'{}' skipped: modifier not held", ident);
            return;
        }
        if let Some(ms) = b.delayed_ms()
            && ms >= 1
        {
            self.delayed.arm(ident, now.saturating_add(ms));
            debug!("Delayed trigger armed: '{}' fires in {}ms", ident, ms);
            return;
        }
        if !b.has_key_down() {
            return;
        }
        if !self.restrictions_ok(b) {
            trace!("'{}' skipped: restrictions unmet", ident);
            return;
        }

        debug!("Key down fired: '{}'", ident);
        if let Some(b) = self.registry.get_mut(id) {
            b.fire_key_down();
        }
    }

    /// Cancel any armed trigger for one binding, then run its key up gates.
    fn key_up_one(&mut self, id: BindingId) {
        let Some(b) = self.registry.get(id) else {
            return;
        };
        let ident = b.identifier();

        if self.delayed.cancel(ident) {
            debug!("Delayed trigger cancelled: '{}'", ident);
        }
        if b.is_disabled() || !self.menu_allows(b) || !self.modifier_held(b) {
            trace!("'{}' key up suppressed", ident);
            return;
        }
        if !b.has_key_up() {
            return;
        }

        debug!("Key up fired: '{}'", ident);
        if let Some(b) = self.registry.get_mut(id) {
            b.fire_key_up();
        }
    }

    /// Persist and apply a remap for binding `id`.
    fn rebind_id(&mut self, id: BindingId, new_key: KeyCode) {
        let Some(b) = self.registry.get(id) else {
            return;
        };
        if !b.allows_rebind() {
            debug!("Rebind refused: '{}' does not allow rebinding", b.identifier());
            return;
        }
        let ident = b.identifier().to_string();
        let old_key = b.key();

        let store = &self.services.store;
        store.set(&self.config.storage_key(&ident), i64::from(new_key));
        if let Err(e) = store.save() {
            warn!("Failed to persist remap for '{}': {}", ident, e);
        }

        self.registry.set_key(id, new_key);
        debug!(
            "Rebound '{}': {} -> {}",
            ident,
            vkey::to_spec(old_key),
            vkey::to_spec(new_key)
        );
    }

    /// Menu gate: overrides first, then the any-page check.
    fn menu_allows(&self, b: &Binding) -> bool {
        let menus = &self.services.menus;
        let overridden =
            b.allows_if_dead() || b.allowed_page().is_some_and(|p| menus.is_page_open(p));
        overridden || b.allows_any_menu() || !menus.is_any_page_open()
    }

    /// Required modifier, if any, was down at the last tick.
    fn modifier_held(&self, b: &Binding) -> bool {
        b.modifier().is_none_or(|m| self.modifiers.is_pressed(m))
    }

    /// Restrictions hold against a fresh player snapshot.
    fn restrictions_ok(&self, b: &Binding) -> bool {
        match b.restrictions() {
            None => true,
            Some(r) => is_valid(Some(r), &self.services.player.snapshot()),
        }
    }

    /// Log when a dispatch step exceeded the configured threshold.
    fn warn_if_slow(&self, what: &str, start: Instant) {
        let elapsed = start.elapsed();
        if elapsed > Duration::from_millis(self.config.slow_dispatch_warn_ms) {
            warn!(
                "{} took {:?} for {} keybinds",
                what,
                elapsed,
                self.registry.len()
            );
        }
    }
}
