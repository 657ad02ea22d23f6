//! Drive the engine through a scenario on a simulated host.

use std::sync::Arc;

use keybind_engine::{
    Binding, Clock, Engine,
    sim::{ManualClock, SimHost},
};
use keystore::KeyStore;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    error::Result,
    scenario::{BindingDef, Scenario, Step, key_code},
};

/// Which callback slot fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Callback {
    /// Edge-triggered key down.
    KeyDown,
    /// Edge-triggered key up.
    KeyUp,
    /// Per-tick while held.
    WhilePressed,
    /// Hold-to-fire trigger.
    Delayed,
}

/// Something observed during a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A binding callback ran.
    Fired {
        /// Simulated time in milliseconds.
        at_ms: u64,
        /// Binding identifier.
        id: String,
        /// Callback slot.
        callback: Callback,
    },
    /// Result of a `check` step.
    Check {
        /// Simulated time in milliseconds.
        at_ms: u64,
        /// Binding identifier.
        id: String,
        /// Whether the restrictions held.
        valid: bool,
    },
}

/// Final state of one binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingState {
    /// Identifier.
    pub id: String,
    /// Label.
    pub description: String,
    /// Current key name.
    pub key: String,
    /// Default key name.
    pub default_key: String,
    /// Disabled flag.
    pub disabled: bool,
}

/// Everything a replay produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    /// Events in the order they happened.
    pub events: Vec<Event>,
    /// Bindings after the last step, in registration order.
    pub bindings: Vec<BindingState>,
}

/// Shared sink the recording callbacks push into.
#[derive(Clone)]
struct Recorder {
    /// Collected events.
    events: Arc<Mutex<Vec<Event>>>,
    /// Simulated clock used to timestamp events.
    clock: ManualClock,
}

impl Recorder {
    /// Callback that records `callback` firing for `id`.
    fn hook(&self, id: &str, callback: Callback) -> impl FnMut() + Send + 'static {
        let rec = self.clone();
        let id = id.to_string();
        move || {
            rec.push(Event::Fired {
                at_ms: rec.clock.now_ms(),
                id: id.clone(),
                callback,
            });
        }
    }

    /// Append one event.
    fn push(&self, event: Event) {
        self.events.lock().push(event);
    }
}

/// Runs one scenario against a fresh engine.
pub struct Replay {
    /// Engine under test.
    engine: Engine,
    /// Simulated collaborators.
    host: SimHost,
    /// Event sink.
    recorder: Recorder,
    /// Frame interval for waits.
    tick_ms: u64,
}

impl Replay {
    /// Build an engine over `store`, seed the player state and register every binding.
    pub fn new(scenario: &Scenario, store: Arc<dyn KeyStore>, tick_ms: u64) -> Result<Self> {
        let host = SimHost::new();
        host.player.set(scenario.state.clone());
        let recorder = Recorder {
            events: Arc::new(Mutex::new(Vec::new())),
            clock: host.clock.clone(),
        };
        let engine = Engine::with_config(host.services(store), scenario.config.clone());
        let mut replay = Self {
            engine,
            host,
            recorder,
            tick_ms: tick_ms.max(1),
        };
        for def in &scenario.bindings {
            let binding = replay.build(def)?;
            replay.engine.add(binding);
        }
        Ok(replay)
    }

    /// Turn a declarative binding into an engine binding with recording callbacks.
    fn build(&self, def: &BindingDef) -> Result<Binding> {
        let mut b = Binding::new(&def.id, key_code(&def.key)?).with_description(&def.description);
        if let Some(m) = def.modifier {
            b = b.with_modifier(m);
        }
        if let Some(ms) = def.spam_prevention_ms {
            b = b.with_spam_prevention(ms);
        }
        if let Some(r) = &def.restrictions {
            b = b.with_restrictions(r.clone());
        }
        if let Some(page) = &def.page {
            b = b.with_page(page);
        }
        if def.any_menu {
            b = b.allow_in_any_menu();
        }
        if def.if_dead {
            b = b.allow_if_dead();
        }
        if def.no_rebind {
            b = b.no_rebind();
        }
        if def.disabled {
            b = b.start_disabled();
        }
        if def.key_down {
            b = b.on_key_down(self.recorder.hook(&def.id, Callback::KeyDown));
        }
        if def.key_up {
            b = b.on_key_up(self.recorder.hook(&def.id, Callback::KeyUp));
        }
        if def.while_pressed {
            b = b.while_pressed(self.recorder.hook(&def.id, Callback::WhilePressed));
        }
        if let Some(ms) = def.delayed_ms {
            b = b.on_delayed_key_down(ms, self.recorder.hook(&def.id, Callback::Delayed));
        }
        Ok(b)
    }

    /// Apply one step.
    pub fn step(&mut self, step: &Step) -> Result<()> {
        debug!(?step, at_ms = self.host.clock.now_ms(), "replay step");
        match step {
            Step::Down(k) => {
                let code = key_code(k)?;
                self.host.input.press(code);
                self.engine.key_down(code);
            }
            Step::Up(k) => {
                let code = key_code(k)?;
                self.host.input.release(code);
                self.engine.key_up(code);
            }
            Step::Press(k) => {
                self.step(&Step::Down(k.clone()))?;
                self.step(&Step::Up(k.clone()))?;
            }
            Step::Wait(ms) => self.wait(*ms),
            Step::Tick => self.engine.tick(),
            Step::State(s) => self.host.player.set(s.clone()),
            Step::Page(p) => self.host.menus.set_open(p.as_deref()),
            Step::Enable(id) => self.engine.enable(id),
            Step::Disable(id) => self.engine.disable(id),
            Step::Rebind(id, k) => self.engine.rebind(id, key_code(k)?),
            Step::Reset(id) => self.engine.reset(id),
            Step::Check(id) => {
                let valid = self.engine.check_validation(id);
                self.recorder.push(Event::Check {
                    at_ms: self.host.clock.now_ms(),
                    id: id.clone(),
                    valid,
                });
            }
        }
        Ok(())
    }

    /// Advance the clock by `ms`, ticking at every frame boundary.
    fn wait(&mut self, ms: u64) {
        let mut left = ms;
        while left > 0 {
            let dt = left.min(self.tick_ms);
            self.host.clock.advance(dt);
            self.engine.tick();
            left -= dt;
        }
    }

    /// Apply every step in order.
    pub fn run(&mut self, steps: &[Step]) -> Result<()> {
        for step in steps {
            self.step(step)?;
        }
        info!(
            steps = steps.len(),
            events = self.recorder.events.lock().len(),
            "replay finished"
        );
        Ok(())
    }

    /// Snapshot events and final binding state.
    pub fn report(&self) -> Report {
        let bindings = self
            .engine
            .hotkeys()
            .map(|b| BindingState {
                id: b.identifier().to_string(),
                description: b.description().to_string(),
                key: vkey::to_spec(b.key()),
                default_key: vkey::to_spec(b.default_key()),
                disabled: b.is_disabled(),
            })
            .collect();
        Report {
            events: self.recorder.events.lock().clone(),
            bindings,
        }
    }
}

/// Render a report as aligned text lines.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    for ev in &report.events {
        let line = match ev {
            Event::Fired {
                at_ms,
                id,
                callback,
            } => format!("{at_ms:>8}ms  {:<13} {id}\n", callback_name(*callback)),
            Event::Check { at_ms, id, valid } => {
                format!("{at_ms:>8}ms  {:<13} {id} = {valid}\n", "check")
            }
        };
        out.push_str(&line);
    }
    if !report.bindings.is_empty() {
        out.push_str("bindings:\n");
    }
    for b in &report.bindings {
        let moved = if b.key == b.default_key {
            String::new()
        } else {
            format!(" (default {})", b.default_key)
        };
        let off = if b.disabled { " [disabled]" } else { "" };
        out.push_str(&format!("  {:<16} {}{moved}{off}\n", b.id, b.key));
    }
    out
}

/// Stable label for a callback slot.
fn callback_name(cb: Callback) -> &'static str {
    match cb {
        Callback::KeyDown => "key_down",
        Callback::KeyUp => "key_up",
        Callback::WhilePressed => "while_pressed",
        Callback::Delayed => "delayed",
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use keystore::MemoryStore;

    use super::*;

    fn run(text: &str) -> Report {
        let scenario = Scenario::parse(text, Path::new("t.ron")).unwrap();
        let store = MemoryStore::with_values(scenario.stored.clone());
        let mut replay = Replay::new(&scenario, Arc::new(store), 10).unwrap();
        replay.run(&scenario.steps).unwrap();
        replay.report()
    }

    fn fired(report: &Report) -> Vec<(u64, &str, Callback)> {
        report
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Fired {
                    at_ms,
                    id,
                    callback,
                } => Some((*at_ms, id.as_str(), *callback)),
                Event::Check { .. } => None,
            })
            .collect()
    }

    #[test]
    fn delayed_hold_fires_on_frame_boundary() {
        let r = run(r#"(
            bindings: [(id: "horn", key: "h", delayed_ms: Some(25), key_up: true)],
            steps: [down("h"), wait(40), up("h")],
        )"#);
        assert_eq!(
            fired(&r),
            vec![(30, "horn", Callback::Delayed), (40, "horn", Callback::KeyUp)]
        );
    }

    #[test]
    fn while_pressed_runs_each_frame() {
        let r = run(r#"(
            bindings: [(id: "w", key: "w", while_pressed: true)],
            steps: [down("w"), wait(30), up("w"), wait(30)],
        )"#);
        assert_eq!(fired(&r).len(), 3);
    }

    #[test]
    fn checks_and_rebinds_are_reported() {
        let r = run(r#"(
            stored: {"keybind-phone": 84},
            bindings: [
                (id: "phone", key: "p", key_down: true),
                (id: "car", key: "c", restrictions: Some((is_vehicle: true))),
            ],
            steps: [
                press("p"),
                press("t"),
                check("car"),
                state((vehicle: Some((model: 3, seat: 1)))),
                check("car"),
                rebind("phone", "y"),
                disable("car"),
            ],
        )"#);
        assert_eq!(fired(&r), vec![(0, "phone", Callback::KeyDown)]);
        let checks: Vec<bool> = r
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Check { valid, .. } => Some(*valid),
                Event::Fired { .. } => None,
            })
            .collect();
        assert_eq!(checks, vec![false, true]);
        assert_eq!(r.bindings[0].key, "y");
        assert_eq!(r.bindings[0].default_key, "p");
        assert!(r.bindings[1].disabled);
    }

    #[test]
    fn unknown_key_in_step_is_an_error() {
        let scenario = Scenario::parse("(steps: [down(\"nope\")])", Path::new("t.ron")).unwrap();
        let mut replay = Replay::new(&scenario, Arc::new(MemoryStore::new()), 10).unwrap();
        assert!(replay.run(&scenario.steps).is_err());
    }

    #[test]
    fn text_report_lists_events_and_bindings() {
        let r = run(r#"(
            bindings: [(id: "phone", key: "p", key_down: true, disabled: true)],
            steps: [enable("phone"), press("p"), disable("phone"), check("phone")],
        )"#);
        let text = render_text(&r);
        assert!(text.contains("key_down"));
        assert!(text.contains("phone = true"));
        assert!(text.contains("[disabled]"));
    }
}
