//! Scenario files: bindings to register and input steps to replay, in RON.
//!
//! ```ron
//! (
//!     tick_ms: Some(16),
//!     stored: {"keybind-phone": 84},
//!     bindings: [
//!         (id: "phone", key: "p", key_down: true, spam_prevention_ms: Some(1000)),
//!         (id: "horn", key: "h", delayed_ms: Some(500)),
//!     ],
//!     steps: [down("h"), wait(600), up("h"), press("t"), check("phone")],
//! )
//! ```

use std::{collections::BTreeMap, fs, path::Path};

use keybind_engine::{EngineConfig, RestrictionSet, StateSnapshot};
use serde::Deserialize;
use vkey::{KeyCode, Modifier};

use crate::error::{Error, Result};

/// A complete replay script.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    /// Engine tuning.
    pub config: EngineConfig,
    /// Frame interval for `wait` steps.
    pub tick_ms: Option<u64>,
    /// Initial player state.
    pub state: StateSnapshot,
    /// Values preloaded into the in-memory store.
    pub stored: BTreeMap<String, i64>,
    /// Bindings registered before the first step, in order.
    pub bindings: Vec<BindingDef>,
    /// Input script.
    pub steps: Vec<Step>,
}

/// Declarative form of a binding. Callbacks are replaced by recorders for each
/// flag that is set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BindingDef {
    /// Identifier.
    pub id: String,
    /// Key name or numeric code.
    pub key: String,
    /// Label shown in text reports.
    pub description: String,
    /// Required modifier.
    pub modifier: Option<Modifier>,
    /// Spam prevention window.
    pub spam_prevention_ms: Option<u64>,
    /// Gameplay restrictions.
    pub restrictions: Option<RestrictionSet>,
    /// Menu page that bypasses the menu gate.
    pub page: Option<String>,
    /// Fire in any menu.
    pub any_menu: bool,
    /// Bypass the menu gate.
    pub if_dead: bool,
    /// Refuse rebinds.
    pub no_rebind: bool,
    /// Start disabled.
    pub disabled: bool,
    /// Record key down.
    pub key_down: bool,
    /// Record key up.
    pub key_up: bool,
    /// Record while-pressed.
    pub while_pressed: bool,
    /// Record a delayed trigger after this hold time.
    pub delayed_ms: Option<u64>,
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// Hold a key and deliver key down.
    Down(String),
    /// Release a key and deliver key up.
    Up(String),
    /// `down` immediately followed by `up`.
    Press(String),
    /// Advance time by this many milliseconds, ticking once per frame.
    Wait(u64),
    /// Run one tick without advancing time.
    Tick,
    /// Replace the player state.
    State(StateSnapshot),
    /// Open a menu page, or close menus with `None`.
    Page(Option<String>),
    /// Enable a binding by identifier.
    Enable(String),
    /// Disable a binding by identifier.
    Disable(String),
    /// Rebind an identifier to a key.
    Rebind(String, String),
    /// Restore an identifier's default key.
    Reset(String),
    /// Record whether an identifier's restrictions currently hold.
    Check(String),
}

impl Scenario {
    /// Read and parse a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse scenario text; `path` is used for error locations only.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        ron::from_str(text).map_err(|e| Error::Scenario {
            path: path.to_path_buf(),
            line: e.span.start.line,
            col: e.span.start.col,
            message: e.code.to_string(),
        })
    }
}

/// Resolve a key name (`"p"`, `"f5"`, `"0x50"`) to its code.
pub fn key_code(spec: &str) -> Result<KeyCode> {
    vkey::from_spec(spec).ok_or_else(|| Error::UnknownKey(spec.to_string()))
}
