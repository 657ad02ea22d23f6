//! Binding records and lookup handles.

use std::fmt;

use vkey::{Key, KeyCode, Modifier};

use crate::restriction::RestrictionSet;

/// User-supplied action. Panics raised by a callback propagate to the caller of the
/// engine entry point that invoked it.
pub type Callback = Box<dyn FnMut() + Send>;

/// Callback fired once after the key has been held for `ms_to_trigger`.
struct DelayedKeyDown {
    /// Hold duration before firing, in milliseconds.
    ms_to_trigger: u64,
    /// Action to run when the hold completes.
    callback: Callback,
}

/// Resolves bindings either by physical key or by identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Lookup {
    /// Match every binding currently on this key code.
    Key(KeyCode),
    /// Match bindings registered under this identifier.
    Ident(String),
}

impl From<KeyCode> for Lookup {
    fn from(code: KeyCode) -> Self {
        Self::Key(code)
    }
}

impl From<Key> for Lookup {
    fn from(k: Key) -> Self {
        Self::Key(k.code())
    }
}

impl From<&str> for Lookup {
    fn from(s: &str) -> Self {
        Self::Ident(s.to_string())
    }
}

impl From<String> for Lookup {
    fn from(s: String) -> Self {
        Self::Ident(s)
    }
}

impl From<&String> for Lookup {
    fn from(s: &String) -> Self {
        Self::Ident(s.clone())
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(code) => write!(f, "key {}", vkey::to_spec(*code)),
            Self::Ident(id) => write!(f, "'{id}'"),
        }
    }
}

/// A registered key-to-action mapping.
///
/// Build with [`Binding::new`] and the `with_*`/`on_*` methods, then hand it to
/// [`crate::Engine::add`]. After registration only `key` and `disabled` change.
pub struct Binding {
    /// Current physical key.
    key: KeyCode,
    /// Key at construction time.
    default_key: KeyCode,
    /// Stable external handle.
    identifier: String,
    /// Human-readable label.
    description: String,
    /// Skipped by dispatch when true.
    disabled: bool,
    /// Rebind requests are ignored when true.
    no_rebind: bool,
    /// Modifier that must be held for key down/up to fire.
    modifier: Option<Modifier>,
    /// Minimum interval between accepted key downs.
    spam_prevention_ms: Option<u64>,
    /// Fire even while a menu page is open.
    allow_in_any_menu: bool,
    /// Bypass the menu check entirely (death screens are menu pages).
    allow_if_dead: bool,
    /// Bypass the menu check while this page is the open one.
    allow_in_specific_page: Option<String>,
    /// Gameplay-state gate for key down.
    restrictions: Option<RestrictionSet>,
    /// Hold-to-fire action.
    delayed_key_down: Option<DelayedKeyDown>,
    /// Fired every tick while the key is physically down.
    while_pressed: Option<Callback>,
    /// Fired on accepted key down.
    key_down: Option<Callback>,
    /// Fired on accepted key up.
    key_up: Option<Callback>,
}

impl Binding {
    /// Create a binding for `identifier` on `key` with no callbacks.
    pub fn new(identifier: impl Into<String>, key: KeyCode) -> Self {
        Self {
            key,
            default_key: key,
            identifier: identifier.into(),
            description: String::new(),
            disabled: false,
            no_rebind: false,
            modifier: None,
            spam_prevention_ms: None,
            allow_in_any_menu: false,
            allow_if_dead: false,
            allow_in_specific_page: None,
            restrictions: None,
            delayed_key_down: None,
            while_pressed: None,
            key_down: None,
            key_up: None,
        }
    }

    /// Set the human-readable label.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Require `modifier` to be held.
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    /// Ignore key downs arriving sooner than `ms` after the last accepted one.
    pub fn with_spam_prevention(mut self, ms: u64) -> Self {
        self.spam_prevention_ms = Some(ms);
        self
    }

    /// Gate key down on gameplay state.
    pub fn with_restrictions(mut self, restrictions: RestrictionSet) -> Self {
        self.restrictions = Some(restrictions);
        self
    }

    /// Allow firing while the menu page `page` is open.
    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.allow_in_specific_page = Some(page.into());
        self
    }

    /// Allow firing while any menu page is open.
    pub fn allow_in_any_menu(mut self) -> Self {
        self.allow_in_any_menu = true;
        self
    }

    /// Skip the menu check entirely.
    pub fn allow_if_dead(mut self) -> Self {
        self.allow_if_dead = true;
        self
    }

    /// Refuse all rebind requests.
    pub fn no_rebind(mut self) -> Self {
        self.no_rebind = true;
        self
    }

    /// Register in the disabled state.
    pub fn start_disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Fire `f` on accepted key down.
    pub fn on_key_down(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.key_down = Some(Box::new(f));
        self
    }

    /// Fire `f` on accepted key up.
    pub fn on_key_up(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.key_up = Some(Box::new(f));
        self
    }

    /// Fire `f` on every tick while the key is physically down.
    pub fn while_pressed(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.while_pressed = Some(Box::new(f));
        self
    }

    /// Fire `f` once after the key has been held for `ms_to_trigger`.
    ///
    /// While armed, the immediate key down callback is not fired. A zero duration
    /// never arms, so the binding then behaves as a plain key down binding.
    pub fn on_delayed_key_down(
        mut self,
        ms_to_trigger: u64,
        f: impl FnMut() + Send + 'static,
    ) -> Self {
        self.delayed_key_down = Some(DelayedKeyDown {
            ms_to_trigger,
            callback: Box::new(f),
        });
        self
    }

    /// Current physical key.
    pub fn key(&self) -> KeyCode {
        self.key
    }

    /// Key this binding was created with.
    pub fn default_key(&self) -> KeyCode {
        self.default_key
    }

    /// Stable identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Human-readable label.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// True when dispatch skips this binding.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// True unless created with [`Binding::no_rebind`].
    pub fn allows_rebind(&self) -> bool {
        !self.no_rebind
    }

    /// Required modifier, if any.
    pub fn modifier(&self) -> Option<Modifier> {
        self.modifier
    }

    /// Spam prevention window, if any.
    pub fn spam_prevention_ms(&self) -> Option<u64> {
        self.spam_prevention_ms
    }

    /// True when the binding fires while any menu page is open.
    pub fn allows_any_menu(&self) -> bool {
        self.allow_in_any_menu
    }

    /// True when the binding skips the menu check.
    pub fn allows_if_dead(&self) -> bool {
        self.allow_if_dead
    }

    /// Menu page the binding may fire in, if any.
    pub fn allowed_page(&self) -> Option<&str> {
        self.allow_in_specific_page.as_deref()
    }

    /// Gameplay restrictions, if any.
    pub fn restrictions(&self) -> Option<&RestrictionSet> {
        self.restrictions.as_ref()
    }

    /// Hold duration of the delayed trigger, if one is declared.
    pub fn delayed_ms(&self) -> Option<u64> {
        self.delayed_key_down.as_ref().map(|d| d.ms_to_trigger)
    }

    /// True when a key down callback is declared.
    pub fn has_key_down(&self) -> bool {
        self.key_down.is_some()
    }

    /// True when a key up callback is declared.
    pub fn has_key_up(&self) -> bool {
        self.key_up.is_some()
    }

    /// True when a while-pressed callback is declared.
    pub fn has_while_pressed(&self) -> bool {
        self.while_pressed.is_some()
    }

    pub(crate) fn set_key(&mut self, key: KeyCode) {
        self.key = key;
    }

    pub(crate) fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub(crate) fn fire_key_down(&mut self) -> bool {
        fire(self.key_down.as_mut())
    }

    pub(crate) fn fire_key_up(&mut self) -> bool {
        fire(self.key_up.as_mut())
    }

    pub(crate) fn fire_while_pressed(&mut self) -> bool {
        fire(self.while_pressed.as_mut())
    }

    pub(crate) fn fire_delayed(&mut self) -> bool {
        fire(self.delayed_key_down.as_mut().map(|d| &mut d.callback))
    }
}

/// Invoke `cb` if present; returns whether anything ran.
fn fire(cb: Option<&mut Callback>) -> bool {
    match cb {
        Some(f) => {
            f();
            true
        }
        None => false,
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("identifier", &self.identifier)
            .field("key", &self.key)
            .field("default_key", &self.default_key)
            .field("description", &self.description)
            .field("disabled", &self.disabled)
            .field("no_rebind", &self.no_rebind)
            .field("modifier", &self.modifier)
            .field("spam_prevention_ms", &self.spam_prevention_ms)
            .field("allow_in_any_menu", &self.allow_in_any_menu)
            .field("allow_if_dead", &self.allow_if_dead)
            .field("allow_in_specific_page", &self.allow_in_specific_page)
            .field("restrictions", &self.restrictions)
            .field("delayed_ms", &self.delayed_ms())
            .field("while_pressed", &self.has_while_pressed())
            .field("key_down", &self.has_key_down())
            .field("key_up", &self.has_key_up())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    #[test]
    fn lookup_conversions() {
        assert_eq!(Lookup::from(66u32), Lookup::Key(66));
        assert_eq!(Lookup::from(Key::B), Lookup::Key(66));
        assert_eq!(Lookup::from("b1"), Lookup::Ident("b1".into()));
        assert_eq!(Lookup::from(Key::B).to_string(), "key b");
        assert_eq!(Lookup::from("b1").to_string(), "'b1'");
    }

    #[test]
    fn new_binding_defaults() {
        let b = Binding::new("phone", Key::P.code());
        assert_eq!(b.key(), b.default_key());
        assert!(!b.is_disabled());
        assert!(b.allows_rebind());
        assert!(!b.has_key_down() && !b.has_key_up() && !b.has_while_pressed());
        assert_eq!(b.delayed_ms(), None);
    }

    #[test]
    fn fire_reports_presence() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let mut b = Binding::new("x", 1).on_key_down(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });
        assert!(b.fire_key_down());
        assert!(!b.fire_key_up());
        assert!(!b.fire_delayed());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
