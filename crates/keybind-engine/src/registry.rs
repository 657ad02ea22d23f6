use std::collections::HashMap;

use tracing::{debug, trace, warn};
use vkey::KeyCode;

use crate::binding::{Binding, Lookup};

/// Position of a binding in registration order. Bindings are never removed, so an
/// id stays valid for the registry's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(usize);

/// Owns binding records and the key/identifier indexes over them.
#[derive(Debug, Default)]
pub struct Registry {
    bindings: Vec<Binding>,
    /// Map key code → ids on that key, in registration order. Updated on every rebind.
    by_key: HashMap<KeyCode, Vec<BindingId>>,
    /// Map identifier → ids registered under it, in registration order. Holds more
    /// than one id only when a caller registers a duplicate identifier.
    by_ident: HashMap<String, Vec<BindingId>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a binding. Duplicate identifiers are accepted with a warning.
    pub fn insert(&mut self, binding: Binding) -> BindingId {
        let id = BindingId(self.bindings.len());
        let ids = self
            .by_ident
            .entry(binding.identifier().to_string())
            .or_default();
        if !ids.is_empty() {
            warn!(
                "duplicate keybind identifier '{}' registered; lookups by identifier return the first",
                binding.identifier()
            );
        }
        ids.push(id);
        self.by_key.entry(binding.key()).or_default().push(id);
        debug!(
            "Registered keybind '{}' on {} (id {})",
            binding.identifier(),
            vkey::to_spec(binding.key()),
            id.0
        );
        self.bindings.push(binding);
        id
    }

    pub fn get(&self, id: BindingId) -> Option<&Binding> {
        self.bindings.get(id.0)
    }

    pub fn get_mut(&mut self, id: BindingId) -> Option<&mut Binding> {
        self.bindings.get_mut(id.0)
    }

    /// Every id, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = BindingId> + use<> {
        (0..self.bindings.len()).map(BindingId)
    }

    /// Ids matching `lookup`, in registration order.
    pub fn ids_for(&self, lookup: &Lookup) -> Vec<BindingId> {
        let ids = match lookup {
            Lookup::Key(code) => self.by_key.get(code),
            Lookup::Ident(ident) => self.by_ident.get(ident),
        };
        ids.cloned().unwrap_or_default()
    }

    /// First id matching `lookup`.
    pub fn first_id(&self, lookup: &Lookup) -> Option<BindingId> {
        let ids = match lookup {
            Lookup::Key(code) => self.by_key.get(code),
            Lookup::Ident(ident) => self.by_ident.get(ident),
        };
        ids.and_then(|v| v.first().copied())
    }

    pub fn lookup_one(&self, lookup: &Lookup) -> Option<&Binding> {
        self.first_id(lookup).and_then(|id| self.get(id))
    }

    pub fn lookup_one_mut(&mut self, lookup: &Lookup) -> Option<&mut Binding> {
        self.first_id(lookup).and_then(|id| self.get_mut(id))
    }

    pub fn lookup_all(&self, lookup: &Lookup) -> Vec<&Binding> {
        self.ids_for(lookup)
            .into_iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    /// Set `disabled` on the first match; returns whether a binding was found.
    pub fn set_disabled(&mut self, lookup: &Lookup, disabled: bool) -> bool {
        match self.lookup_one_mut(lookup) {
            Some(b) => {
                b.set_disabled(disabled);
                debug!(
                    "Keybind '{}' {}",
                    b.identifier(),
                    if disabled { "disabled" } else { "enabled" }
                );
                true
            }
            None => {
                trace!("set_disabled: no keybind for {}", lookup);
                false
            }
        }
    }

    /// Move binding `id` to `key`, keeping both key indexes in registration order.
    pub fn set_key(&mut self, id: BindingId, key: KeyCode) {
        let Some(b) = self.bindings.get_mut(id.0) else {
            return;
        };
        let old = b.key();
        if old == key {
            return;
        }
        b.set_key(key);

        if let Some(ids) = self.by_key.get_mut(&old) {
            ids.retain(|&i| i != id);
            if ids.is_empty() {
                self.by_key.remove(&old);
            }
        }
        let ids = self.by_key.entry(key).or_default();
        if let Err(pos) = ids.binary_search(&id) {
            ids.insert(pos, id);
        }
    }

    /// Every binding, in registration order.
    pub fn list(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}
