//! In-memory key store that records operations.

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use parking_lot::Mutex;

use crate::{Error, KeyStore, Result};

/// Volatile key store. Clones share state, so a test can keep a handle while the
/// engine owns another.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    /// Stored values.
    values: Arc<Mutex<BTreeMap<String, i64>>>,
    /// Log of mutating calls, e.g. `set keybind-b1=84` and `save`.
    calls: Arc<Mutex<Vec<String>>>,
    /// When set, `save` fails with a write error.
    fail_save: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `entries`. Seeding is not recorded as calls.
    pub fn with_values<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<String>,
    {
        let store = Self::new();
        store
            .values
            .lock()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v)));
        store
    }

    /// Recorded mutating calls, oldest first.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Number of `set` calls observed.
    pub fn writes(&self) -> usize {
        self.calls.lock().iter().filter(|c| c.starts_with("set ")).count()
    }

    /// Number of `save` calls observed.
    pub fn saves(&self) -> usize {
        self.calls.lock().iter().filter(|c| *c == "save").count()
    }

    /// Make subsequent `save` calls fail.
    pub fn set_fail_save(&self, v: bool) {
        self.fail_save.store(v, Ordering::SeqCst);
    }

    /// Record a mutating call.
    fn note(&self, s: String) {
        self.calls.lock().push(s);
    }
}

impl KeyStore for MemoryStore {
    fn has(&self, key: &str) -> bool {
        self.values.lock().contains_key(key)
    }

    fn get(&self, key: &str) -> Option<i64> {
        self.values.lock().get(key).copied()
    }

    fn set(&self, key: &str, value: i64) {
        self.note(format!("set {key}={value}"));
        self.values.lock().insert(key.to_string(), value);
    }

    fn save(&self) -> Result<()> {
        self.note("save".to_string());
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(Error::Write {
                path: "<memory>".into(),
                message: "save disabled".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls() {
        let store = MemoryStore::with_values([("keybind-a", 1)]);
        assert!(store.has("keybind-a"));
        assert!(store.calls().is_empty());

        store.set("keybind-a", 2);
        store.save().unwrap();
        assert_eq!(store.get("keybind-a"), Some(2));
        assert_eq!(store.calls(), vec!["set keybind-a=2", "save"]);
        assert_eq!((store.writes(), store.saves()), (1, 1));
    }

    #[test]
    fn clones_share_state() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.set("k", 7);
        assert_eq!(b.get("k"), Some(7));
    }

    #[test]
    fn failing_save() {
        let store = MemoryStore::new();
        store.set_fail_save(true);
        assert!(matches!(store.save(), Err(Error::Write { .. })));
        assert_eq!(store.saves(), 1);
    }
}
