//! Persistent storage for user key remaps.
//!
//! The dispatcher stores one integer per binding identifier. This crate defines the
//! [`KeyStore`] seam the engine writes through, plus two implementations:
//! - [`FileStore`]: a JSON object on disk, loaded once and flushed on [`KeyStore::save`]
//! - [`MemoryStore`]: an in-memory store that records every operation, for tests and replays

use std::{
    env,
    path::{Path, PathBuf},
};

mod error;
mod file;
mod memory;

pub use error::{Error, Result};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Minimal key-value persistence consumed by the keybinding engine.
///
/// Writes made through [`KeyStore::set`] become durable only after [`KeyStore::save`].
pub trait KeyStore: Send + Sync {
    /// Return true if a value is stored under `key`.
    fn has(&self, key: &str) -> bool;
    /// Return the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<i64>;
    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: i64);
    /// Flush pending writes.
    fn save(&self) -> Result<()>;
}

/// Determine the preferred store path (`~/.keybind/keybinds.json`).
pub fn default_store_path() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".keybind");
    p.push("keybinds.json");
    p
}

/// Resolve the effective store path: `explicit` when provided, else the default path.
pub fn resolve_store_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(default_store_path, Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let p = Path::new("/tmp/remaps.json");
        assert_eq!(resolve_store_path(Some(p)), p);
    }

    #[test]
    fn default_path_layout() {
        let p = resolve_store_path(None);
        assert!(p.ends_with(".keybind/keybinds.json"));
    }
}
