//! JSON file-backed key store.

use std::{
    collections::BTreeMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{Error, KeyStore, Result};

/// In-memory view of the store file.
#[derive(Debug, Default)]
struct Contents {
    /// Values keyed by storage key.
    values: BTreeMap<String, i64>,
    /// True when `values` differs from what is on disk.
    dirty: bool,
}

/// Key store persisted as a flat JSON object (`{"keybind-phone": 84}`).
///
/// The file is read once by [`FileStore::open`]. Writes stay in memory until
/// [`KeyStore::save`], which replaces the file atomically via a temporary sibling.
#[derive(Debug)]
pub struct FileStore {
    /// Location of the store file.
    path: PathBuf,
    /// Loaded values and dirty flag.
    contents: Mutex<Contents>,
}

impl FileStore {
    /// Open the store at `path`. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => parse(&path, &text)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("key store {} not found; starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                return Err(Error::Read {
                    path,
                    message: e.to_string(),
                });
            }
        };
        debug!("key store {} loaded: {} entries", path.display(), values.len());
        Ok(Self {
            path,
            contents: Mutex::new(Contents {
                values,
                dirty: false,
            }),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of every stored entry, sorted by key.
    pub fn entries(&self) -> Vec<(String, i64)> {
        self.contents
            .lock()
            .values
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    /// Write `values` to a temporary sibling and rename it over the store file.
    fn write_atomic(&self, values: &BTreeMap<String, i64>) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(values).map_err(io::Error::other)?;
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(body.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)
    }
}

/// Parse the store file body into a map of integers.
fn parse(path: &Path, text: &str) -> Result<BTreeMap<String, i64>> {
    serde_json::from_str(text).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        line: e.line(),
        col: e.column(),
        message: e.to_string(),
    })
}

impl KeyStore for FileStore {
    fn has(&self, key: &str) -> bool {
        self.contents.lock().values.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<i64> {
        self.contents.lock().values.get(key).copied()
    }

    fn set(&self, key: &str, value: i64) {
        let mut c = self.contents.lock();
        if c.values.insert(key.to_string(), value) != Some(value) {
            c.dirty = true;
        }
        trace!("store_set" = %key, value);
    }

    fn save(&self) -> Result<()> {
        let mut c = self.contents.lock();
        if !c.dirty {
            trace!("key store clean; skipping save");
            return Ok(());
        }
        self.write_atomic(&c.values).map_err(|e| Error::Write {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        c.dirty = false;
        debug!("key store {} saved: {} entries", self.path.display(), c.values.len());
        Ok(())
    }
}
