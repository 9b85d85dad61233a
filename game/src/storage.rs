//! Key/value persistence used for the best score.
//!
//! Values are JSON text. Every failure is logged and swallowed here: readers get
//! their fallback and writers carry on as if nothing happened.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

pub const KEY_PREFIX: &str = "blockblast_";
pub const BEST_SCORE_KEY: &str = "bestScore";

pub trait KeyValueStore {
    fn read(&self, key: &str) -> io::Result<Option<String>>;
    fn write(&mut self, key: &str, json: &str) -> io::Result<()>;
}

pub fn get_or<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, fallback: T) -> T {
    let full_key = format!("{KEY_PREFIX}{key}");
    let raw = match store.read(&full_key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return fallback,
        Err(err) => {
            log::warn!("storage get failed for {full_key}: {err}");
            return fallback;
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        log::warn!("storage value for {full_key} is not valid: {err}");
        fallback
    })
}

pub fn set<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    let full_key = format!("{KEY_PREFIX}{key}");
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(err) => {
            log::warn!("storage set failed for {full_key}: {err}");
            return;
        }
    };
    if let Err(err) = store.write(&full_key, &json) {
        log::warn!("storage set failed for {full_key}: {err}");
    }
}

pub fn load_best_score(store: &dyn KeyValueStore) -> u32 {
    get_or(store, BEST_SCORE_KEY, 0u32)
}

/// Persists `score` when it beats `best`. Returns the (possibly unchanged) best.
pub fn record_best_score(store: &mut dyn KeyValueStore, best: u32, score: u32) -> u32 {
    if score <= best {
        return best;
    }
    set(store, BEST_SCORE_KEY, &score);
    score
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, json: &str) -> io::Result<()> {
        self.values.insert(key.to_string(), json.to_string());
        Ok(())
    }
}

/// All keys live in one JSON object on disk, rewritten atomically on every set.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("BLAST_STORE_PATH") {
            return Self::new(explicit);
        }

        let base = std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".local");
                    p.push("share");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("blockblast");
        path.push("store.json");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_map(&self) -> io::Result<BTreeMap<String, serde_json::Value>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err),
        };
        serde_json::from_slice(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        let map = self.load_map()?;
        Ok(map.get(key).map(|v| v.to_string()))
    }

    fn write(&mut self, key: &str, json: &str) -> io::Result<()> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        // A corrupt file is replaced; any other read failure aborts the write
        // so the keys already on disk survive.
        let mut map = match self.load_map() {
            Ok(map) => map,
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                log::warn!("replacing corrupt store {}: {err}", self.path.display());
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        map.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(&map)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        atomic_write(&self.path, text.as_bytes())
    }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    match fs::rename(&tmp, path) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(&tmp, path)?;
            let _ = fs::remove_file(&tmp);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn read(&self, _key: &str) -> io::Result<Option<String>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }

        fn write(&mut self, _key: &str, _json: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "quota exceeded"))
        }
    }

    #[test]
    fn missing_key_yields_fallback() {
        let store = MemoryStore::new();
        assert_eq!(get_or(&store, "nothing", 17u32), 17);
        assert_eq!(load_best_score(&store), 0);
    }

    #[test]
    fn keys_are_prefixed() {
        let mut store = MemoryStore::new();
        set(&mut store, BEST_SCORE_KEY, &120u32);
        assert_eq!(
            store.read("blockblast_bestScore").unwrap().as_deref(),
            Some("120")
        );
    }

    #[test]
    fn malformed_value_yields_fallback() {
        let mut store = MemoryStore::new();
        store.write("blockblast_bestScore", "\"lots\"").unwrap();
        assert_eq!(load_best_score(&store), 0);
    }

    #[test]
    fn failures_are_swallowed() {
        let mut store = BrokenStore;
        assert_eq!(load_best_score(&store), 0);
        assert_eq!(record_best_score(&mut store, 10, 50), 50);
    }

    #[test]
    fn best_score_only_moves_up() {
        let mut store = MemoryStore::new();
        assert_eq!(record_best_score(&mut store, 0, 90), 90);
        assert_eq!(record_best_score(&mut store, 90, 40), 90);
        assert_eq!(load_best_score(&store), 90);
    }
}
