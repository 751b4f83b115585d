use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::app_dirs::AppDirs;

pub const BEST_SECONDS_KEY: &str = "stillness-best-seconds";

/// On-disk shape: a single key whose value is the integer as text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct BestTimeEntry {
    #[serde(rename = "stillness-best-seconds")]
    best_seconds: String,
}

/// Persistence for the best elapsed time.
///
/// `load` never fails: anything unreadable counts as no best recorded.
pub trait BestTimeStore {
    fn load(&self) -> Option<u64>;
    fn save(&self, best_seconds: u64) -> io::Result<()>;
}

fn parse_best(text: &str) -> Option<u64> {
    text.trim().parse::<u64>().ok()
}

#[derive(Debug, Clone)]
pub struct FileBestTimeStore {
    path: PathBuf,
}

impl FileBestTimeStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::best_time_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileBestTimeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BestTimeStore for FileBestTimeStore {
    fn load(&self) -> Option<u64> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "could not read best time");
                return None;
            }
        };

        match serde_json::from_slice::<BestTimeEntry>(&bytes) {
            Ok(entry) => {
                let best = parse_best(&entry.best_seconds);
                if best.is_none() {
                    tracing::warn!(value = %entry.best_seconds, "ignoring malformed best time");
                }
                best
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "ignoring unreadable best time file"
                );
                None
            }
        }
    }

    fn save(&self, best_seconds: u64) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let entry = BestTimeEntry {
            best_seconds: best_seconds.to_string(),
        };
        let data = serde_json::to_vec_pretty(&entry).map_err(io::Error::other)?;
        fs::write(&self.path, data)
    }
}

/// In-memory store holding the raw text value, for tests and headless runs.
///
/// Clones share state so the caller can observe writes made through a clone
/// handed to the controller.
#[derive(Debug, Clone, Default)]
pub struct MemoryBestTimeStore {
    value: Rc<RefCell<Option<String>>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryBestTimeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: &str) -> Self {
        let store = Self::default();
        *store.value.borrow_mut() = Some(raw.to_string());
        store
    }

    pub fn raw(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl BestTimeStore for MemoryBestTimeStore {
    fn load(&self) -> Option<u64> {
        self.value.borrow().as_deref().and_then(parse_best)
    }

    fn save(&self, best_seconds: u64) -> io::Result<()> {
        *self.value.borrow_mut() = Some(best_seconds.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let store = FileBestTimeStore::with_path(dir.path().join("best.json"));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn save_and_load_best_time() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("best.json");
        let store = FileBestTimeStore::with_path(&path);

        store.save(5).unwrap();
        assert_eq!(store.load(), Some(5));

        store.save(3661).unwrap();
        assert_eq!(store.load(), Some(3661));
    }

    #[test]
    fn value_is_stored_as_text_under_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("best.json");
        FileBestTimeStore::with_path(&path).save(5).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(json[BEST_SECONDS_KEY], serde_json::Value::String("5".into()));
    }

    #[test]
    fn malformed_contents_load_as_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("best.json");
        let store = FileBestTimeStore::with_path(&path);

        fs::write(&path, b"not json at all").unwrap();
        assert_eq!(store.load(), None);

        fs::write(&path, br#"{"stillness-best-seconds": "forever"}"#).unwrap();
        assert_eq!(store.load(), None);

        fs::write(&path, br#"{"stillness-best-seconds": "-3"}"#).unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn save_into_unwritable_location_errors() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"").unwrap();
        let store = FileBestTimeStore::with_path(blocker.join("best.json"));

        assert!(store.save(1).is_err());
    }

    #[test]
    fn memory_store_counts_writes() {
        let store = MemoryBestTimeStore::new();
        let observer = store.clone();
        assert_eq!(store.load(), None);

        store.save(7).unwrap();
        assert_eq!(observer.raw().as_deref(), Some("7"));
        assert_eq!(observer.load(), Some(7));
        assert_eq!(observer.writes(), 1);
    }

    #[test]
    fn memory_store_ignores_garbage() {
        assert_eq!(MemoryBestTimeStore::with_raw("abc").load(), None);
        assert_eq!(MemoryBestTimeStore::with_raw("12").load(), Some(12));
    }
}
