use std::cell::{Cell, RefCell};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;

/// Values under one namespace, keyed by item
pub type Namespace = IndexMap<String, Value>;

/// Everything in the store: namespace -> key -> value
pub type KvData = IndexMap<String, Namespace>;

const FILE_VERSION: u32 = 1;

/// Error type for key-value persistence
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not back up corrupt {path}: {source}")]
    Backup {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Where the store's bytes live.
pub trait KvBackend {
    /// Load the full map. A missing store is empty, not an error.
    fn load(&self) -> Result<KvData, StoreError>;
    /// Replace the stored map with `data`.
    fn persist(&self, data: &KvData) -> Result<(), StoreError>;
    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// On-disk shape of progress.json
#[derive(Debug, Serialize, Deserialize)]
struct StoredFile {
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated: Option<DateTime<Utc>>,
    #[serde(default)]
    data: KvData,
}

/// Write `content` to `path` via a temp file in the same directory and a rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Copy an unreadable file aside before it gets replaced. Tries
/// `<name>.bak`, then `<name>.<timestamp>.bak`; an existing backup is never
/// overwritten. Returns the backup path.
pub fn backup_corrupt(path: &Path, now: DateTime<Utc>) -> io::Result<PathBuf> {
    let stamped = path.with_extension(format!("json.{}.bak", now.format("%Y%m%dT%H%M%S%3f")));
    for candidate in [path.with_extension("json.bak"), stamped] {
        let mut out = match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(out) => out,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        };
        let mut src = fs::File::open(path)?;
        io::copy(&mut src, &mut out)?;
        out.sync_all()?;
        return Ok(candidate);
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        "every backup name is taken",
    ))
}

/// JSON file backend (progress.json)
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileBackend { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KvBackend for JsonFileBackend {
    fn load(&self) -> Result<KvData, StoreError> {
        if !self.path.exists() {
            return Ok(KvData::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| StoreError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        match serde_json::from_str::<StoredFile>(&content) {
            Ok(file) => {
                if file.version > FILE_VERSION {
                    tracing::warn!(
                        path = %self.path.display(),
                        version = file.version,
                        "progress file is from a newer version; reading anyway"
                    );
                }
                Ok(file.data)
            }
            Err(e) => {
                // Corrupted: start fresh only once the old bytes are safe
                let bak = backup_corrupt(&self.path, Utc::now()).map_err(|source| {
                    StoreError::Backup {
                        path: self.path.clone(),
                        source,
                    }
                })?;
                tracing::warn!(
                    path = %self.path.display(),
                    backup = %bak.display(),
                    error = %e,
                    "could not parse progress file; starting empty"
                );
                Ok(KvData::new())
            }
        }
    }

    fn persist(&self, data: &KvData) -> Result<(), StoreError> {
        let write_err = |e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let file = StoredFile {
            version: FILE_VERSION,
            updated: Some(Utc::now()),
            data: data.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        atomic_write(&self.path, content.as_bytes()).map_err(write_err)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory backend. Clones share the same contents, so a test can keep a
/// handle to inspect what was persisted or to make writes fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    data: Rc<RefCell<KvData>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent persist fail (simulates a full disk)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn snapshot(&self) -> KvData {
        self.data.borrow().clone()
    }
}

impl KvBackend for MemoryBackend {
    fn load(&self) -> Result<KvData, StoreError> {
        Ok(self.data.borrow().clone())
    }

    fn persist(&self, data: &KvData) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable("quota exceeded".into()));
        }
        *self.data.borrow_mut() = data.clone();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Namespaced key-value store with typed reads and write-through persistence.
pub struct KvStore {
    data: KvData,
    backend: Box<dyn KvBackend>,
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore")
            .field("backend", &self.backend.describe())
            .field("namespaces", &self.data.len())
            .finish()
    }
}

impl KvStore {
    /// Load the store from a backend.
    pub fn open(backend: Box<dyn KvBackend>) -> Result<Self, StoreError> {
        let data = backend.load()?;
        tracing::debug!(
            backend = %backend.describe(),
            namespaces = data.len(),
            "opened store"
        );
        Ok(KvStore { data, backend })
    }

    /// Open the JSON file at `path`
    pub fn open_file(path: &Path) -> Result<Self, StoreError> {
        Self::open(Box::new(JsonFileBackend::new(path)))
    }

    /// An empty store that persists nowhere but memory
    pub fn in_memory() -> Self {
        KvStore {
            data: KvData::new(),
            backend: Box::new(MemoryBackend::new()),
        }
    }

    /// Read a typed value, returning `default` when the key is absent or
    /// the stored value does not deserialize as `T`.
    pub fn read<T: DeserializeOwned>(&self, namespace: &str, key: &str, default: T) -> T {
        let Some(value) = self.read_raw(namespace, key) else {
            return default;
        };
        match serde_json::from_value(value.clone()) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(
                    namespace,
                    key,
                    %value,
                    error = %e,
                    "malformed stored value; using default"
                );
                default
            }
        }
    }

    pub fn read_raw(&self, namespace: &str, key: &str) -> Option<&Value> {
        self.data.get(namespace)?.get(key)
    }

    /// Write a value and persist. On persist failure the in-memory value is
    /// restored, so memory never disagrees with the backend.
    pub fn write<T: Serialize>(
        &mut self,
        namespace: &str,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        let previous = self
            .data
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);

        if let Err(e) = self.backend.persist(&self.data) {
            let ns = self.data.entry(namespace.to_string()).or_default();
            match previous {
                Some(prev) => {
                    ns.insert(key.to_string(), prev);
                }
                None => {
                    ns.shift_remove(key);
                }
            }
            if ns.is_empty() {
                self.data.shift_remove(namespace);
            }
            tracing::error!(namespace, key, error = %e, "write failed");
            return Err(e);
        }
        Ok(())
    }

    /// Remove every key in a namespace. Returns how many were removed.
    pub fn remove_namespace(&mut self, namespace: &str) -> Result<usize, StoreError> {
        let Some(index) = self.data.get_index_of(namespace) else {
            return Ok(0);
        };
        let Some((name, removed)) = self.data.shift_remove_index(index) else {
            return Ok(0);
        };
        if let Err(e) = self.backend.persist(&self.data) {
            self.data.shift_insert(index, name, removed);
            tracing::error!(namespace, error = %e, "reset failed");
            return Err(e);
        }
        Ok(removed.len())
    }

    /// Stored keys and raw values in a namespace
    pub fn entries(&self, namespace: &str) -> impl Iterator<Item = (&str, &Value)> {
        self.data
            .get(namespace)
            .into_iter()
            .flat_map(|ns| ns.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(|k| k.as_str())
    }

    pub fn backend_description(&self) -> String {
        self.backend.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_absent_returns_default() {
        let store = KvStore::in_memory();
        assert_eq!(store.read("museum", "123", 0u8), 0);
        assert_eq!(store.read("general", "name", "Farmer".to_string()), "Farmer");
    }

    #[test]
    fn write_then_read() {
        let mut store = KvStore::in_memory();
        store.write("general", "name", &"Abigail").unwrap();
        assert_eq!(store.read("general", "name", String::new()), "Abigail");
    }

    #[test]
    fn malformed_value_reads_as_default() {
        let mut store = KvStore::in_memory();
        store.write("museum", "96", &"not a number").unwrap();
        assert_eq!(store.read("museum", "96", 0u8), 0);
    }

    #[test]
    fn failed_write_rolls_back() {
        let backend = MemoryBackend::new();
        let mut store = KvStore::open(Box::new(backend.clone())).unwrap();
        store.write("museum", "96", &1u8).unwrap();

        backend.set_fail_writes(true);
        let err = store.write("museum", "96", &2u8).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.read("museum", "96", 0u8), 1);

        // A brand-new key is removed again, and so is its empty namespace
        assert!(store.write("cooking", "194", &1u8).is_err());
        assert!(store.read_raw("cooking", "194").is_none());
        assert_eq!(store.namespaces().collect::<Vec<_>>(), vec!["museum"]);
    }

    #[test]
    fn remove_namespace_counts_and_persists() {
        let backend = MemoryBackend::new();
        let mut store = KvStore::open(Box::new(backend.clone())).unwrap();
        store.write("museum", "96", &1u8).unwrap();
        store.write("museum", "97", &2u8).unwrap();
        store.write("cooking", "194", &2u8).unwrap();

        assert_eq!(store.remove_namespace("museum").unwrap(), 2);
        assert_eq!(store.remove_namespace("museum").unwrap(), 0);
        assert!(!backend.snapshot().contains_key("museum"));
        assert!(backend.snapshot().contains_key("cooking"));
    }

    #[test]
    fn failed_remove_restores_namespace_in_place() {
        let backend = MemoryBackend::new();
        let mut store = KvStore::open(Box::new(backend.clone())).unwrap();
        store.write("museum", "96", &1u8).unwrap();
        store.write("cooking", "194", &2u8).unwrap();

        backend.set_fail_writes(true);
        assert!(store.remove_namespace("museum").is_err());
        assert_eq!(store.namespaces().collect::<Vec<_>>(), vec!["museum", "cooking"]);
        assert_eq!(store.read("museum", "96", 0u8), 1);
    }

    #[test]
    fn file_backend_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        {
            let mut store = KvStore::open_file(&path).unwrap();
            store.write("museum", "96", &2u8).unwrap();
            store.write("general", "name", &"Sam").unwrap();
        }
        let store = KvStore::open_file(&path).unwrap();
        assert_eq!(store.read("museum", "96", 0u8), 2);
        assert_eq!(store.read("general", "name", String::new()), "Sam");

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert!(raw["updated"].is_string());
        assert_eq!(raw["data"]["museum"]["96"], 2);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = KvStore::open_file(&dir.path().join("progress.json")).unwrap();
        assert_eq!(store.namespaces().count(), 0);
    }

    #[test]
    fn corrupt_file_is_backed_up() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "not json {{{").unwrap();

        let store = KvStore::open_file(&path).unwrap();
        assert_eq!(store.namespaces().count(), 0);
        let bak = dir.path().join("progress.json.bak");
        assert_eq!(fs::read_to_string(bak).unwrap(), "not json {{{");
    }

    #[test]
    fn second_corruption_keeps_first_backup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        let bak = dir.path().join("progress.json.bak");
        fs::write(&bak, "older backup").unwrap();
        fs::write(&path, r#"{"version":1,"data":{"museum":{"96":2,"97":1"#).unwrap();

        let mut store = KvStore::open_file(&path).unwrap();
        store.write("museum", "98", &1u8).unwrap();

        assert_eq!(fs::read_to_string(&bak).unwrap(), "older backup");
        let stamped: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| {
                n.starts_with("progress.json.") && n.ends_with(".bak") && n != "progress.json.bak"
            })
            .collect();
        assert_eq!(stamped.len(), 1);
        let saved = fs::read_to_string(dir.path().join(&stamped[0])).unwrap();
        assert!(saved.contains(r#""96":2"#));
    }

    #[test]
    fn unwritable_backup_refuses_to_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        let corrupt = r#"{"version":1,"data":{"museum":{"96":2"#;
        fs::write(&path, corrupt).unwrap();

        // Both backup names already taken by directories
        let now = Utc::now();
        fs::create_dir(dir.path().join("progress.json.bak")).unwrap();
        let stamp = now.format("%Y%m%dT%H%M%S%3f");
        fs::create_dir(path.with_extension(format!("json.{}.bak", stamp))).unwrap();

        let err = backup_corrupt(&path, now).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&path).unwrap(), corrupt);
    }

    #[test]
    fn backup_dir_collision_still_saves_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        let corrupt = r#"{"version":1,"data":{"museum":{"96":2,"97":1"#;
        fs::write(&path, corrupt).unwrap();
        fs::create_dir(dir.path().join("progress.json.bak")).unwrap();

        let bak = backup_corrupt(&path, Utc::now()).unwrap();
        assert_ne!(bak, dir.path().join("progress.json.bak"));
        assert_eq!(fs::read_to_string(bak).unwrap(), corrupt);
    }

    #[test]
    fn file_backend_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/progress.json");
        let mut store = KvStore::open_file(&path).unwrap();
        store.write("museum", "96", &1u8).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn entries_lists_namespace() {
        let mut store = KvStore::in_memory();
        store.write("museum", "96", &1u8).unwrap();
        store.write("museum", "97", &2u8).unwrap();
        let keys: Vec<&str> = store.entries("museum").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["96", "97"]);
        assert_eq!(store.entries("cooking").count(), 0);
    }
}
