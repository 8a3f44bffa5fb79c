//! # Session Identity
//!
//! The client keeps exactly one session identifier, persisted under a fixed
//! key in a small key/value file (`~/.ragchat/storage.json`). It survives
//! restarts and is only replaced when the user starts a new conversation.
//!
//! All writes use atomic rename (write `.tmp`, then `rename()`) for crash safety.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

/// Storage key the session identifier lives under.
pub const SESSION_KEY: &str = "sessionId";

/// Key/value storage for client state that must survive restarts.
pub trait SessionStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// Returns `~/.ragchat/storage.json`.
pub fn storage_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".ragchat").join("storage.json"))
}

/// JSON-object file store.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> io::Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(&self.path)?;
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(mut map) => map.remove(key),
            Err(e) => {
                warn!("Failed to read {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        // A corrupt file is overwritten rather than blocking the write.
        let mut map = self.read_all().unwrap_or_default();
        map.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&map)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        atomic_write(&self.path, &json)?;
        debug!("Stored {} in {}", key, self.path.display());
        Ok(())
    }
}

/// In-memory store, used with `--ephemeral` and in tests.
#[derive(Default)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Generate a new random (UUID v4) session ID.
pub fn generate_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Reuse the stored session ID or mint one, and (re)persist it.
pub fn bootstrap(store: &mut dyn SessionStore) -> String {
    let id = match store.get(SESSION_KEY).filter(|id| !id.trim().is_empty()) {
        Some(id) => {
            info!("Resuming session {}", id);
            id
        }
        None => {
            let id = generate_session_id();
            info!("Starting new session {}", id);
            id
        }
    };
    persist_session_id(store, &id);
    id
}

/// Store the active session ID. Failures are logged, never fatal.
pub fn persist_session_id(store: &mut dyn SessionStore, id: &str) {
    if let Err(e) = store.set(SESSION_KEY, id) {
        warn!("Failed to persist session id: {}", e);
    }
}

/// Write `contents` to `path` via a sibling `.tmp` file and rename.
/// The temp file is removed if any step fails.
pub(crate) fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));
    let result = fs::write(&tmp_path, contents).and_then(|_| fs::rename(&tmp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}
