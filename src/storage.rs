use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const STORE_DIR: &str = "gridiron_terminal";
const STORE_FILE: &str = "session.json";
const STORE_VERSION: u32 = 1;

/// String key/value storage that survives restarts. Only the session gate
/// talks to it.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoreFile {
    version: u32,
    entries: BTreeMap<String, String>,
}

/// JSON-file backed store. Entries are read once on open and every write
/// rewrites the file through a temp file + rename.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_store_file(&path)
            .map(|file| file.entries)
            .unwrap_or_default();
        Self { path, entries }
    }

    pub fn open_in(dir: &Path) -> Self {
        Self::open(dir.join(STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create store dir {}", dir.display()))?;
        }
        let file = StoreFile {
            version: STORE_VERSION,
            entries: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file).context("serialize session store")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).context("write session store")?;
        fs::rename(&tmp, &self.path).context("swap session store")?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_none() {
            return Ok(());
        }
        self.save()
    }
}

fn load_store_file(path: &Path) -> Option<StoreFile> {
    let raw = fs::read_to_string(path).ok()?;
    let file = serde_json::from_str::<StoreFile>(&raw).ok()?;
    if file.version != STORE_VERSION {
        return None;
    }
    Some(file)
}

/// `$XDG_CACHE_HOME/gridiron_terminal`, falling back to `~/.cache/gridiron_terminal`.
pub fn default_store_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(STORE_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(STORE_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("gridiron_store_{}_{name}", std::process::id()));
        path.push(STORE_FILE);
        path
    }

    #[test]
    fn file_store_survives_reopen() {
        let path = scratch_path("reopen");
        let _ = fs::remove_file(&path);

        let mut store = FileStore::open(&path);
        store.set("auth-token", "abc").expect("write should succeed");
        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("auth-token").as_deref(), Some("abc"));

        let mut reopened = reopened;
        reopened.remove("auth-token").expect("remove should succeed");
        assert_eq!(FileStore::open(&path).get("auth-token"), None);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unreadable_store_file_opens_empty() {
        let path = scratch_path("garbage");
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).expect("temp dir");
        }
        fs::write(&path, "{not json").expect("write garbage");
        let store = FileStore::open(&path);
        assert_eq!(store.get("auth-user"), None);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn removing_missing_key_is_ok() {
        let mut store = MemoryStore::new();
        store.remove("auth-token").expect("remove is idempotent");
        assert!(store.is_empty());
    }
}
