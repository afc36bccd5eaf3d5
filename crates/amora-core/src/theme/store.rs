use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const KEY_PREFIX: &str = "chatTheme_";
const ANONYMOUS: &str = "anonymous";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("preference store I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("preference store lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// String key-value storage for per-identity preference records.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

impl<T: SettingsStore + ?Sized> SettingsStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Key under which an identity's chat theme is stored. Unauthenticated
/// sessions share the anonymous key.
pub fn storage_key(principal: Option<&str>) -> String {
    format!("{}{}", KEY_PREFIX, principal.unwrap_or(ANONYMOUS))
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_filename(key)))
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '.' => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        std::env::temp_dir().join(format!("amora-{}-{}-{}", name, std::process::id(), nanos))
    }

    #[test]
    fn keys_are_per_identity() {
        assert_eq!(storage_key(Some("abc-123")), "chatTheme_abc-123");
        assert_eq!(storage_key(None), "chatTheme_anonymous");
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = scratch_dir("file-store");
        let key = storage_key(Some("user/with:odd.chars"));

        JsonFileStore::new(&dir).set(&key, r#"{"a":1}"#).unwrap();
        let reopened = JsonFileStore::new(&dir);
        assert_eq!(reopened.get(&key).unwrap().as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(reopened.get("missing").unwrap(), None);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("chatTheme_a/b"), "chatTheme_a_b");
        assert_eq!(sanitize_filename("x.y:z"), "x_y_z");
    }
}
