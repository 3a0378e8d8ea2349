use error_stack::{Result, ResultExt};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

/// Key the bearer token is persisted under.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Error)]
#[error("Could not access client storage")]
pub struct StorageError;

/// Small string key-value storage that outlives a client session.
pub trait TokenStorage: Send + Sync + std::fmt::Debug {
  fn get(&self, key: &str) -> Option<String>;
  fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
  fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
  entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }
}

impl TokenStorage for MemoryStorage {
  fn get(&self, key: &str) -> Option<String> {
    let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
    entries.get(key).cloned()
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
    let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
    entries.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), StorageError> {
    let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
    entries.remove(key);
    Ok(())
  }
}

/// Keeps entries as a JSON object in a file. A missing file reads as
/// empty storage.
#[derive(Debug)]
pub struct FileStorage {
  path: PathBuf,
  lock: RwLock<()>,
}

impl FileStorage {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      lock: RwLock::new(()),
    }
  }

  #[must_use]
  pub fn path(&self) -> &Path {
    &self.path
  }

  fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
    let contents = match std::fs::read_to_string(&self.path) {
      Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
      result => result
        .change_context(StorageError)
        .attach_printable_lazy(|| format!("could not read {}", self.path.display()))?,
    };

    serde_json::from_str(&contents)
      .change_context(StorageError)
      .attach_printable_lazy(|| format!("{} is not a JSON object of strings", self.path.display()))
  }

  fn store(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
    let contents = serde_json::to_string_pretty(entries).change_context(StorageError)?;
    std::fs::write(&self.path, contents)
      .change_context(StorageError)
      .attach_printable_lazy(|| format!("could not write {}", self.path.display()))
  }

  fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StorageError> {
    let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
    let mut entries = self.load()?;
    f(&mut entries);
    self.store(&entries)
  }
}

impl TokenStorage for FileStorage {
  fn get(&self, key: &str) -> Option<String> {
    let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
    match self.load() {
      Ok(mut entries) => entries.remove(key),
      Err(error) => {
        tracing::warn!(?error, "could not read client storage");
        None
      },
    }
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
    self.update(|entries| {
      entries.insert(key.to_string(), value.to_string());
    })
  }

  fn remove(&self, key: &str) -> Result<(), StorageError> {
    self.update(|entries| {
      entries.remove(key);
    })
  }
}
