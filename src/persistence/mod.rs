//! Key-value persistence for settings and local leaderboards
//!
//! Backends:
//! - `LocalStorage` in the browser
//! - `MemoryStore` natively and in tests
//!
//! Values are JSON documents. Callers decide what a failure means; the game
//! itself never depends on a save succeeding.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("storage backend rejected {op} for key {key}")]
    Backend { op: &'static str, key: String },
    #[error("malformed JSON under key {key}: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// Read and decode a JSON value; `Ok(None)` when the key is absent
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, PersistenceError> {
    match store.get(key)? {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| PersistenceError::Json {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(value).map_err(|source| PersistenceError::Json {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &json)
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Result<Self, PersistenceError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .map(|storage| Self { storage })
            .ok_or(PersistenceError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.storage
            .get_item(key)
            .map_err(|_| PersistenceError::Backend {
                op: "get",
                key: key.to_string(),
            })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.storage
            .set_item(key, value)
            .map_err(|_| PersistenceError::Backend {
                op: "set",
                key: key.to_string(),
            })
    }
}

/// The platform's default store
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Box<dyn KeyValueStore> {
    match LocalStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::warn!("{}, falling back to memory", e);
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Box<dyn KeyValueStore> {
    Box::new(MemoryStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        value: u32,
    }

    #[test]
    fn test_json_round_trip_through_memory() {
        let mut store = MemoryStore::new();
        let doc = Doc {
            name: "a".into(),
            value: 3,
        };
        save_json(&mut store, "doc", &doc).unwrap();
        let loaded: Option<Doc> = load_json(&store, "doc").unwrap();
        assert_eq!(loaded, Some(doc));
    }

    #[test]
    fn test_missing_key_is_none() {
        let store = MemoryStore::new();
        let loaded: Option<Doc> = load_json(&store, "nope").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_corrupt_json_is_an_error() {
        let mut store = MemoryStore::new();
        store.set("doc", "{not json").unwrap();
        let err = load_json::<Doc>(&store, "doc").unwrap_err();
        assert!(matches!(err, PersistenceError::Json { .. }));
    }
}
