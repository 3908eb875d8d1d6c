//! Typed key-value wrapper with automatic serialization.

use std::path::Path;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::store::{FileStore, MemoryStore, Store};
use crate::CacheError;

/// Type-safe cache backed by a [`Store`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`. Cloning a `Cache` shares the
/// underlying store.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn Store>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

impl Cache {
    /// Wrap an existing store.
    pub fn new(store: impl Store + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Open an in-memory cache. Nothing survives the process.
    pub fn open_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Open a file-backed cache rooted at `dir`, creating it if needed.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open_dir(".shelf")?;
    /// ```
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        Ok(Self::new(FileStore::open(dir)?))
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cart: Option<Cart> = cache.get("cart:default")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key)? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set(key, &bytes)
    }

    /// Delete a value from the cache. Deleting a missing key is not an error.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store.keys()
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// let key = shelf_cache::cache_key!("cart", "default");
/// assert_eq!(key, "cart:default");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
        pinned: bool,
    }

    #[test]
    fn test_get_missing_key() {
        let cache = Cache::open_memory();
        let value: Option<Note> = cache.get("nope").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_set_then_get() {
        let cache = Cache::open_memory();
        let note = Note {
            text: "buy more books".to_string(),
            pinned: true,
        };
        cache.set("note", &note).unwrap();

        let loaded: Note = cache.get("note").unwrap().unwrap();
        assert_eq!(loaded, note);
        assert!(cache.exists("note").unwrap());
    }

    #[test]
    fn test_delete() {
        let cache = Cache::open_memory();
        cache.set("note", &1).unwrap();
        cache.delete("note").unwrap();
        assert!(!cache.exists("note").unwrap());

        // Deleting again is fine.
        cache.delete("note").unwrap();
    }

    #[test]
    fn test_wrong_type_is_serialization_error() {
        let cache = Cache::open_memory();
        cache.set("note", &"just a string").unwrap();
        let result: Result<Option<Note>, _> = cache.get("note");
        assert!(matches!(result, Err(CacheError::SerializeError(_))));
    }

    #[test]
    fn test_clones_share_store() {
        let cache = Cache::open_memory();
        let other = cache.clone();
        cache.set("shared", &42).unwrap();
        assert_eq!(other.get::<i32>("shared").unwrap(), Some(42));
    }

    #[test]
    fn test_cache_key_macro() {
        assert_eq!(cache_key!("cart", "default"), "cart:default");
        assert_eq!(cache_key!("order", "user", 7), "order:user:7");
    }
}
