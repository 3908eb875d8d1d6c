//! Durable client-side key-value storage for Shelf.
//!
//! Provides a small, typed API over a byte store with automatic JSON
//! serialization. Two stores ship with the crate: [`MemoryStore`] for tests
//! and ephemeral sessions, and [`FileStore`] which keeps one file per key in a
//! directory and survives restarts.
//!
//! # Example
//!
//! ```rust,ignore
//! use shelf_cache::Cache;
//!
//! let cache = Cache::open_dir("/home/me/.local/share/shelf")?;
//!
//! // Store a value
//! cache.set("cart:default", &cart)?;
//!
//! // Retrieve a value
//! let cart: Option<Cart> = cache.get("cart:default")?;
//!
//! // Delete a value
//! cache.delete("cart:default")?;
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use store::{FileStore, MemoryStore, Store};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, MemoryStore, Store};
}
