//! Write-through cart persistence.

use shelf_cache::{cache_key, Cache};

use crate::cart::{Cart, CartItem};
use crate::catalog::Book;
use crate::ids::BookId;
use crate::price::Price;

/// Profile name used when none is configured.
pub const DEFAULT_PROFILE: &str = "default";

/// Owns the cart for one client profile and mirrors it to a [`Cache`].
///
/// The in-memory cart is authoritative. Every mutation commits locally
/// first and then writes the whole cart through; a failed write is logged
/// and does not undo the mutation. An empty cart removes its key.
#[derive(Debug)]
pub struct CartStore {
    cart: Cart,
    cache: Cache,
    key: String,
}

impl CartStore {
    /// Open the cart for `profile`, hydrating it from `cache`.
    ///
    /// Missing or unreadable stored data yields an empty cart.
    pub fn open(cache: Cache, profile: &str) -> Self {
        let key = cache_key!("cart", profile);
        let cart = match cache.get::<Cart>(&key) {
            Ok(Some(mut cart)) => {
                cart.normalize();
                tracing::debug!(key = %key, items = cart.items().len(), "hydrated cart");
                cart
            }
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "discarding unreadable stored cart");
                Cart::new()
            }
        };
        Self { cart, cache, key }
    }

    /// Storage key this cart is persisted under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    pub fn total_price(&self) -> Price {
        self.cart.total_price()
    }

    pub fn add(&mut self, book: &Book) {
        self.cart.add(book);
        tracing::debug!(book_id = %book.id, "added to cart");
        self.persist();
    }

    pub fn remove(&mut self, id: &BookId) {
        if self.cart.remove(id) {
            tracing::debug!(book_id = %id, "removed from cart");
        }
        self.persist();
    }

    /// Overwrite a quantity; zero or less removes the line.
    pub fn set_quantity(&mut self, id: &BookId, quantity: i64) {
        if self.cart.set_quantity(id, quantity) {
            tracing::debug!(book_id = %id, quantity, "cart quantity set");
        }
        self.persist();
    }

    /// Empty the cart and its stored copy.
    pub fn clear(&mut self) {
        self.cart.clear();
        tracing::debug!("cart cleared");
        self.persist();
    }

    fn persist(&self) {
        let result = if self.cart.is_empty() {
            self.cache.delete(&self.key)
        } else {
            self.cache.set(&self.key, &self.cart)
        };
        if let Err(e) = result {
            tracing::warn!(key = %self.key, error = %e, "failed to persist cart");
        }
    }
}
