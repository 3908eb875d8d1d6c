//! Backend service seam.
//!
//! Everything the storefront persists remotely goes through
//! [`BackendService`]: the books table, user listings, orders, the role
//! table, image storage and the account-deletion function. Two
//! implementations exist: [`MemoryBackend`] here and the REST backend in
//! `shelf-data`.

mod memory;

use std::fmt;

use async_trait::async_trait;

use crate::account::{User, UserSummary};
use crate::catalog::{Book, ImageUpload, Listing, ListingStatus, NewBook, NewListing};
use crate::checkout::{NewOrder, Order, OrderStatus};
use crate::ids::{BookId, OrderId, UserId};

pub use memory::{MemoryBackend, MemorySnapshot};

/// Failure reported by the backend. Only the message is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The backend's message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for BackendError {}

/// Result alias for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// Remote persistence and identity.
///
/// Row-level visibility is the backend's job: `fetch_orders` returns the
/// caller's own orders, or every order for an admin.
#[async_trait]
pub trait BackendService: Send + Sync {
    /// The signed-in user, if any.
    async fn current_user(&self) -> BackendResult<Option<User>>;

    /// Admin-added books, newest first.
    async fn fetch_books(&self) -> BackendResult<Vec<Book>>;

    /// Listings whose status is active.
    async fn fetch_active_listings(&self) -> BackendResult<Vec<Listing>>;

    /// Insert an order and return it as stored.
    async fn submit_order(&self, order: &NewOrder) -> BackendResult<Order>;

    /// Orders visible to the caller, newest first.
    async fn fetch_orders(&self) -> BackendResult<Vec<Order>>;

    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> BackendResult<()>;

    /// Whether `user` holds the admin role.
    async fn is_admin(&self, user: &UserId) -> BackendResult<bool>;

    async fn create_book(&self, book: &NewBook) -> BackendResult<Book>;

    async fn delete_book(&self, id: &BookId) -> BackendResult<()>;

    /// Every registered user, for the back office.
    async fn list_users(&self) -> BackendResult<Vec<UserSummary>>;

    async fn create_listing(&self, listing: &NewListing) -> BackendResult<Listing>;

    /// Listings owned by `user`, whatever their status.
    async fn fetch_user_listings(&self, user: &UserId) -> BackendResult<Vec<Listing>>;

    async fn set_listing_status(&self, id: &BookId, status: ListingStatus) -> BackendResult<()>;

    /// Store an image and return its public URL.
    async fn upload_image(&self, upload: &ImageUpload) -> BackendResult<String>;

    /// Delete the signed-in user's account server-side.
    async fn delete_account(&self) -> BackendResult<()>;
}
