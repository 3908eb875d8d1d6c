//! In-memory backend.
//!
//! Emulates the hosted service closely enough for offline use and tests:
//! row visibility follows the signed-in user, ids and timestamps are
//! assigned on insert, and any operation can be switched into an outage.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::account::{User, UserSummary};
use crate::backend::{BackendError, BackendResult, BackendService};
use crate::catalog::{Book, ImageUpload, Listing, ListingStatus, NewBook, NewListing};
use crate::checkout::{NewOrder, Order, OrderStatus};
use crate::ids::{BookId, OrderId, UserId};

/// Serializable contents of a [`MemoryBackend`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySnapshot {
    /// Admin-added books with their insert time.
    pub books: Vec<(Book, DateTime<Utc>)>,
    pub listings: Vec<Listing>,
    pub orders: Vec<Order>,
    pub users: Vec<UserSummary>,
    pub admins: BTreeSet<UserId>,
    pub current_user: Option<User>,
    pub last_tick: Option<DateTime<Utc>>,
}

/// A [`BackendService`] held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemorySnapshot>,
    outages: BTreeSet<&'static str>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a backend from a snapshot.
    pub fn from_snapshot(snapshot: MemorySnapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
            outages: BTreeSet::new(),
        }
    }

    /// Copy out the current contents.
    pub fn snapshot(&self) -> BackendResult<MemorySnapshot> {
        Ok(self.lock()?.clone())
    }

    /// Start with `user` signed in.
    pub fn signed_in(self, user: User) -> Self {
        if let Ok(mut state) = self.state.lock() {
            register(&mut state, &user);
            state.current_user = Some(user);
        }
        self
    }

    /// Grant `user` the admin role.
    pub fn with_admin(self, user: UserId) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.admins.insert(user);
        }
        self
    }

    /// Make every call to `operation` fail, e.g. `"fetch_books"`.
    pub fn with_outage(mut self, operation: &'static str) -> Self {
        self.outages.insert(operation);
        self
    }

    /// Switch the session to `user`, registering them if new.
    pub fn sign_in(&self, user: User) -> BackendResult<()> {
        let mut state = self.lock()?;
        register(&mut state, &user);
        state.current_user = Some(user);
        Ok(())
    }

    pub fn sign_out(&self) -> BackendResult<()> {
        self.lock()?.current_user = None;
        Ok(())
    }

    /// Grant or revoke the admin role.
    pub fn set_admin(&self, user: &UserId, admin: bool) -> BackendResult<()> {
        let mut state = self.lock()?;
        if admin {
            state.admins.insert(user.clone());
        } else {
            state.admins.remove(user);
        }
        Ok(())
    }

    fn lock(&self) -> BackendResult<MutexGuard<'_, MemorySnapshot>> {
        self.state
            .lock()
            .map_err(|e| BackendError::new(format!("memory backend poisoned: {e}")))
    }

    fn check(&self, operation: &'static str) -> BackendResult<()> {
        if self.outages.contains(operation) {
            return Err(BackendError::new(format!("{operation}: service unavailable")));
        }
        Ok(())
    }
}

fn register(state: &mut MemorySnapshot, user: &User) {
    if state.users.iter().any(|u| u.id == user.id) {
        return;
    }
    let created_at = tick(state);
    state.users.push(UserSummary {
        id: user.id.clone(),
        email: user.email.clone(),
        created_at,
        is_admin: false,
    });
}

/// Strictly increasing timestamps so "newest first" is well defined.
fn tick(state: &mut MemorySnapshot) -> DateTime<Utc> {
    let now = Utc::now();
    let next = match state.last_tick {
        Some(last) if now <= last => last + Duration::milliseconds(1),
        _ => now,
    };
    state.last_tick = Some(next);
    next
}

#[async_trait]
impl BackendService for MemoryBackend {
    async fn current_user(&self) -> BackendResult<Option<User>> {
        self.check("current_user")?;
        Ok(self.lock()?.current_user.clone())
    }

    async fn fetch_books(&self) -> BackendResult<Vec<Book>> {
        self.check("fetch_books")?;
        let state = self.lock()?;
        let mut books = state.books.clone();
        books.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(books.into_iter().map(|(book, _)| book).collect())
    }

    async fn fetch_active_listings(&self) -> BackendResult<Vec<Listing>> {
        self.check("fetch_active_listings")?;
        Ok(self
            .lock()?
            .listings
            .iter()
            .filter(|l| l.is_active())
            .cloned()
            .collect())
    }

    async fn submit_order(&self, order: &NewOrder) -> BackendResult<Order> {
        self.check("submit_order")?;
        let mut state = self.lock()?;
        let created_at = tick(&mut state);
        let order = order.clone().into_order(OrderId::generate(), created_at);
        state.orders.push(order.clone());
        Ok(order)
    }

    async fn fetch_orders(&self) -> BackendResult<Vec<Order>> {
        self.check("fetch_orders")?;
        let state = self.lock()?;
        let Some(user) = &state.current_user else {
            return Ok(Vec::new());
        };
        let see_all = state.admins.contains(&user.id);
        let mut orders: Vec<Order> = state
            .orders
            .iter()
            .filter(|o| see_all || o.user_id.as_ref() == Some(&user.id))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> BackendResult<()> {
        self.check("update_order_status")?;
        let mut state = self.lock()?;
        let order = state
            .orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| BackendError::new(format!("order {id} not found")))?;
        order.status = status;
        Ok(())
    }

    async fn is_admin(&self, user: &UserId) -> BackendResult<bool> {
        self.check("is_admin")?;
        Ok(self.lock()?.admins.contains(user))
    }

    async fn create_book(&self, book: &NewBook) -> BackendResult<Book> {
        self.check("create_book")?;
        let mut state = self.lock()?;
        let created_at = tick(&mut state);
        let book = book.clone().into_book(BookId::generate());
        state.books.push((book.clone(), created_at));
        Ok(book)
    }

    async fn delete_book(&self, id: &BookId) -> BackendResult<()> {
        self.check("delete_book")?;
        self.lock()?.books.retain(|(b, _)| &b.id != id);
        Ok(())
    }

    async fn list_users(&self) -> BackendResult<Vec<UserSummary>> {
        self.check("list_users")?;
        let state = self.lock()?;
        Ok(state
            .users
            .iter()
            .map(|u| UserSummary {
                is_admin: state.admins.contains(&u.id),
                ..u.clone()
            })
            .collect())
    }

    async fn create_listing(&self, listing: &NewListing) -> BackendResult<Listing> {
        self.check("create_listing")?;
        let mut state = self.lock()?;
        let created_at = tick(&mut state);
        let listing = listing.clone().into_listing(BookId::generate(), created_at);
        state.listings.push(listing.clone());
        Ok(listing)
    }

    async fn fetch_user_listings(&self, user: &UserId) -> BackendResult<Vec<Listing>> {
        self.check("fetch_user_listings")?;
        let mut listings: Vec<Listing> = self
            .lock()?
            .listings
            .iter()
            .filter(|l| &l.user_id == user)
            .cloned()
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    async fn set_listing_status(&self, id: &BookId, status: ListingStatus) -> BackendResult<()> {
        self.check("set_listing_status")?;
        let mut state = self.lock()?;
        let listing = state
            .listings
            .iter_mut()
            .find(|l| &l.book.id == id)
            .ok_or_else(|| BackendError::new(format!("listing {id} not found")))?;
        listing.status = status;
        Ok(())
    }

    async fn upload_image(&self, upload: &ImageUpload) -> BackendResult<String> {
        self.check("upload_image")?;
        let state = self.lock()?;
        let owner = state
            .current_user
            .as_ref()
            .map(|u| u.id.clone())
            .unwrap_or_else(|| UserId::new("anonymous"));
        Ok(format!("memory://book-images/{}", upload.object_path(&owner)))
    }

    async fn delete_account(&self) -> BackendResult<()> {
        self.check("delete_account")?;
        let mut state = self.lock()?;
        let user = state
            .current_user
            .take()
            .ok_or_else(|| BackendError::new("not signed in"))?;
        state.users.retain(|u| u.id != user.id);
        state.admins.remove(&user.id);
        state.listings.retain(|l| l.user_id != user.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Condition;
    use crate::checkout::PaymentMethod;
    use crate::price::Price;

    fn new_order(user: Option<&str>) -> NewOrder {
        NewOrder {
            user_id: user.map(UserId::new),
            items: vec![],
            total_price: Price::new(399),
            payment_method: PaymentMethod::Upi,
            delivery_address: None,
            contact_phone: None,
            contact_email: None,
            status: OrderStatus::Pending,
        }
    }

    #[tokio::test]
    async fn test_order_visibility() {
        let backend = MemoryBackend::new().signed_in(User::new("u1", None));
        backend.submit_order(&new_order(Some("u1"))).await.unwrap();
        backend.submit_order(&new_order(Some("u2"))).await.unwrap();
        backend.submit_order(&new_order(None)).await.unwrap();

        assert_eq!(backend.fetch_orders().await.unwrap().len(), 1);

        backend.set_admin(&UserId::new("u1"), true).unwrap();
        assert_eq!(backend.fetch_orders().await.unwrap().len(), 3);

        backend.sign_out().unwrap();
        assert!(backend.fetch_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_books_newest_first() {
        let backend = MemoryBackend::new();
        for title in ["First", "Second"] {
            backend
                .create_book(&NewBook {
                    title: title.to_string(),
                    author: "A".to_string(),
                    category: "Study".to_string(),
                    condition: Condition::New,
                    price: Price::new(1),
                    old_price: Price::new(2),
                    image_url: String::new(),
                    description: None,
                    created_by: None,
                })
                .await
                .unwrap();
        }
        let titles: Vec<_> = backend
            .fetch_books()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_outage() {
        let backend = MemoryBackend::new().with_outage("fetch_active_listings");
        let err = backend.fetch_active_listings().await.unwrap_err();
        assert!(err.message().contains("unavailable"));
        assert!(backend.fetch_books().await.is_ok());
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let backend = MemoryBackend::new().signed_in(User::new("u1", Some("a@b.c")));
        backend.submit_order(&new_order(Some("u1"))).await.unwrap();

        let json = serde_json::to_string(&backend.snapshot().unwrap()).unwrap();
        let restored = MemoryBackend::from_snapshot(serde_json::from_str(&json).unwrap());
        assert_eq!(restored.fetch_orders().await.unwrap().len(), 1);
        assert_eq!(
            restored.current_user().await.unwrap().map(|u| u.id),
            Some(UserId::new("u1"))
        );
    }
}
