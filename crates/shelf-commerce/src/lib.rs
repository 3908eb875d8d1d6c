//! Bookstore domain types and logic for Shelf.
//!
//! This crate holds everything the storefront does that is not transport:
//!
//! - **Catalog**: books, user listings, the seed catalog and aggregation
//! - **Search**: the browse filter/sort pipeline
//! - **Sections**: heuristic display buckets over a browse result
//! - **Cart**: the cart and its write-through store
//! - **Checkout**: payment validation, order placement and history
//! - **Admin** and **Account**: back office and account management
//!
//! Remote state is reached only through [`backend::BackendService`].
//!
//! # Example
//!
//! ```rust,ignore
//! use shelf_commerce::prelude::*;
//!
//! let backend = MemoryBackend::new();
//! let catalog = aggregate(&backend).await;
//!
//! let books = BrowseQuery::new()
//!     .with_search("harry")
//!     .with_sort(SortOption::PriceLow)
//!     .apply(catalog.entries());
//!
//! let mut cart = CartStore::open(Cache::open_memory(), DEFAULT_PROFILE);
//! cart.add(&books[0].book);
//! println!("Total: {}", cart.total_price());
//! ```

pub mod error;
pub mod ids;
pub mod price;

pub mod account;
pub mod admin;
pub mod backend;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod search;
pub mod sections;

pub use error::{CommerceError, FieldError, ValidationError};
pub use ids::*;
pub use price::Price;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, FieldError, ValidationError};
    pub use crate::ids::*;
    pub use crate::price::Price;

    pub use shelf_cache::Cache;

    // Catalog
    pub use crate::catalog::{
        aggregate, seed_books, Book, Catalog, CatalogEntry, Condition, ImageUpload, Listing,
        ListingForm, ListingStatus, Origin, STOREFRONT_CATEGORIES,
    };

    // Search and sections
    pub use crate::search::{BrowseQuery, CategoryFilter, ConditionFilter, SortOption};
    pub use crate::sections::{classify, visible_sections, Section, SectionKind, SectionRules};

    // Cart
    pub use crate::cart::{Cart, CartItem, CartStore, DEFAULT_PROFILE};

    // Checkout
    pub use crate::checkout::{
        my_orders, place_order, Order, OrderItem, OrderStatus, PaymentDetails, PaymentMethod,
    };

    // Account and back office
    pub use crate::account::{delete_account, User, UserSummary};
    pub use crate::admin::{AdminConsole, BookForm};
    pub use crate::backend::{BackendError, BackendService, MemoryBackend};
}
