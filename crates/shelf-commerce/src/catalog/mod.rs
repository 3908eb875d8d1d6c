//! Book catalog module.
//!
//! Contains book and listing types, the storefront categories, the static
//! seed catalog and the aggregator that merges seed, admin and listing books.

mod aggregate;
mod book;
mod category;
mod listing;
mod seed;

pub use aggregate::{aggregate, Catalog, CatalogEntry, Origin};
pub use book::{Book, Condition, NewBook, PLACEHOLDER_IMAGE};
pub use category::{STOREFRONT_CATEGORIES, ALL_BOOKS, NEW_BOOKS, OLD_BOOKS};
pub use listing::{
    my_listings, set_listing_status, submit_listing, ImageUpload, Listing, ListingForm,
    ListingStatus, NewListing,
};
pub use seed::seed_books;

pub(crate) use listing::parse_price;
