//! Catalog aggregation.
//!
//! The storefront catalog is the seed books, then admin-added books, then
//! active user listings. The two remote sources are fetched concurrently and
//! a failed source contributes nothing.

use futures::future;
use serde::{Deserialize, Serialize};

use crate::backend::BackendService;
use crate::catalog::{seed_books, Book};
use crate::ids::BookId;

/// Where a catalog entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Seed,
    Admin,
    Listing,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Seed => "seed",
            Origin::Admin => "admin",
            Origin::Listing => "listing",
        }
    }
}

/// A book tagged with its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub book: Book,
    pub origin: Origin,
}

impl CatalogEntry {
    pub fn new(book: Book, origin: Origin) -> Self {
        Self { book, origin }
    }

    pub fn is_seed(&self) -> bool {
        self.origin == Origin::Seed
    }
}

impl AsRef<Book> for CatalogEntry {
    fn as_ref(&self) -> &Book {
        &self.book
    }
}

/// The merged storefront catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from already-tagged entries.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// A catalog holding only the seed books.
    pub fn seed_only() -> Self {
        Self::from_entries(
            seed_books()
                .into_iter()
                .map(|b| CatalogEntry::new(b, Origin::Seed))
                .collect(),
        )
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry with the given id.
    pub fn find(&self, id: &BookId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| &e.book.id == id)
    }

    /// Entries from one source, in catalog order.
    pub fn from_origin(&self, origin: Origin) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(move |e| e.origin == origin)
    }
}

/// Merge seed, admin and listing books into one catalog.
///
/// Never fails: a source that errors is logged and skipped.
pub async fn aggregate(backend: &dyn BackendService) -> Catalog {
    let (books, listings) =
        future::join(backend.fetch_books(), backend.fetch_active_listings()).await;

    let mut catalog = Catalog::seed_only();

    match books {
        Ok(books) => {
            tracing::debug!(count = books.len(), "fetched admin books");
            catalog
                .entries
                .extend(books.into_iter().map(|b| CatalogEntry::new(b, Origin::Admin)));
        }
        Err(e) => tracing::warn!(error = %e, "failed to fetch admin books"),
    }

    match listings {
        Ok(listings) => {
            tracing::debug!(count = listings.len(), "fetched active listings");
            catalog.entries.extend(
                listings
                    .into_iter()
                    .filter(|l| l.is_active())
                    .map(|l| CatalogEntry::new(l.book, Origin::Listing)),
            );
        }
        Err(e) => tracing::warn!(error = %e, "failed to fetch user listings"),
    }

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::catalog::{Condition, ListingStatus, NewBook, NewListing};
    use crate::ids::UserId;
    use crate::price::Price;

    fn new_book(title: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Ruskin Bond".to_string(),
            category: "Kids".to_string(),
            condition: Condition::New,
            price: Price::new(199),
            old_price: Price::new(299),
            image_url: "https://img.example/rusty.jpg".to_string(),
            description: None,
            created_by: None,
        }
    }

    #[tokio::test]
    async fn test_seed_only_when_backend_empty() {
        let catalog = aggregate(&MemoryBackend::new()).await;
        assert_eq!(catalog.len(), 10);
        assert!(catalog.entries().iter().all(CatalogEntry::is_seed));
    }

    #[tokio::test]
    async fn test_sources_concatenate_in_order() {
        let backend = MemoryBackend::new();
        backend.create_book(&new_book("The Blue Umbrella")).await.unwrap();

        let catalog = aggregate(&backend).await;
        assert_eq!(catalog.len(), 11);
        let last = &catalog.entries()[10];
        assert_eq!(last.origin, Origin::Admin);
        assert_eq!(last.book.title, "The Blue Umbrella");
    }

    #[tokio::test]
    async fn test_failed_source_is_skipped() {
        let backend = MemoryBackend::new().with_outage("fetch_books");
        backend.create_book(&new_book("Lost")).await.unwrap();

        let catalog = aggregate(&backend).await;
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.from_origin(Origin::Admin).count(), 0);
    }

    #[tokio::test]
    async fn test_failed_listings_keep_admin_books() {
        let backend = MemoryBackend::new().with_outage("fetch_active_listings");
        backend.create_book(&new_book("The Blue Umbrella")).await.unwrap();
        backend
            .create_listing(&NewListing {
                user_id: UserId::new("u1"),
                title: "Hidden".to_string(),
                author: "Someone".to_string(),
                category: "Fiction".to_string(),
                condition: Condition::Old,
                price: Price::new(120),
                image: String::new(),
                description: None,
                contact: "u1@example.com".to_string(),
                status: ListingStatus::Active,
            })
            .await
            .unwrap();

        let catalog = aggregate(&backend).await;
        assert_eq!(catalog.len(), 11);
        assert_eq!(catalog.from_origin(Origin::Admin).count(), 1);
        assert_eq!(catalog.from_origin(Origin::Listing).count(), 0);
    }

    #[test]
    fn test_find() {
        let catalog = Catalog::seed_only();
        assert_eq!(
            catalog.find(&BookId::new("4")).map(|e| e.book.title.as_str()),
            Some("Mystery Thriller")
        );
        assert!(catalog.find(&BookId::new("404")).is_none());
    }
}
