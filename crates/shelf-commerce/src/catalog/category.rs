//! Storefront categories.

/// Pseudo-category that applies no filtering.
pub const ALL_BOOKS: &str = "All Books";

/// Pseudo-category selecting books in new condition.
pub const NEW_BOOKS: &str = "New Books";

/// Pseudo-category selecting used books.
pub const OLD_BOOKS: &str = "Old Books";

/// Categories offered by the storefront, in display order.
pub const STOREFRONT_CATEGORIES: [&str; 9] = [
    ALL_BOOKS, "Kids", "Fiction", "Mystery", "Romance", "Horror", "Study", NEW_BOOKS, OLD_BOOKS,
];
