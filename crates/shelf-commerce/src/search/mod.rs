//! Search module.
//!
//! The browse pipeline: text search, category and condition filters, then a
//! stable sort.

mod filter;
mod query;

pub use filter::{CategoryFilter, ConditionFilter, Filter};
pub use query::{BrowseQuery, SortOption};
