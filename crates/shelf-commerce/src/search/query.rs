//! Browse query builder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::Book;
use crate::search::{CategoryFilter, ConditionFilter, Filter};

/// Sort options for the browse list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortOption {
    /// Sort by price, low to high.
    #[default]
    #[serde(rename = "price-low")]
    PriceLow,
    /// Sort by price, high to low.
    #[serde(rename = "price-high")]
    PriceHigh,
    /// Sort by title A-Z.
    #[serde(rename = "name")]
    Name,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::PriceLow => "price-low",
            SortOption::PriceHigh => "price-high",
            SortOption::Name => "name",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::PriceLow => "Price: Low to High",
            SortOption::PriceHigh => "Price: High to Low",
            SortOption::Name => "Name: A-Z",
        }
    }

    /// Stable sort in place; equal keys keep their input order.
    pub fn sort<T: AsRef<Book>>(&self, items: &mut [T]) {
        match self {
            SortOption::PriceLow => items.sort_by_key(|b| b.as_ref().price),
            SortOption::PriceHigh => {
                items.sort_by(|a, b| b.as_ref().price.cmp(&a.as_ref().price))
            }
            SortOption::Name => items.sort_by_cached_key(|b| b.as_ref().title.to_lowercase()),
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price-low" => Ok(SortOption::PriceLow),
            "price-high" => Ok(SortOption::PriceHigh),
            "name" => Ok(SortOption::Name),
            other => Err(format!("unknown sort option: {other}")),
        }
    }
}

/// Everything the browse view filters and sorts by.
///
/// Applying a query is a pure function of the query and the input list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BrowseQuery {
    /// Text matched against title and author. Empty means no filtering.
    pub search: String,
    pub category: CategoryFilter,
    pub condition: ConditionFilter,
    pub sort: SortOption,
}

impl BrowseQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<CategoryFilter>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_condition(mut self, condition: ConditionFilter) -> Self {
        self.condition = condition;
        self
    }

    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// The active filters, skipping ones that match everything.
    pub fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();
        if !self.search.trim().is_empty() {
            filters.push(Filter::Text(self.search.clone()));
        }
        if self.category != CategoryFilter::All {
            filters.push(Filter::Category(self.category.clone()));
        }
        if self.condition != ConditionFilter::All {
            filters.push(Filter::Condition(self.condition));
        }
        filters
    }

    /// Filter then sort `items`, leaving the input untouched.
    pub fn apply<T: AsRef<Book> + Clone>(&self, items: &[T]) -> Vec<T> {
        let filters = self.filters();
        let mut out: Vec<T> = items
            .iter()
            .filter(|item| filters.iter().all(|f| f.matches(item.as_ref())))
            .cloned()
            .collect();
        self.sort.sort(&mut out);
        out
    }
}
