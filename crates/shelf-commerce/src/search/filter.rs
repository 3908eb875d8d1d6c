//! Search filter types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{Book, Condition, ALL_BOOKS, NEW_BOOKS, OLD_BOOKS};

/// Category selection.
///
/// "New Books" and "Old Books" select by condition rather than by the
/// category field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    NewBooks,
    OldBooks,
    Named(String),
}

impl CategoryFilter {
    /// Parse a storefront category name, case-insensitively.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case(ALL_BOOKS) || name.eq_ignore_ascii_case("all")
        {
            CategoryFilter::All
        } else if name.eq_ignore_ascii_case(NEW_BOOKS) {
            CategoryFilter::NewBooks
        } else if name.eq_ignore_ascii_case(OLD_BOOKS) {
            CategoryFilter::OldBooks
        } else {
            CategoryFilter::Named(name.to_string())
        }
    }

    pub fn matches(&self, book: &Book) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::NewBooks => book.condition == Condition::New,
            CategoryFilter::OldBooks => book.condition == Condition::Old,
            CategoryFilter::Named(name) => book.category.trim().eq_ignore_ascii_case(name),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_BOOKS),
            CategoryFilter::NewBooks => f.write_str(NEW_BOOKS),
            CategoryFilter::OldBooks => f.write_str(OLD_BOOKS),
            CategoryFilter::Named(name) => f.write_str(name),
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(name: &str) -> Self {
        CategoryFilter::parse(name)
    }
}

/// Condition selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConditionFilter {
    #[default]
    All,
    New,
    Old,
}

impl ConditionFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionFilter::All => "all",
            ConditionFilter::New => "new",
            ConditionFilter::Old => "old",
        }
    }

    pub fn matches(&self, book: &Book) -> bool {
        match self {
            ConditionFilter::All => true,
            ConditionFilter::New => book.condition == Condition::New,
            ConditionFilter::Old => book.condition == Condition::Old,
        }
    }
}

impl FromStr for ConditionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ConditionFilter::All),
            "new" => Ok(ConditionFilter::New),
            "old" | "used" => Ok(ConditionFilter::Old),
            other => Err(format!("unknown condition filter: {other}")),
        }
    }
}

/// A single browse filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    /// Case-insensitive substring of title or author.
    Text(String),
    Category(CategoryFilter),
    Condition(ConditionFilter),
}

impl Filter {
    pub fn text(query: impl Into<String>) -> Self {
        Filter::Text(query.into())
    }

    pub fn matches(&self, book: &Book) -> bool {
        match self {
            Filter::Text(query) => {
                let needle = query.trim().to_lowercase();
                needle.is_empty()
                    || book.title.to_lowercase().contains(&needle)
                    || book.author.to_lowercase().contains(&needle)
            }
            Filter::Category(category) => category.matches(book),
            Filter::Condition(condition) => condition.matches(book),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_books;

    #[test]
    fn test_category_parse() {
        assert_eq!(CategoryFilter::parse("All Books"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("new books"), CategoryFilter::NewBooks);
        assert_eq!(CategoryFilter::parse("OLD BOOKS"), CategoryFilter::OldBooks);
        assert_eq!(
            CategoryFilter::parse(" Kids "),
            CategoryFilter::Named("Kids".to_string())
        );
    }

    #[test]
    fn test_category_is_case_insensitive() {
        let kids = seed_books()
            .iter()
            .filter(|b| CategoryFilter::parse("kids").matches(b))
            .count();
        assert_eq!(kids, 4);
    }

    #[test]
    fn test_text_matches_author() {
        let hits: Vec<_> = seed_books()
            .into_iter()
            .filter(|b| Filter::text("christie").matches(b))
            .map(|b| b.id.into_inner())
            .collect();
        assert_eq!(hits, vec!["4".to_string(), "10".to_string()]);
    }

    #[test]
    fn test_condition_filter_parse() {
        assert_eq!("used".parse::<ConditionFilter>().unwrap(), ConditionFilter::Old);
        assert!("mint".parse::<ConditionFilter>().is_err());
    }
}
