//! Book record and condition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::{BookId, UserId};
use crate::price::Price;

/// Image shown when a book or order item has none.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Physical condition of a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    #[default]
    New,
    Old,
}

impl Condition {
    /// Wire value ("new" / "old").
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::Old => "old",
        }
    }

    /// Label shown next to a book.
    pub fn label(&self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::Old => "Used",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Condition::New),
            "old" | "used" => Ok(Condition::Old),
            other => Err(format!("unknown condition: {other}")),
        }
    }
}

/// A book as the storefront sees it.
///
/// Seed books, admin-added books and user listings all normalize to this
/// shape. Serialized with camelCase keys, which is also the persisted cart
/// format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
    pub price: Price,
    pub old_price: Price,
    pub image: String,
    pub condition: Condition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Book {
    /// Rounded percentage saved against the old price.
    pub fn discount_percent(&self) -> i64 {
        self.price.discount_percent(self.old_price)
    }

    /// Whether a discount badge should be shown.
    pub fn has_discount(&self) -> bool {
        self.discount_percent() > 0
    }

    /// Absolute saving against the old price.
    pub fn reduction(&self) -> i64 {
        self.price.reduction_from(self.old_price)
    }

    pub fn is_used(&self) -> bool {
        self.condition == Condition::Old
    }
}

impl AsRef<Book> for Book {
    fn as_ref(&self) -> &Book {
        self
    }
}

/// A book about to be added to the backend's books table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub category: String,
    pub condition: Condition,
    pub price: Price,
    pub old_price: Price,
    pub image_url: String,
    pub description: Option<String>,
    pub created_by: Option<UserId>,
}

impl NewBook {
    /// Materialize as a [`Book`] once the backend has assigned an id.
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            category: self.category,
            price: self.price,
            old_price: self.old_price,
            image: self.image_url,
            condition: self.condition,
            description: self.description,
        }
    }
}
