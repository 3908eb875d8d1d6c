//! Table rows as the hosted service stores them.
//!
//! Column names are snake_case and images live in `image_url`; these types
//! translate between that and the storefront types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelf_commerce::account::UserSummary;
use shelf_commerce::catalog::{Book, Condition, Listing, ListingStatus, NewListing, PLACEHOLDER_IMAGE};
use shelf_commerce::checkout::{Order, OrderItem, OrderStatus, PaymentMethod};
use shelf_commerce::ids::{BookId, OrderId, UserId};
use shelf_commerce::Price;

/// A row of the `books` table.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BookRow {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    pub category: String,
    #[serde(default)]
    pub condition: Option<String>,
    pub price: i64,
    #[serde(default)]
    pub old_price: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: BookId::new(row.id),
            title: row.title,
            author: row.author.unwrap_or_default(),
            category: row.category,
            price: Price::new(row.price),
            old_price: Price::new(row.old_price.unwrap_or(row.price)),
            image: image_or_placeholder(row.image_url),
            condition: parse_condition(row.condition.as_deref()),
            description: row.description,
        }
    }
}

/// A row of the `user_listings` table.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListingRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    pub category: String,
    #[serde(default)]
    pub condition: Option<String>,
    pub price: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub contact: String,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<ListingRow> for Listing {
    fn from(row: ListingRow) -> Self {
        Listing {
            book: Book {
                id: BookId::new(row.id),
                title: row.title,
                author: row.author.unwrap_or_default(),
                category: row.category,
                price: Price::new(row.price),
                old_price: Price::new(row.price),
                image: image_or_placeholder(row.image_url),
                condition: parse_condition(row.condition.as_deref()),
                description: row.description,
            },
            user_id: UserId::new(row.user_id),
            status: row.status,
            contact: row.contact,
            created_at: row.created_at,
        }
    }
}

/// Insert payload for `user_listings`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct NewListingRow<'a> {
    pub user_id: &'a UserId,
    pub title: &'a str,
    pub author: Option<&'a str>,
    pub category: &'a str,
    pub condition: Condition,
    pub price: Price,
    pub image_url: &'a str,
    pub description: Option<&'a str>,
    pub contact: &'a str,
    pub status: ListingStatus,
}

impl<'a> From<&'a NewListing> for NewListingRow<'a> {
    fn from(listing: &'a NewListing) -> Self {
        NewListingRow {
            user_id: &listing.user_id,
            title: &listing.title,
            author: (!listing.author.is_empty()).then_some(listing.author.as_str()),
            category: &listing.category,
            condition: listing.condition,
            price: listing.price,
            image_url: &listing.image,
            description: listing.description.as_deref(),
            contact: &listing.contact,
            status: listing.status,
        }
    }
}

/// A row of the `orders` table.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OrderRow {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub items: serde_json::Value,
    pub total_price: i64,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: OrderId::new(row.id),
            user_id: row.user_id.map(UserId::new),
            items: parse_items(row.items),
            total_price: Price::new(row.total_price),
            payment_method: row.payment_method,
            delivery_address: row.delivery_address,
            contact_phone: row.contact_phone,
            contact_email: row.contact_email,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// A row of the `user_roles` table.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RoleRow {
    pub role: String,
}

/// A row returned by the admin user-list function.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AdminUserRow {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

impl From<AdminUserRow> for UserSummary {
    fn from(row: AdminUserRow) -> Self {
        let from_roles = row
            .roles
            .as_ref()
            .is_some_and(|roles| roles.iter().any(|r| r == "admin"));
        UserSummary {
            id: UserId::new(row.id),
            email: row.email,
            created_at: row.created_at,
            is_admin: row.is_admin.unwrap_or(from_roles),
        }
    }
}

fn image_or_placeholder(url: Option<String>) -> String {
    url.filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
}

fn parse_condition(raw: Option<&str>) -> Condition {
    raw.and_then(|c| c.parse().ok()).unwrap_or_default()
}

/// Order items are stored as free-form JSON. Anything that is not an array
/// yields no items, and elements that are not objects are skipped.
fn parse_items(value: serde_json::Value) -> Vec<OrderItem> {
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter(|item| item.is_object())
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_book_row_defaults() {
        let row: BookRow = serde_json::from_value(json!({
            "id": "7f3c",
            "title": "It",
            "category": "Horror",
            "price": 599,
            "image_url": "",
            "created_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        let book = Book::from(row);
        assert_eq!(book.old_price, Price::new(599));
        assert_eq!(book.image, PLACEHOLDER_IMAGE);
        assert_eq!(book.condition, Condition::New);
        assert_eq!(book.author, "");
    }

    #[test]
    fn test_order_row_items_lenient() {
        let row: OrderRow = serde_json::from_value(json!({
            "id": "o1",
            "user_id": null,
            "items": [{"title": "Dune", "price": 300, "quantity": 2}, "junk", {}],
            "total_price": 600,
            "payment_method": "cod",
            "status": "shipped",
            "created_at": "2025-02-01T10:00:00Z"
        }))
        .unwrap();
        let order = Order::from(row);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].line_total(), Price::new(600));
        assert_eq!(order.items[1].quantity, 1);
        assert_eq!(order.status, OrderStatus::Shipped);
    }

    #[test]
    fn test_order_row_non_array_items() {
        let row: OrderRow = serde_json::from_value(json!({
            "id": "o2",
            "items": {"oops": true},
            "total_price": 0,
            "payment_method": "upi",
            "status": "pending",
            "created_at": "2025-02-01T10:00:00Z"
        }))
        .unwrap();
        assert!(Order::from(row).items.is_empty());
    }

    #[test]
    fn test_new_listing_row_columns() {
        let listing = NewListing {
            user_id: UserId::new("u1"),
            title: "Carrie".to_string(),
            author: String::new(),
            category: "Horror".to_string(),
            condition: Condition::Old,
            price: Price::new(90),
            image: "https://cdn.example/carrie.png".to_string(),
            description: None,
            contact: "9000000000".to_string(),
            status: ListingStatus::Active,
        };
        let value = serde_json::to_value(NewListingRow::from(&listing)).unwrap();
        assert_eq!(value["image_url"], "https://cdn.example/carrie.png");
        assert_eq!(value["author"], serde_json::Value::Null);
        assert_eq!(value["condition"], "old");
        assert_eq!(value["status"], "active");
    }

    #[test]
    fn test_admin_user_row_roles() {
        let row: AdminUserRow = serde_json::from_value(json!({
            "id": "u9",
            "email": "root@shelf.test",
            "created_at": "2024-12-31T23:59:59Z",
            "roles": ["admin"]
        }))
        .unwrap();
        assert!(UserSummary::from(row).is_admin);
    }
}
