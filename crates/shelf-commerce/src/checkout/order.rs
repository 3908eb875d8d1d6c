//! Order types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::catalog::PLACEHOLDER_IMAGE;
use crate::checkout::PaymentMethod;
use crate::error::CommerceError;
use crate::ids::{BookId, OrderId, UserId};
use crate::price::Price;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order being prepared.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether an order in this status may move to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        !self.is_terminal() || *self == next
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown order status: {s}"))
    }
}

/// A line of an order, snapshotted from the cart at checkout.
///
/// Deserialization is lenient: stored orders may predate a field, so
/// missing values fall back to empty text, price 0, quantity 1 and the
/// placeholder image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawOrderItem")]
pub struct OrderItem {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub price: Price,
    pub quantity: u32,
    pub image: String,
}

impl OrderItem {
    /// Price times quantity.
    pub fn line_total(&self) -> Price {
        self.price.saturating_mul(self.quantity)
    }
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.book.id.clone(),
            title: item.book.title.clone(),
            author: item.book.author.clone(),
            price: item.book.price,
            quantity: item.quantity,
            image: item.book.image.clone(),
        }
    }
}

#[derive(Deserialize)]
struct RawOrderItem {
    #[serde(default)]
    id: Option<BookId>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    price: Option<i64>,
    #[serde(default)]
    quantity: Option<u32>,
    #[serde(default)]
    image: Option<String>,
}

impl From<RawOrderItem> for OrderItem {
    fn from(raw: RawOrderItem) -> Self {
        Self {
            id: raw.id.unwrap_or_else(|| BookId::new("")),
            title: raw.title.unwrap_or_default(),
            author: raw.author.unwrap_or_default(),
            price: Price::new(raw.price.unwrap_or(0)),
            quantity: raw.quantity.unwrap_or(1),
            image: raw
                .image
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        }
    }
}

/// An order about to be inserted.
///
/// Card details are never part of this: only the method name travels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: Option<UserId>,
    pub items: Vec<OrderItem>,
    pub total_price: Price,
    pub payment_method: PaymentMethod,
    pub delivery_address: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub status: OrderStatus,
}

impl NewOrder {
    /// Materialize as an [`Order`] once the backend has assigned an id.
    pub fn into_order(self, id: OrderId, created_at: DateTime<Utc>) -> Order {
        Order {
            id,
            user_id: self.user_id,
            items: self.items,
            total_price: self.total_price,
            payment_method: self.payment_method,
            delivery_address: self.delivery_address,
            contact_phone: self.contact_phone,
            contact_email: self.contact_email,
            status: self.status,
            created_at,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_price: Price,
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

impl Order {
    /// Total number of copies ordered.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Move to `next`, refusing to leave a terminal status.
    pub fn set_status(&mut self, next: OrderStatus) -> Result<(), CommerceError> {
        if !self.status.can_transition_to(next) {
            return Err(CommerceError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}
