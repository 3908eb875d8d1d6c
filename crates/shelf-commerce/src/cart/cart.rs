//! Cart and line item types.

use serde::{Deserialize, Serialize};

use crate::catalog::Book;
use crate::error::CommerceError;
use crate::ids::BookId;
use crate::price::Price;

/// A book in the cart with its quantity. Quantity is at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub book: Book,
    pub quantity: u32,
}

impl CartItem {
    pub fn id(&self) -> &BookId {
        &self.book.id
    }

    /// Price times quantity, `None` on overflow.
    pub fn line_total(&self) -> Option<Price> {
        self.book.price.checked_mul(self.quantity)
    }
}

/// A shopping cart: line items keyed by book id, in insertion order.
///
/// Serialized as a plain JSON array of items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Add one copy of `book`, merging with an existing line.
    pub fn add(&mut self, book: &Book) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.book.id == book.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return;
        }
        self.items.push(CartItem {
            book: book.clone(),
            quantity: 1,
        });
    }

    /// Remove the line for `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &BookId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.book.id != id);
        self.items.len() < len_before
    }

    /// Overwrite the quantity for `id`.
    ///
    /// A quantity of zero or less removes the line. Returns whether the cart
    /// changed.
    pub fn set_quantity(&mut self, id: &BookId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.items.iter_mut().find(|i| &i.book.id == id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the line for `id`.
    pub fn get(&self, id: &BookId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.book.id == id)
    }

    /// Sum of quantities.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of price times quantity, saturating on overflow.
    pub fn total_price(&self) -> Price {
        self.items
            .iter()
            .map(|i| i.book.price.saturating_mul(i.quantity))
            .sum()
    }

    /// Sum of price times quantity, failing on overflow.
    pub fn checked_total_price(&self) -> Result<Price, CommerceError> {
        self.items.iter().try_fold(Price::ZERO, |acc, item| {
            item.line_total()
                .and_then(|line| acc.checked_add(line))
                .ok_or(CommerceError::Overflow)
        })
    }

    /// Drop lines that break the quantity invariant, merging duplicate ids.
    pub(crate) fn normalize(&mut self) {
        let mut merged: Vec<CartItem> = Vec::with_capacity(self.items.len());
        for item in self.items.drain(..) {
            if item.quantity == 0 {
                continue;
            }
            match merged.iter_mut().find(|m| m.book.id == item.book.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity)
                }
                None => merged.push(item),
            }
        }
        self.items = merged;
    }
}
