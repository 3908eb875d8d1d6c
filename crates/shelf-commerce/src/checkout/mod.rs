//! Checkout module.
//!
//! Contains order types, payment validation, order placement and history.

mod flow;
mod order;
mod payment;

pub use flow::{my_orders, place_order};
pub use order::{NewOrder, Order, OrderItem, OrderStatus};
pub use payment::{PaymentDetails, PaymentMethod};
