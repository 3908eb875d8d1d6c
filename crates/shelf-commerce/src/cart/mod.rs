//! Shopping cart module.
//!
//! [`Cart`] holds the line items; [`CartStore`] owns a cart and mirrors it
//! to durable local storage after every mutation.

mod cart;
mod store;

pub use cart::{Cart, CartItem};
pub use store::{CartStore, DEFAULT_PROFILE};
