//! Order placement and history.

use crate::account::require_user;
use crate::backend::BackendService;
use crate::cart::CartStore;
use crate::checkout::{NewOrder, Order, OrderItem, OrderStatus, PaymentDetails};
use crate::error::CommerceError;

/// Place an order for everything in the cart.
///
/// The payment details are validated locally; only the method name (plus
/// address and phone for cash on delivery) is sent. Guests may check out,
/// in which case the order carries no user id or email. The cart is cleared
/// only once the backend accepted the order.
pub async fn place_order(
    cart: &mut CartStore,
    backend: &dyn BackendService,
    payment: &PaymentDetails,
) -> Result<Order, CommerceError> {
    if cart.is_empty() {
        return Err(CommerceError::EmptyCart);
    }
    payment.validate()?;
    let total_price = cart.cart().checked_total_price()?;

    let user = match backend.current_user().await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "could not read session, checking out as guest");
            None
        }
    };

    let (delivery_address, contact_phone) = payment.delivery_contact();
    let order = NewOrder {
        user_id: user.as_ref().map(|u| u.id.clone()),
        contact_email: user.and_then(|u| u.email),
        items: cart.items().iter().map(OrderItem::from).collect(),
        total_price,
        payment_method: payment.method(),
        delivery_address,
        contact_phone,
        status: OrderStatus::Pending,
    };

    let placed = backend.submit_order(&order).await?;
    tracing::info!(
        order_id = %placed.id,
        total = %placed.total_price,
        method = placed.payment_method.as_str(),
        "order placed"
    );
    cart.clear();
    Ok(placed)
}

/// The signed-in user's orders, newest first.
pub async fn my_orders(backend: &dyn BackendService) -> Result<Vec<Order>, CommerceError> {
    let user = require_user(backend).await?;
    let mut orders: Vec<Order> = backend
        .fetch_orders()
        .await?
        .into_iter()
        .filter(|o| o.user_id.as_ref() == Some(&user.id))
        .collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(orders)
}
