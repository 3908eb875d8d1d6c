//! Checkout.

use anyhow::Result;
use dialoguer::Confirm;
use shelf_commerce::checkout::{place_order, PaymentDetails};
use shelf_commerce::CommerceError;

use super::{CheckoutArgs, PaymentArg};
use crate::context::Context;
use crate::output::order_badge;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.cart();
    if cart.is_empty() {
        return Err(CommerceError::EmptyCart.into());
    }

    let payment = payment_details(&args);
    payment.validate().map_err(CommerceError::from)?;

    if !args.yes && !ctx.output.is_json() {
        ctx.output.header("Order Summary");
        for item in cart.items() {
            ctx.output
                .list_item(&format!("{} x{}", item.book.title, item.quantity));
        }
        ctx.output.kv("Total", &cart.total_price().to_string());
        ctx.output.kv("Payment", payment.method().display_name());

        let confirmed = Confirm::new()
            .with_prompt(format!("Place order for {}?", cart.total_price()))
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.info("Checkout cancelled. Your cart was kept.");
            return Ok(());
        }
    }

    let spinner = ctx.output.spinner("Placing order...");
    let placed = place_order(&mut cart, ctx.service(), &payment).await;
    spinner.finish_and_clear();
    let order = placed?;

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }

    ctx.output.success("Order placed successfully!");
    ctx.output.kv("Order", order.id.as_str());
    ctx.output.kv("Total", &order.total_price.to_string());
    ctx.output.kv("Status", &order_badge(order.status));
    if order.user_id.is_none() {
        ctx.output
            .info("Checked out as a guest. Sign in to see your orders with `shelf orders`.");
    }

    Ok(())
}

fn payment_details(args: &CheckoutArgs) -> PaymentDetails {
    match args.method {
        PaymentArg::Upi => PaymentDetails::Upi {
            upi_id: args.upi_id.clone(),
        },
        PaymentArg::Card => PaymentDetails::Card {
            number: args.card_number.clone(),
            holder: args.card_holder.clone(),
            expiry: args.card_expiry.clone(),
            cvv: args.card_cvv.clone(),
        },
        PaymentArg::Cod => PaymentDetails::CashOnDelivery {
            address: args.address.clone(),
            phone: args.phone.clone(),
        },
    }
}
