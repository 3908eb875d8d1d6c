//! Cart management.

use anyhow::{bail, Result};
use dialoguer::Confirm;
use serde_json::{json, Value};
use shelf_commerce::cart::CartStore;
use shelf_commerce::ids::BookId;
use shelf_commerce::CommerceError;

use super::{CartArgs, CartCommand};
use crate::context::Context;

const WIDTHS: [usize; 4] = [14, 40, 5, 10];

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.cart();
    match args.command {
        Some(CartCommand::List) | None => list_cart(&cart, ctx),
        Some(CartCommand::Add { id }) => add_book(&mut cart, &id, ctx).await,
        Some(CartCommand::Remove { id }) => remove_book(&mut cart, &id, ctx),
        Some(CartCommand::Set { id, quantity }) => set_quantity(&mut cart, &id, quantity, ctx),
        Some(CartCommand::Clear { yes }) => clear_cart(&mut cart, yes, ctx),
    }
}

fn list_cart(cart: &CartStore, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&cart_json(cart));
        return Ok(());
    }

    ctx.output.header("Your Cart");
    if cart.is_empty() {
        ctx.output.info("Your cart is empty.");
        ctx.output.info("Run `shelf browse` to find something to read.");
        return Ok(());
    }

    ctx.output.table_header(&["ID", "TITLE", "QTY", "SUBTOTAL"], &WIDTHS);
    for item in cart.items() {
        let subtotal = item
            .line_total()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "overflow".to_string());
        ctx.output.table_row(
            &[
                item.id().as_str(),
                &item.book.title,
                &item.quantity.to_string(),
                &subtotal,
            ],
            &WIDTHS,
        );
    }
    ctx.output.line("");
    ctx.output.kv("Items", &cart.total_items().to_string());
    ctx.output.kv("Total", &cart.total_price().to_string());

    Ok(())
}

async fn add_book(cart: &mut CartStore, id: &str, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog().await;
    let id = BookId::new(id);
    let Some(entry) = catalog.find(&id) else {
        return Err(CommerceError::BookNotFound(id.to_string()).into());
    };

    cart.add(&entry.book);
    let quantity = cart.cart().get(&id).map(|i| i.quantity).unwrap_or(1);
    ctx.output.success(&format!(
        "Added \"{}\" to cart ({} in cart)",
        entry.book.title, quantity
    ));
    list_cart_summary(cart, ctx);
    Ok(())
}

fn remove_book(cart: &mut CartStore, id: &str, ctx: &Context) -> Result<()> {
    let id = BookId::new(id);
    let Some(item) = cart.cart().get(&id) else {
        bail!("Book '{}' is not in your cart", id);
    };
    let title = item.book.title.clone();

    cart.remove(&id);
    ctx.output.success(&format!("Removed \"{}\" from cart", title));
    list_cart_summary(cart, ctx);
    Ok(())
}

fn set_quantity(cart: &mut CartStore, id: &str, quantity: i64, ctx: &Context) -> Result<()> {
    let id = BookId::new(id);
    if cart.cart().get(&id).is_none() {
        bail!("Book '{}' is not in your cart", id);
    }

    cart.set_quantity(&id, quantity);
    if quantity <= 0 {
        ctx.output.success(&format!("Removed {} from cart", id));
    } else {
        ctx.output.success(&format!("Set quantity of {} to {}", id, quantity));
    }
    list_cart_summary(cart, ctx);
    Ok(())
}

fn clear_cart(cart: &mut CartStore, yes: bool, ctx: &Context) -> Result<()> {
    if cart.is_empty() {
        ctx.output.info("Your cart is already empty.");
        return Ok(());
    }

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} item(s) from your cart?", cart.total_items()))
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cancelled.");
            return Ok(());
        }
    }

    cart.clear();
    ctx.output.success("Cart cleared");
    list_cart_summary(cart, ctx);
    Ok(())
}

/// One-line totals after a mutation, or the full cart in JSON mode.
fn list_cart_summary(cart: &CartStore, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&cart_json(cart));
        return;
    }
    ctx.output.kv(
        "Cart",
        &format!("{} item(s), {}", cart.total_items(), cart.total_price()),
    );
}

fn cart_json(cart: &CartStore) -> Value {
    json!({
        "items": cart.items(),
        "total_items": cart.total_items(),
        "total_price": cart.total_price(),
    })
}
