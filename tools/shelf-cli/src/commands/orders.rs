//! Order history.

use anyhow::Result;
use shelf_commerce::checkout::{my_orders, Order};

use super::OrdersArgs;
use crate::context::Context;
use crate::output::{format_timestamp, order_badge};

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading orders...");
    let orders = my_orders(ctx.service()).await;
    spinner.finish_and_clear();

    let mut orders = orders?;
    if let Some(limit) = args.limit {
        orders.truncate(limit);
    }

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }

    ctx.output.header("My Orders");
    if orders.is_empty() {
        ctx.output.info("You have not placed any orders yet.");
        return Ok(());
    }

    for order in &orders {
        print_order(order, ctx);
    }

    Ok(())
}

/// Print one order with its lines.
pub fn print_order(order: &Order, ctx: &Context) {
    ctx.output.line("");
    ctx.output.line(&format!(
        "  {}  {}  {}",
        order.id,
        format_timestamp(&order.created_at),
        order_badge(order.status)
    ));
    for item in &order.items {
        ctx.output.list_item(&format!(
            "{} x{}  {}",
            item.title,
            item.quantity,
            item.line_total()
        ));
    }
    ctx.output.kv(
        "Total",
        &format!(
            "{} ({} item(s), {})",
            order.total_price,
            order.item_count(),
            order.payment_method.display_name()
        ),
    );
    if let Some(address) = &order.delivery_address {
        ctx.output.kv("Deliver to", address);
    }
}
