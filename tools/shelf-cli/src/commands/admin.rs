//! Back-office commands.

use anyhow::Result;
use dialoguer::Confirm;
use shelf_commerce::admin::{AdminConsole, BookForm};
use shelf_commerce::checkout::OrderStatus;
use shelf_commerce::ids::{BookId, OrderId};

use super::{AdminArgs, AdminCommand, BookArgs};
use crate::commands::orders::print_order;
use crate::context::Context;
use crate::output::{format_timestamp, order_badge};

const BOOK_WIDTHS: [usize; 5] = [14, 36, 20, 8, 8];
const USER_WIDTHS: [usize; 4] = [38, 30, 16, 6];

/// Run the admin command.
pub async fn run(args: AdminArgs, ctx: &Context) -> Result<()> {
    let console = AdminConsole::authorize(ctx.service()).await?;
    ctx.output.debug(&format!("Admin: {}", console.admin().id));

    match args.command {
        AdminCommand::Books => list_books(&console, ctx).await,
        AdminCommand::AddBook(book) => add_book(&console, book, ctx).await,
        AdminCommand::DeleteBook { id, yes } => delete_book(&console, &id, yes, ctx).await,
        AdminCommand::Orders { status } => list_orders(&console, status, ctx).await,
        AdminCommand::SetStatus { id, status } => set_status(&console, &id, status, ctx).await,
        AdminCommand::Users => list_users(&console, ctx).await,
    }
}

async fn list_books(console: &AdminConsole<'_>, ctx: &Context) -> Result<()> {
    let books = console.books().await?;

    if ctx.output.is_json() {
        ctx.output.json(&books);
        return Ok(());
    }

    ctx.output.header(&format!("Books ({})", books.len()));
    if books.is_empty() {
        ctx.output.info("No books added yet. Run `shelf admin add-book` to add one.");
        return Ok(());
    }

    ctx.output
        .table_header(&["ID", "TITLE", "AUTHOR", "PRICE", "COND"], &BOOK_WIDTHS);
    for book in &books {
        ctx.output.table_row(
            &[
                book.id.as_str(),
                &book.title,
                &book.author,
                &book.price.to_string(),
                book.condition.label(),
            ],
            &BOOK_WIDTHS,
        );
    }
    Ok(())
}

async fn add_book(console: &AdminConsole<'_>, args: BookArgs, ctx: &Context) -> Result<()> {
    let form = BookForm {
        title: args.title,
        author: args.author,
        category: args.category,
        condition: args.condition,
        price: args.price,
        old_price: args.old_price,
        image_url: args.image_url,
        description: args.description,
    };

    let book = console.add_book(&form).await?;

    if ctx.output.is_json() {
        ctx.output.json(&book);
        return Ok(());
    }
    ctx.output
        .success(&format!("Added \"{}\" by {}", book.title, book.author));
    ctx.output.kv("Book", book.id.as_str());
    Ok(())
}

async fn delete_book(
    console: &AdminConsole<'_>,
    id: &str,
    yes: bool,
    ctx: &Context,
) -> Result<()> {
    let id = BookId::new(id);

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete book {}? This cannot be undone.", id))
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cancelled.");
            return Ok(());
        }
    }

    console.delete_book(&id).await?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "deleted": id }));
        return Ok(());
    }
    ctx.output.success(&format!("Deleted book {}", id));
    Ok(())
}

async fn list_orders(
    console: &AdminConsole<'_>,
    status: Option<OrderStatus>,
    ctx: &Context,
) -> Result<()> {
    let mut orders = console.orders().await?;
    if let Some(status) = status {
        orders.retain(|o| o.status == status);
    }

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }

    ctx.output.header(&format!("Orders ({})", orders.len()));
    if orders.is_empty() {
        ctx.output.info("No orders found.");
        return Ok(());
    }

    for order in &orders {
        print_order(order, ctx);
        let customer = order
            .contact_email
            .as_deref()
            .or(order.user_id.as_ref().map(|u| u.as_str()))
            .unwrap_or("guest");
        ctx.output.kv("Customer", customer);
        if let Some(phone) = &order.contact_phone {
            ctx.output.kv("Phone", phone);
        }
    }
    Ok(())
}

async fn set_status(
    console: &AdminConsole<'_>,
    id: &str,
    status: OrderStatus,
    ctx: &Context,
) -> Result<()> {
    let order = console
        .update_order_status(&OrderId::new(id), status)
        .await?;

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }
    ctx.output.success(&format!(
        "Order {} is now {}",
        order.id,
        order_badge(order.status)
    ));
    Ok(())
}

async fn list_users(console: &AdminConsole<'_>, ctx: &Context) -> Result<()> {
    let users = console.users().await?;

    if ctx.output.is_json() {
        ctx.output.json(&users);
        return Ok(());
    }

    ctx.output.header(&format!("Users ({})", users.len()));
    ctx.output
        .table_header(&["ID", "EMAIL", "JOINED", "ADMIN"], &USER_WIDTHS);
    for user in &users {
        ctx.output.table_row(
            &[
                user.id.as_str(),
                user.email.as_deref().unwrap_or("-"),
                &format_timestamp(&user.created_at),
                if user.is_admin { "yes" } else { "" },
            ],
            &USER_WIDTHS,
        );
    }
    Ok(())
}
