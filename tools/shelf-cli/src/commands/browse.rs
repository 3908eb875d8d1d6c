//! Catalog browsing.

use anyhow::Result;
use shelf_commerce::catalog::CatalogEntry;

use super::BrowseArgs;
use crate::context::Context;
use crate::output::format_price;

const WIDTHS: [usize; 6] = [14, 36, 20, 22, 5, 8];

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog().await;
    let query = args.filters.query();

    let mut books = query.apply(catalog.entries());
    if let Some(limit) = args.limit {
        books.truncate(limit);
    }

    if ctx.output.is_json() {
        ctx.output.json(&books);
        return Ok(());
    }

    ctx.output.header(&format!(
        "{}: {} book(s), {}",
        query.category,
        books.len(),
        query.sort.display_name()
    ));

    if books.is_empty() {
        ctx.output.info("No books match your search.");
        return Ok(());
    }

    ctx.output.table_header(
        &["ID", "TITLE", "AUTHOR", "PRICE", "COND", "SOURCE"],
        &WIDTHS,
    );
    for entry in &books {
        print_entry(entry, ctx);
    }

    Ok(())
}

fn print_entry(entry: &CatalogEntry, ctx: &Context) {
    let book = &entry.book;
    ctx.output.table_row(
        &[
            book.id.as_str(),
            &book.title,
            &book.author,
            &format_price(book),
            book.condition.label(),
            entry.origin.as_str(),
        ],
        &WIDTHS,
    );
}
