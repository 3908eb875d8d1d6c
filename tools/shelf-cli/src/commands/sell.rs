//! Selling your own books.

use anyhow::{Context as _, Result};
use shelf_commerce::catalog::{
    my_listings, set_listing_status, submit_listing, ImageUpload, ListingForm, ListingStatus,
};
use shelf_commerce::ids::BookId;

use super::{ListingArgs, SellArgs, SellCommand};
use crate::context::Context;
use crate::output::{format_timestamp, status_badge};

const WIDTHS: [usize; 5] = [14, 36, 10, 10, 16];

/// Run the sell command.
pub async fn run(args: SellArgs, ctx: &Context) -> Result<()> {
    match args.command {
        SellCommand::Submit(listing) => submit(listing, ctx).await,
        SellCommand::List => list(ctx).await,
        SellCommand::Deactivate { id } => change_status(&id, ListingStatus::Inactive, ctx).await,
        SellCommand::Activate { id } => change_status(&id, ListingStatus::Active, ctx).await,
    }
}

async fn submit(args: ListingArgs, ctx: &Context) -> Result<()> {
    let image = match &args.image {
        Some(path) => {
            let path = ctx.resolve_path(&path.to_string_lossy());
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read image: {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "cover".to_string());
            ctx.output.debug(&format!("Image: {} ({} bytes)", file_name, bytes.len()));
            Some(ImageUpload::new(file_name, bytes))
        }
        None => None,
    };

    let form = ListingForm {
        title: args.title,
        author: args.author,
        category: args.category,
        condition: args.condition,
        price: args.price,
        description: args.description,
        contact: args.contact,
        image,
    };

    let spinner = ctx.output.spinner("Submitting listing...");
    let submitted = submit_listing(ctx.service(), &form).await;
    spinner.finish_and_clear();
    let listing = submitted?;

    if ctx.output.is_json() {
        ctx.output.json(&listing);
        return Ok(());
    }

    ctx.output.success(&format!("Listed \"{}\" for {}", listing.book.title, listing.book.price));
    ctx.output.kv("Listing", listing.book.id.as_str());
    ctx.output.kv("Image", &listing.book.image);
    Ok(())
}

async fn list(ctx: &Context) -> Result<()> {
    let listings = my_listings(ctx.service()).await?;

    if ctx.output.is_json() {
        ctx.output.json(&listings);
        return Ok(());
    }

    ctx.output.header("My Listings");
    if listings.is_empty() {
        ctx.output.info("You have not listed any books yet.");
        ctx.output.info("Run `shelf sell submit` to list one.");
        return Ok(());
    }

    ctx.output
        .table_header(&["ID", "TITLE", "PRICE", "STATUS", "LISTED"], &WIDTHS);
    for listing in &listings {
        ctx.output.table_row(
            &[
                listing.book.id.as_str(),
                &listing.book.title,
                &listing.book.price.to_string(),
                &status_badge(listing.status.as_str()),
                &format_timestamp(&listing.created_at),
            ],
            &WIDTHS,
        );
    }

    Ok(())
}

async fn change_status(id: &str, status: ListingStatus, ctx: &Context) -> Result<()> {
    let id = BookId::new(id);
    set_listing_status(ctx.service(), &id, status).await?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "id": id, "status": status }));
        return Ok(());
    }

    match status {
        ListingStatus::Active => ctx.output.success(&format!("Listing {} is live again", id)),
        ListingStatus::Inactive => ctx.output.success(&format!("Listing {} deactivated", id)),
    }
    Ok(())
}
