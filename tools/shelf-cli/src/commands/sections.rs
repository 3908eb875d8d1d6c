//! Storefront sections.

use anyhow::Result;
use console::style;
use serde_json::json;
use shelf_commerce::sections::{visible_sections, SectionVariant};

use super::SectionsArgs;
use crate::context::Context;
use crate::output::format_price;

/// Run the sections command.
pub async fn run(args: SectionsArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog().await;
    let books = args.filters.query().apply(catalog.entries());
    let sections = visible_sections(&books, &ctx.config.sections);

    if ctx.output.is_json() {
        let value: Vec<_> = sections
            .iter()
            .map(|s| {
                let info = s.info();
                json!({
                    "kind": s.kind,
                    "title": info.title,
                    "icon": info.icon,
                    "variant": info.variant,
                    "books": s.entries,
                })
            })
            .collect();
        ctx.output.json(&value);
        return Ok(());
    }

    if sections.is_empty() {
        ctx.output.info("No books match your search.");
        return Ok(());
    }

    for section in &sections {
        let info = section.info();
        let title = match info.variant {
            SectionVariant::Featured => style(info.title).bold().yellow().to_string(),
            SectionVariant::New => style(info.title).bold().green().to_string(),
            SectionVariant::Default => style(info.title).bold().to_string(),
        };
        ctx.output.line(&format!("\n{} {}", info.icon.glyph(), title));

        let shown = if args.all {
            &section.entries[..]
        } else {
            section.preview()
        };
        for entry in shown {
            let book = &entry.book;
            ctx.output.list_item(&format!(
                "{} by {}  {}  {}",
                book.title,
                book.author,
                format_price(book),
                style(book.id.as_str()).dim()
            ));
        }
        if !args.all {
            if let Some(note) = section.overflow_note() {
                ctx.output.line(&format!("  {}", style(note).dim()));
            }
        }
    }

    Ok(())
}
