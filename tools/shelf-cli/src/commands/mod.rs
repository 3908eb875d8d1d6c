//! CLI command implementations.

pub mod account;
pub mod admin;
pub mod browse;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod orders;
pub mod sections;
pub mod sell;

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use shelf_commerce::catalog::{Condition, ALL_BOOKS};
use shelf_commerce::checkout::OrderStatus;
use shelf_commerce::search::{BrowseQuery, ConditionFilter, SortOption};

/// Catalog filters shared by `browse` and `sections`.
#[derive(Args)]
pub struct FilterArgs {
    /// Text matched against title and author.
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Category name, or "New Books" / "Old Books".
    #[arg(long, default_value = ALL_BOOKS)]
    pub category: String,

    /// Condition: all, new or old.
    #[arg(long, default_value = "all")]
    pub condition: ConditionFilter,

    /// Sort order: price-low, price-high or name.
    #[arg(long, default_value = "price-low")]
    pub sort: SortOption,
}

impl FilterArgs {
    pub fn query(&self) -> BrowseQuery {
        BrowseQuery::new()
            .with_search(self.search.as_str())
            .with_category(self.category.as_str())
            .with_condition(self.condition)
            .with_sort(self.sort)
    }
}

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Show only the first N books.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the sections command.
#[derive(Args)]
pub struct SectionsArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// List every book in each section instead of a preview.
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart.
    List,
    /// Add one copy of a book.
    Add {
        /// Book ID.
        id: String,
    },
    /// Remove a book entirely.
    Remove {
        /// Book ID.
        id: String,
    },
    /// Set the quantity of a book. Zero or less removes it.
    Set {
        /// Book ID.
        id: String,
        /// New quantity.
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Payment method choice on the command line.
#[derive(Clone, Copy, ValueEnum)]
pub enum PaymentArg {
    Upi,
    Card,
    Cod,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Payment method.
    #[arg(short, long, value_enum)]
    pub method: PaymentArg,

    /// UPI ID (upi).
    #[arg(long, default_value = "")]
    pub upi_id: String,

    /// Card number (card).
    #[arg(long, default_value = "")]
    pub card_number: String,

    /// Cardholder name (card).
    #[arg(long, default_value = "")]
    pub card_holder: String,

    /// Expiry as MM/YY (card).
    #[arg(long, default_value = "")]
    pub card_expiry: String,

    /// Security code (card).
    #[arg(long, default_value = "")]
    pub card_cvv: String,

    /// Delivery address (cod).
    #[arg(long, default_value = "")]
    pub address: String,

    /// Contact phone (cod).
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    /// Show only the last N orders.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the sell command.
#[derive(Args)]
pub struct SellArgs {
    #[command(subcommand)]
    pub command: SellCommand,
}

#[derive(Subcommand)]
pub enum SellCommand {
    /// List a book for sale.
    Submit(ListingArgs),
    /// Show your listings.
    List,
    /// Take a listing off the storefront.
    Deactivate {
        /// Listing ID.
        id: String,
    },
    /// Put a listing back on the storefront.
    Activate {
        /// Listing ID.
        id: String,
    },
}

/// Sell form fields.
#[derive(Args)]
pub struct ListingArgs {
    /// Book title.
    #[arg(long, default_value = "")]
    pub title: String,

    /// Author.
    #[arg(long, default_value = "")]
    pub author: String,

    /// Category.
    #[arg(long, default_value = "")]
    pub category: String,

    /// Condition: new or old.
    #[arg(long, default_value = "")]
    pub condition: String,

    /// Asking price in whole rupees.
    #[arg(long, default_value = "")]
    pub price: String,

    /// Description.
    #[arg(long, default_value = "")]
    pub description: String,

    /// How buyers can reach you.
    #[arg(long, default_value = "")]
    pub contact: String,

    /// Cover image to upload.
    #[arg(long)]
    pub image: Option<PathBuf>,
}

/// Arguments for the admin command.
#[derive(Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// List admin-added books.
    Books,
    /// Add a book to the catalog.
    AddBook(BookArgs),
    /// Delete a book from the catalog.
    DeleteBook {
        /// Book ID.
        id: String,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// List all orders.
    Orders {
        /// Show only orders with this status.
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// Change an order's status.
    SetStatus {
        /// Order ID.
        id: String,
        /// pending, processing, shipped, delivered or cancelled.
        status: OrderStatus,
    },
    /// List registered users.
    Users,
}

/// Add-book form fields.
#[derive(Args)]
pub struct BookArgs {
    /// Book title.
    #[arg(long, default_value = "")]
    pub title: String,

    /// Author.
    #[arg(long, default_value = "")]
    pub author: String,

    /// Category.
    #[arg(long, default_value = "")]
    pub category: String,

    /// Condition: new or old.
    #[arg(long, default_value = "new")]
    pub condition: Condition,

    /// Price in whole rupees.
    #[arg(long, default_value = "")]
    pub price: String,

    /// Original price in whole rupees.
    #[arg(long, default_value = "")]
    pub old_price: String,

    /// Cover image URL.
    #[arg(long, default_value = "")]
    pub image_url: String,

    /// Description.
    #[arg(long, default_value = "")]
    pub description: String,
}

/// Arguments for the account command.
#[derive(Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommand,
}

#[derive(Subcommand)]
pub enum AccountCommand {
    /// Sign in.
    Login {
        /// Email address.
        email: String,
        /// Password (prompted when omitted).
        #[arg(long, env = "SHELF_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Grant the admin role (offline only).
        #[arg(long)]
        admin: bool,
    },
    /// Sign out.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Permanently delete your account.
    Delete {
        /// Confirmation text; must be DELETE.
        #[arg(long)]
        confirm: Option<String>,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Write a default shelf.toml to the current directory.
    Init {
        /// Overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate configuration.
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        filters: FilterArgs,
    }

    #[test]
    fn test_filter_defaults() {
        let h = Harness::parse_from(["shelf"]);
        assert_eq!(h.filters.query(), BrowseQuery::new());
    }

    #[test]
    fn test_filter_flags() {
        let h = Harness::parse_from([
            "shelf",
            "--search",
            "harry",
            "--category",
            "old books",
            "--sort",
            "name",
        ]);
        let expected = BrowseQuery::new()
            .with_search("harry")
            .with_category("Old Books")
            .with_sort(SortOption::Name);
        assert_eq!(h.filters.query(), expected);
    }

    #[test]
    fn test_bad_sort_rejected() {
        assert!(Harness::try_parse_from(["shelf", "--sort", "random"]).is_err());
    }
}
