//! Shelf CLI - Command line storefront for the Shelf bookstore.
//!
//! Commands:
//! - `shelf browse` - Search, filter and sort the catalog
//! - `shelf sections` - Show the themed storefront sections
//! - `shelf cart` - Manage the local cart
//! - `shelf checkout` - Place an order for the cart
//! - `shelf orders` - Show your order history
//! - `shelf sell` - List your own books for sale
//! - `shelf admin` - Back office for admins
//! - `shelf account` - Sign in, sign out, delete your account
//! - `shelf config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shelf_observability::LogLevel;

use commands::{
    AccountArgs, AdminArgs, BrowseArgs, CartArgs, CheckoutArgs, ConfigArgs, OrdersArgs,
    SectionsArgs, SellArgs,
};

/// Shelf CLI - Browse, buy and sell books
#[derive(Parser)]
#[command(name = "shelf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, filter and sort the catalog
    Browse(BrowseArgs),

    /// Show the storefront sections
    Sections(SectionsArgs),

    /// Manage the cart
    Cart(CartArgs),

    /// Place an order for everything in the cart
    Checkout(CheckoutArgs),

    /// Show your order history
    Orders(OrdersArgs),

    /// Sell your own books
    Sell(SellArgs),

    /// Back office (admins only)
    Admin(AdminArgs),

    /// Sign in, sign out or delete your account
    Account(AccountArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let mut log_settings = ctx.config.logging.clone();
    if cli.verbose && log_settings.level > LogLevel::Debug {
        log_settings.level = LogLevel::Debug;
    }
    if let Err(e) = shelf_observability::init(&log_settings) {
        ctx.output.warn(&format!("Logging disabled: {}", e));
    }

    let result = match cli.command {
        Commands::Browse(args) => commands::browse::run(args, &ctx).await,
        Commands::Sections(args) => commands::sections::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Sell(args) => commands::sell::run(args, &ctx).await,
        Commands::Admin(args) => commands::admin::run(args, &ctx).await,
        Commands::Account(args) => commands::account::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    // Offline state is saved even when the command failed partway.
    if let Err(e) = ctx.persist() {
        ctx.output.warn(&format!("Could not save offline state: {:#}", e));
    }

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
