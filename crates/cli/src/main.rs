//! Corner Shop CLI - manage the catalog, cart, wishlist and checkout from
//! the shell.
//!
//! # Usage
//!
//! ```bash
//! # Add a product
//! shop-cli product add -n "Enamel Mug" -p 12.50 -c Kitchen --image mug.jpg
//!
//! # Put it in the cart and look at the cart
//! shop-cli cart add 1718000000000
//! shop-cli cart show
//!
//! # Fill the checkout form and place the order
//! shop-cli checkout set email ada@example.com
//! shop-cli checkout place
//! ```
//!
//! # Commands
//!
//! - `product` - Add, edit, remove and list catalog products
//! - `category` - Manage the category list
//! - `cart` - Add, remove and adjust cart lines
//! - `wishlist` - Toggle saved products and move them to the cart
//! - `checkout` - Fill the checkout form and place an order
//!
//! State lives in `SHOP_STORAGE_DIR` (default `.corner-shop`), one JSON
//! file per key.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use corner_shop_core::{CheckoutField, ProductId};
use corner_shop_storefront::{AppError, LogFormat, Shop, ShopConfig};

mod commands;

use commands::catalog::{ProductFields, ProductUpdate};

const DEFAULT_LOG_FILTER: &str = "corner_shop_storefront=info,corner_shop_cli=info";

#[derive(Parser)]
#[command(name = "shop-cli")]
#[command(author, version, about = "Corner Shop CLI tools")]
struct Cli {
    /// Storage directory (overrides `SHOP_STORAGE_DIR`)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage catalog products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Fill the checkout form and place orders
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Add a product to the catalog
    Add {
        /// Product name
        #[arg(short, long)]
        name: String,

        /// Unit price, e.g. `12.50`
        #[arg(short, long)]
        price: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Category name
        #[arg(short, long, default_value = "")]
        category: String,

        /// Image URL (repeatable)
        #[arg(long = "image")]
        images: Vec<String>,
    },
    /// Edit a product; omitted fields are left unchanged
    Update {
        /// Product id
        id: ProductId,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        price: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        /// Replace the images (repeatable)
        #[arg(long = "image")]
        images: Vec<String>,
    },
    /// Remove a product
    Remove {
        /// Product id
        id: ProductId,
    },
    /// List products
    List {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Remove every product
    Clear,
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Add a category
    Add { name: String },
    /// Remove a category (products keep their category string)
    Remove { name: String },
    /// List categories
    List,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add one of a catalog product
    Add { id: ProductId },
    /// Remove a line
    Remove { id: ProductId },
    /// Add one to a line
    Inc { id: ProductId },
    /// Take one from a line, removing it at zero
    Dec { id: ProductId },
    /// Empty the cart
    Clear,
    /// Show the cart priced from the live catalog
    Show,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Save or unsave a product
    Toggle { id: ProductId },
    /// Move a saved product into the cart
    Move { id: ProductId },
    /// Empty the wishlist
    Clear,
    /// Show saved products
    Show,
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Set a form field (`name`, `email`, `address`, `city`, `zip`,
    /// `cardNumber`, `cardName`, `expiry`, `cvv`)
    Set { field: CheckoutField, value: String },
    /// Place an order for the current cart
    Place,
}

fn main() {
    let cli = Cli::parse();
    let config = ShopConfig::from_env();

    init_tracing(config.as_ref().map_or(LogFormat::default(), |c| c.log_format));

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(config) => run(cli, config),
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        if e.downcast_ref::<AppError>().is_some_and(AppError::is_user_error) {
            tracing::warn!("{e}");
        } else {
            tracing::error!("Command failed: {e}");
        }
        std::process::exit(1);
    }
}

/// Initialize tracing with `EnvFilter`, writing to stderr so stdout only
/// carries command output.
fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            (format == LogFormat::Pretty)
                .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
        .with((format == LogFormat::Json).then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .init();
}

fn run(cli: Cli, mut config: ShopConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }
    tracing::debug!(storage_dir = %config.storage_dir.display(), "Opening shop");
    let mut shop = Shop::from_config(&config)?;

    let output = match cli.command {
        Commands::Product { action } => match action {
            ProductAction::Add {
                name,
                price,
                description,
                category,
                images,
            } => commands::catalog::add_product(
                &mut shop,
                ProductFields {
                    name,
                    price,
                    description,
                    category,
                    images,
                },
            )?,
            ProductAction::Update {
                id,
                name,
                price,
                description,
                category,
                images,
            } => commands::catalog::update_product(
                &mut shop,
                id,
                ProductUpdate {
                    name,
                    price,
                    description,
                    category,
                    images,
                },
            )?,
            ProductAction::Remove { id } => commands::catalog::remove_product(&mut shop, id)?,
            ProductAction::List { category } => {
                commands::catalog::list_products(&shop, category.as_deref())
            }
            ProductAction::Clear => commands::catalog::clear_products(&mut shop)?,
        },
        Commands::Category { action } => match action {
            CategoryAction::Add { name } => commands::catalog::add_category(&mut shop, &name)?,
            CategoryAction::Remove { name } => {
                commands::catalog::remove_category(&mut shop, &name)?
            }
            CategoryAction::List => commands::catalog::list_categories(&shop),
        },
        Commands::Cart { action } => match action {
            CartAction::Add { id } => commands::cart::add(&mut shop, id)?,
            CartAction::Remove { id } => commands::cart::remove(&mut shop, id)?,
            CartAction::Inc { id } => commands::cart::increment(&mut shop, id)?,
            CartAction::Dec { id } => commands::cart::decrement(&mut shop, id)?,
            CartAction::Clear => commands::cart::clear(&mut shop)?,
            CartAction::Show => commands::cart::show(&shop),
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Toggle { id } => commands::wishlist::toggle(&mut shop, id)?,
            WishlistAction::Move { id } => commands::wishlist::move_to_cart(&mut shop, id)?,
            WishlistAction::Clear => commands::wishlist::clear(&mut shop)?,
            WishlistAction::Show => commands::wishlist::show(&shop),
        },
        Commands::Checkout { action } => match action {
            CheckoutAction::Set { field, value } => {
                commands::checkout::set_field(&mut shop, field, value)?
            }
            CheckoutAction::Place => commands::checkout::place(&mut shop)?,
        },
    };

    commands::print(&output);
    Ok(())
}
