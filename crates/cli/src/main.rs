//! Hekto CLI - cart, catalog and shipping quotes from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart stored in ./.hekto
//! hekto cart show
//!
//! # Add a line item by hand
//! hekto cart add prod-1 --title "Comfy Chair" --price 49.99 --quantity 2
//!
//! # Add a catalog product to the cart
//! hekto products add prod-1
//!
//! # Quote shipping
//! hekto shipment rates --first-name Ayesha --last-name Rahman \
//!     --street "12 Lake Road" --city Dhaka --postal-code 1207
//! ```
//!
//! # Commands
//!
//! - `cart` - Inspect and edit the file-backed cart
//! - `products` - Query the catalog
//! - `shipment` - Look up shipping rates

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hekto_core::{ProductId, ProductTag};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "hekto")]
#[command(author, version, about = "Hekto storefront CLI")]
struct Cli {
    /// Directory holding the persisted cart
    #[arg(long, global = true, env = "HEKTO_DATA_DIR", default_value = ".hekto")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Query the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Look up shipping rates
    Shipment {
        #[command(subcommand)]
        action: ShipmentAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and subtotal
    Show,
    /// Add a line item
    Add {
        /// Product ID
        id: ProductId,

        /// Display title
        #[arg(long, default_value = "")]
        title: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Increase a line's quantity by one
    Increment { id: ProductId },
    /// Decrease a line's quantity by one, removing it at zero
    Decrement { id: ProductId },
    /// Remove a line
    Delete { id: ProductId },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List every product
    List,
    /// Show one product
    Show { id: ProductId },
    /// Add a product to the cart
    Add {
        /// Product ID
        id: ProductId,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// List one "latest products" tab (`new-arrival`, `best-seller`, `trending`, `featured`)
    Latest { tag: ProductTag },
    /// One product per category
    Categories,
}

#[derive(Subcommand)]
enum ShipmentAction {
    /// Quote rates for an address
    Rates {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        street: String,
        #[arg(long)]
        apartment: Option<String>,
        #[arg(long)]
        city: String,
        #[arg(long, default_value = "Bangladesh")]
        country: String,
        #[arg(long)]
        postal_code: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = cli.data_dir;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&data_dir).await?,
            CartAction::Add {
                id,
                title,
                price,
                quantity,
            } => commands::cart::add(&data_dir, id, title, price, quantity).await?,
            CartAction::Increment { id } => commands::cart::increment(&data_dir, &id).await?,
            CartAction::Decrement { id } => commands::cart::decrement(&data_dir, &id).await?,
            CartAction::Delete { id } => commands::cart::delete(&data_dir, &id).await?,
            CartAction::Clear => commands::cart::clear(&data_dir).await?,
        },
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list().await?,
            ProductsAction::Show { id } => commands::products::show(&id).await?,
            ProductsAction::Add { id, quantity } => {
                commands::products::add(&data_dir, &id, quantity).await?;
            }
            ProductsAction::Latest { tag } => commands::products::latest(tag).await?,
            ProductsAction::Categories => commands::products::categories().await?,
        },
        Commands::Shipment { action } => match action {
            ShipmentAction::Rates {
                first_name,
                last_name,
                street,
                apartment,
                city,
                country,
                postal_code,
            } => {
                let address = hekto_core::ShippingAddress {
                    first_name,
                    last_name,
                    street,
                    apartment,
                    city,
                    country,
                    postal_code,
                };
                commands::shipment::rates(&address).await?;
            }
        },
    }
    Ok(())
}
