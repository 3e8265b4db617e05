//! Command-line front end for the product catalog.
//!
//! # Responsibility
//! - Parse commands and route them to `ProductService`.
//! - Print products in their serialized JSON shape.
//!
//! Configuration comes from `CATALOG_*` variables (a `.env` file is honored);
//! `--db` overrides the database path.

use anyhow::{anyhow, Context, Result};
use catalog_core::db::open_db;
use catalog_core::{
    init_logging, CatalogConfig, Category, Product, ProductId, ProductRepository, ProductService,
    SqliteProductRepository,
};
use clap::{ArgGroup, Parser, Subcommand};
use log::info;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catalog", version, about = "Manage products in a catalog database")]
struct Cli {
    /// SQLite database file; defaults to CATALOG_DB_PATH or ./catalog.sqlite3
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a product from a JSON object
    Create {
        /// e.g. '{"name":"Hat","description":"Red","price":12.5,"available":true,"category":"CLOTHS"}'
        json: String,
    },
    /// Show one product
    Get { id: ProductId },
    /// List every product
    List,
    /// Replace the fields of an existing product from a JSON object
    Update { id: ProductId, json: String },
    /// Delete a product
    Delete { id: ProductId },
    /// Find products by one field
    #[command(group(
        ArgGroup::new("filter")
            .required(true)
            .args(["name", "price", "available", "category"])
    ))]
    Find {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<String>,
        /// Defaults to true when given without a value
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        available: Option<bool>,
        /// One of UNKNOWN, CLOTHS, FOOD, HOUSEWARES, AUTOMOTIVE, TOOLS
        #[arg(long)]
        category: Option<String>,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = CatalogConfig::from_env()?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(config.log_level, log_dir)?;
    }

    let db_path = cli.db.unwrap_or(config.db_path);
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open catalog at {}", db_path.display()))?;
    let service = ProductService::new(SqliteProductRepository::try_new(&conn)?);

    info!("event=cli_command module=cli status=start command={}", command_name(&cli.command));
    run(&service, cli.command)
}

fn run<R: ProductRepository>(service: &ProductService<R>, command: Command) -> Result<()> {
    match command {
        Command::Create { json } => {
            let mut product = Product::from_value(&parse_json(&json)?)?;
            service.create(&mut product)?;
            print_product(&product)
        }
        Command::Get { id } => {
            let product = find_existing(service, id)?;
            print_product(&product)
        }
        Command::List => print_products(&service.all()?),
        Command::Update { id, json } => {
            let mut product = find_existing(service, id)?;
            product.deserialize(&parse_json(&json)?)?;
            service.update(&product)?;
            print_product(&product)
        }
        Command::Delete { id } => {
            let product = find_existing(service, id)?;
            service.delete(&product)?;
            println!("deleted {product}");
            Ok(())
        }
        Command::Find {
            name,
            price,
            available,
            category,
        } => {
            let products = if let Some(name) = name {
                service.find_by_name(&name)?
            } else if let Some(price) = price {
                service.find_by_price(price.as_str())?
            } else if let Some(category) = category {
                service.find_by_category(Some(category.parse::<Category>()?))?
            } else {
                service.find_by_availability(available)?
            };
            print_products(&products)
        }
    }
}

fn find_existing<R: ProductRepository>(
    service: &ProductService<R>,
    id: ProductId,
) -> Result<Product> {
    service
        .find(id)?
        .ok_or_else(|| anyhow!("product {id} not found"))
}

fn parse_json(text: &str) -> Result<Value> {
    serde_json::from_str(text).context("argument is not valid JSON")
}

fn print_product(product: &Product) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&product.serialize())?);
    Ok(())
}

fn print_products(products: &[Product]) -> Result<()> {
    let listed: Vec<Value> = products.iter().map(Product::serialize).collect();
    println!("{}", serde_json::to_string_pretty(&listed)?);
    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Create { .. } => "create",
        Command::Get { .. } => "get",
        Command::List => "list",
        Command::Update { .. } => "update",
        Command::Delete { .. } => "delete",
        Command::Find { .. } => "find",
    }
}
