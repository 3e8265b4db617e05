//! Core domain logic for the product catalog.
//! This crate is the single source of truth for product validation rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CatalogConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::codec::{parse_price_text, quantize_price};
pub use model::product::{Category, DataValidationError, Product, ProductId};
pub use repo::product_repo::{
    ProductFilter, ProductRepository, RepoError, RepoResult, SqliteProductRepository,
};
pub use service::product_service::{PriceQuery, ProductService};
