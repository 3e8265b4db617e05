//! Product use-case service.
//!
//! # Responsibility
//! - Provide create/update/delete/find entry points over any record store.
//! - Provide the name/price/availability/category query helpers.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - `update` and `delete` require a store-assigned id.
//! - Lookups with no matches return an empty list, not an error.
//! - Log events carry ids and counts only, never product text.

use crate::model::codec::parse_price_text;
use crate::model::product::{Category, DataValidationError, Product, ProductId};
use crate::repo::product_repo::{ProductFilter, ProductRepository, RepoResult};
use log::{info, warn};
use rust_decimal::Decimal;

/// Price argument accepted by [`ProductService::find_by_price`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceQuery<'a> {
    Exact(Decimal),
    /// Text such as `12.50` or `" 12.50"`; quotes and spaces are trimmed.
    Text(&'a str),
}

impl From<Decimal> for PriceQuery<'_> {
    fn from(value: Decimal) -> Self {
        Self::Exact(value)
    }
}

impl<'a> From<&'a str> for PriceQuery<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

/// Use-case service wrapper for product operations.
pub struct ProductService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists `product` as a new row and stores the assigned id on it.
    ///
    /// Any id already present on `product` is discarded first.
    pub fn create(&self, product: &mut Product) -> RepoResult<ProductId> {
        product.id = None;
        let id = logged("product_create", self.repo.create_product(product))?;
        product.id = Some(id);
        info!("event=product_create module=service status=ok id={id}");
        Ok(id)
    }

    /// Saves changes to an already persisted product.
    ///
    /// # Errors
    /// - `Validation(MissingId)` when `product.id` is unset.
    /// - `NotFound` when no row carries that id.
    pub fn update(&self, product: &Product) -> RepoResult<()> {
        let id = logged("product_update", require_id(product))?;
        logged("product_update", self.repo.update_product(product))?;
        info!("event=product_update module=service status=ok id={id}");
        Ok(())
    }

    /// Deletes a persisted product. Deleting an already removed row succeeds.
    pub fn delete(&self, product: &Product) -> RepoResult<()> {
        let id = logged("product_delete", require_id(product))?;
        let removed = logged("product_delete", self.repo.delete_product(id))?;
        info!("event=product_delete module=service status=ok id={id} removed={removed}");
        Ok(())
    }

    /// Looks up one product; `None` when the id is unknown.
    pub fn find(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let found = logged("product_find", self.repo.get_product(id))?;
        info!(
            "event=product_find module=service status=ok id={id} found={}",
            found.is_some()
        );
        Ok(found)
    }

    /// Returns every product in insertion order.
    pub fn all(&self) -> RepoResult<Vec<Product>> {
        self.query("all", ProductFilter::All)
    }

    pub fn find_by_name(&self, name: &str) -> RepoResult<Vec<Product>> {
        self.query("name", ProductFilter::Name(name.to_string()))
    }

    /// Finds products whose price equals `price` exactly.
    ///
    /// # Errors
    /// - `Validation(InvalidPrice)` when text input is not a decimal.
    pub fn find_by_price<'a>(&self, price: impl Into<PriceQuery<'a>>) -> RepoResult<Vec<Product>> {
        let value = match price.into() {
            PriceQuery::Exact(value) => value,
            PriceQuery::Text(text) => {
                logged("product_query", parse_price_text(text).map_err(Into::into))?
            }
        };
        self.query("price", ProductFilter::Price(value))
    }

    /// Finds products by availability; `None` means `true`.
    pub fn find_by_availability(&self, available: Option<bool>) -> RepoResult<Vec<Product>> {
        self.query("available", ProductFilter::Available(available.unwrap_or(true)))
    }

    /// Finds products by category; `None` means `Category::Unknown`.
    pub fn find_by_category(&self, category: Option<Category>) -> RepoResult<Vec<Product>> {
        self.query("category", ProductFilter::Category(category.unwrap_or_default()))
    }

    fn query(&self, by: &'static str, filter: ProductFilter) -> RepoResult<Vec<Product>> {
        let products = logged("product_query", self.repo.list_products(&filter))?;
        info!(
            "event=product_query module=service status=ok by={by} count={}",
            products.len()
        );
        Ok(products)
    }
}

fn require_id(product: &Product) -> RepoResult<ProductId> {
    product
        .id
        .ok_or_else(|| DataValidationError::MissingId.into())
}

fn logged<T>(event: &'static str, result: RepoResult<T>) -> RepoResult<T> {
    if let Err(err) = &result {
        warn!("event={event} module=service status=error error={err}");
    }
    result
}
