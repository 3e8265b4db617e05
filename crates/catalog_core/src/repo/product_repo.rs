//! Product repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/update/delete and equality lookups over `products`.
//! - Keep SQL and column encodings inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Product::validate()` before SQL mutations.
//! - Prices are stored as canonical two-digit decimal text, never as REAL.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - List results are ordered by `id ASC` (insertion order).

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::product::{Category, DataValidationError, Product, ProductId, PRICE_SCALE};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const PRODUCTS_TABLE: &str = "products";
const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "name",
    "description",
    "price",
    "available",
    "category",
    "updated_at",
];

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    price,
    available,
    category
FROM products";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for product persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(DataValidationError),
    Db(DbError),
    NotFound(ProductId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "product not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted product data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DataValidationError> for RepoError {
    fn from(value: DataValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Equality filter for product lookups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProductFilter {
    #[default]
    All,
    Name(String),
    Price(Decimal),
    Available(bool),
    Category(Category),
}

/// Record store interface for product CRUD operations.
pub trait ProductRepository {
    /// Inserts `product` ignoring its `id`; returns the store-assigned id.
    fn create_product(&self, product: &Product) -> RepoResult<ProductId>;
    /// Overwrites the row identified by `product.id`.
    fn update_product(&self, product: &Product) -> RepoResult<()>;
    /// Removes a row; returns whether one existed.
    fn delete_product(&self, id: ProductId) -> RepoResult<bool>;
    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>>;
    fn list_products(&self, filter: &ProductFilter) -> RepoResult<Vec<Product>>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not carry the product columns.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create_product(&self, product: &Product) -> RepoResult<ProductId> {
        product.validate()?;
        let price = price_to_db(product.price)?;

        self.conn.execute(
            "INSERT INTO products (
                name,
                description,
                price,
                available,
                category
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                product.name.as_str(),
                product.description.as_str(),
                price,
                bool_to_int(product.available),
                product.category.name(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_product(&self, product: &Product) -> RepoResult<()> {
        let id = product.id.ok_or(DataValidationError::MissingId)?;
        product.validate()?;
        let price = price_to_db(product.price)?;

        let changed = self.conn.execute(
            "UPDATE products
             SET
                name = ?1,
                description = ?2,
                price = ?3,
                available = ?4,
                category = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?6;",
            params![
                product.name.as_str(),
                product.description.as_str(),
                price,
                bool_to_int(product.available),
                product.category.name(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_product(&self, id: ProductId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }

        Ok(None)
    }

    fn list_products(&self, filter: &ProductFilter) -> RepoResult<Vec<Product>> {
        let (clause, bind_value) = match filter {
            ProductFilter::All => ("", None),
            ProductFilter::Name(name) => (" WHERE name = ?1", Some(Value::Text(name.clone()))),
            ProductFilter::Price(price) => match canonical_price(*price) {
                Some(text) => (" WHERE price = ?1", Some(Value::Text(text))),
                // Sub-cent or oversized values can never equal a stored price.
                None => return Ok(Vec::new()),
            },
            ProductFilter::Available(available) => (
                " WHERE available = ?1",
                Some(Value::Integer(bool_to_int(*available))),
            ),
            ProductFilter::Category(category) => (
                " WHERE category = ?1",
                Some(Value::Text(category.name().to_string())),
            ),
        };

        let sql = format!("{PRODUCT_SELECT_SQL}{clause} ORDER BY id ASC;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_value))?;
        let mut products = Vec::new();

        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }
}

fn ensure_schema_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [PRODUCTS_TABLE],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable(PRODUCTS_TABLE));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(products);")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<HashSet<_>, _>>()?;

    if let Some(column) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !columns.contains(**column))
    {
        return Err(RepoError::MissingRequiredColumn {
            table: PRODUCTS_TABLE,
            column: *column,
        });
    }

    Ok(())
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let id: ProductId = row.get("id")?;

    let price_text: String = row.get("price")?;
    let price = Decimal::from_str(&price_text)
        .ok()
        .filter(|price| canonical_price(*price).as_deref() == Some(price_text.as_str()))
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid price `{price_text}` in products.price (id={id})"
            ))
        })?;

    let available = match row.get::<_, i64>("available")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid available value `{other}` in products.available (id={id})"
            )));
        }
    };

    let category_text: String = row.get("category")?;
    let category = Category::from_name(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in products.category (id={id})"
        ))
    })?;

    let product = Product {
        id: Some(id),
        name: row.get("name")?,
        description: row.get("description")?,
        price,
        available,
        category,
    };
    product.validate()?;
    Ok(product)
}

/// Two-digit text form used for storage and equality, or `None` when the
/// value has significant sub-cent digits or no room for two of them.
fn canonical_price(price: Decimal) -> Option<String> {
    let mut canonical = price.normalize();
    if canonical.scale() > PRICE_SCALE {
        return None;
    }
    canonical.rescale(PRICE_SCALE);
    if canonical.scale() != PRICE_SCALE {
        return None;
    }
    Some(canonical.to_string())
}

fn price_to_db(price: Decimal) -> RepoResult<String> {
    canonical_price(price).ok_or_else(|| {
        RepoError::Validation(DataValidationError::InvalidPrice(format!(
            "{price} cannot be stored with exactly {PRICE_SCALE} fractional digits"
        )))
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
