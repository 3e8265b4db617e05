//! Product domain model.
//!
//! # Responsibility
//! - Define the canonical product record and its category enumeration.
//! - Validate record-level constraints before a record reaches storage.
//!
//! # Invariants
//! - `id` stays `None` until the record store assigns one.
//! - `price` is an exact decimal with at most two fractional digits.
//! - `category` is always one of the six closed variants.

use crate::model::codec::quantize_price;
use rust_decimal::Decimal;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned product identifier.
pub type ProductId = i64;

/// Maximum `name` length in characters.
pub const NAME_MAX_CHARS: usize = 100;
/// Maximum `description` length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 250;
/// Fractional digits kept for every price.
pub const PRICE_SCALE: u32 = 2;

/// Closed set of product categories.
///
/// Exchanged with callers by exact upper-case name; ordinals mirror the
/// storage enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Storage-level default for rows inserted without a category.
    #[default]
    Unknown = 0,
    Cloths = 1,
    Food = 2,
    Housewares = 3,
    Automotive = 4,
    Tools = 5,
}

impl Category {
    /// Every category in ordinal order.
    pub const ALL: [Category; 6] = [
        Category::Unknown,
        Category::Cloths,
        Category::Food,
        Category::Housewares,
        Category::Automotive,
        Category::Tools,
    ];

    /// Returns the exchange name (`UNKNOWN`, `CLOTHS`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Category::Unknown => "UNKNOWN",
            Category::Cloths => "CLOTHS",
            Category::Food => "FOOD",
            Category::Housewares => "HOUSEWARES",
            Category::Automotive => "AUTOMOTIVE",
            Category::Tools => "TOOLS",
        }
    }

    /// Resolves an exchange name. Matching is exact and case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.name() == name)
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = DataValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_name(value)
            .ok_or_else(|| DataValidationError::InvalidAttribute(value.to_string()))
    }
}

/// Single error kind for every product that cannot be accepted.
///
/// Raised while decoding external mappings, by record-level validation, and
/// by write paths that need a persisted identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataValidationError {
    /// Input was not a mapping at all (null, string, array, ...).
    BadData(String),
    /// A required key is absent.
    MissingField(&'static str),
    /// A typed field carried a value of the wrong JSON type.
    InvalidType {
        kind: &'static str,
        field: &'static str,
        found: &'static str,
    },
    /// Unrecognized enumeration token.
    InvalidAttribute(String),
    /// Price text or number that cannot become an exact decimal.
    InvalidPrice(String),
    /// A field violates a length or emptiness constraint.
    InvalidField {
        field: &'static str,
        reason: String,
    },
    /// Write path called on a record the store never assigned an id to.
    MissingId,
}

impl Display for DataValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadData(detail) => write!(
                f,
                "Invalid product: body of request contained bad or no data {detail}"
            ),
            Self::MissingField(field) => write!(f, "Invalid product: missing {field}"),
            Self::InvalidType { kind, field, found } => {
                write!(f, "Invalid type for {kind} [{field}]: {found}")
            }
            Self::InvalidAttribute(token) => write!(f, "Invalid attribute: {token}"),
            Self::InvalidPrice(detail) => write!(f, "Invalid price: {detail}"),
            Self::InvalidField { field, reason } => {
                write!(f, "Invalid product: {field} {reason}")
            }
            Self::MissingId => f.write_str("Update called with empty ID field"),
        }
    }
}

impl Error for DataValidationError {}

/// A sellable item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Product {
    /// `None` until persisted.
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    /// Exact cents; see [`quantize_price`].
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl Product {
    /// Creates an unpersisted product. `price` is quantized half-up to cents.
    ///
    /// A price too large to quantize is kept as given and reported by
    /// [`Product::validate`].
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        available: bool,
        category: Category,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            price: quantize_price(price).unwrap_or(price),
            available,
            category,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Checks constraints that typed fields alone cannot express.
    ///
    /// # Errors
    /// - `InvalidField` when `name` is blank or either text exceeds its limit.
    /// - `InvalidPrice` when `price` carries more than two significant
    ///   fractional digits or is too large to be written with two.
    pub fn validate(&self) -> Result<(), DataValidationError> {
        if self.name.trim().is_empty() {
            return Err(DataValidationError::InvalidField {
                field: "name",
                reason: "must not be empty".to_string(),
            });
        }
        check_length("name", &self.name, NAME_MAX_CHARS)?;
        check_length("description", &self.description, DESCRIPTION_MAX_CHARS)?;

        if self.price.normalize().scale() > PRICE_SCALE {
            return Err(DataValidationError::InvalidPrice(format!(
                "{} has more than {PRICE_SCALE} fractional digits",
                self.price
            )));
        }
        quantize_price(self.price)?;

        Ok(())
    }
}

impl Display for Product {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{id}]>", self.name),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}

fn check_length(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), DataValidationError> {
    let length = value.chars().count();
    if length > max_chars {
        return Err(DataValidationError::InvalidField {
            field,
            reason: format!("exceeds {max_chars} characters (got {length})"),
        });
    }
    Ok(())
}
