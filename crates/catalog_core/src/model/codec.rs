//! Plain-mapping codec for `Product`.
//!
//! # Responsibility
//! - Render a product as a JSON object for callers.
//! - Decode untrusted JSON into a validated product.
//!
//! # Invariants
//! - Decoding is all-or-nothing: the target record is untouched on error.
//! - Float prices are converted from their exact binary value, never from a
//!   shortest-repr string, then quantized half-up.
//! - `available` only accepts JSON booleans.

use crate::model::product::{Category, DataValidationError, Product, PRICE_SCALE};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{json, Map, Value};
use std::str::FromStr;

/// Rounds to cents with ties away from zero and pins the scale to two digits.
///
/// # Errors
/// `InvalidPrice` when the value has too many integer digits to carry two
/// fractional digits within the 96-bit mantissa.
pub fn quantize_price(value: Decimal) -> Result<Decimal, DataValidationError> {
    let mut quantized =
        value.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    // `rescale` keeps a smaller scale instead of failing when digits run out.
    quantized.rescale(PRICE_SCALE);
    if quantized.scale() != PRICE_SCALE {
        return Err(DataValidationError::InvalidPrice(format!(
            "{value} is too large to keep {PRICE_SCALE} fractional digits"
        )));
    }
    Ok(quantized)
}

/// Parses caller-supplied price text.
///
/// Surrounding spaces and double quotes are stripped first, so `" \"12.50\" "`
/// and `12.50` resolve to the same value. Scientific notation is accepted.
/// The result is not quantized.
pub fn parse_price_text(text: &str) -> Result<Decimal, DataValidationError> {
    let trimmed = text.trim_matches(|c: char| c == ' ' || c == '"');
    if trimmed.is_empty() {
        return Err(DataValidationError::InvalidPrice("empty price text".to_string()));
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|err| {
            DataValidationError::InvalidPrice(format!("`{trimmed}` is not a decimal number: {err}"))
        })
}

impl Product {
    /// Serializes into a JSON object with keys
    /// `id, name, description, price, available, category`.
    pub fn serialize(&self) -> Value {
        let price = self
            .price
            .round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
            .to_f64();
        json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "price": price,
            "available": self.available,
            "category": self.category,
        })
    }

    /// Decodes `data` into this record, keeping the current `id`.
    ///
    /// # Errors
    /// Returns `DataValidationError` on the first failing field, in the order
    /// `name`, `description`, `price`, `available`, `category`, and then for
    /// record-level constraints (see [`Product::validate`]).
    pub fn deserialize(&mut self, data: &Value) -> Result<&mut Self, DataValidationError> {
        let fields = data
            .as_object()
            .ok_or_else(|| DataValidationError::BadData(describe_non_mapping(data)))?;

        let decoded = Product {
            id: self.id,
            name: required_text(fields, "name")?,
            description: required_text(fields, "description")?,
            price: decode_price(required(fields, "price")?)?,
            available: decode_available(required(fields, "available")?)?,
            category: decode_category(required(fields, "category")?)?,
        };
        decoded.validate()?;

        *self = decoded;
        Ok(self)
    }

    /// Decodes a fresh, unpersisted product from `data`.
    pub fn from_value(data: &Value) -> Result<Self, DataValidationError> {
        let mut product = Product::default();
        product.deserialize(data)?;
        Ok(product)
    }
}

fn required<'a>(
    fields: &'a Map<String, Value>,
    key: &'static str,
) -> Result<&'a Value, DataValidationError> {
    fields.get(key).ok_or(DataValidationError::MissingField(key))
}

fn required_text(
    fields: &Map<String, Value>,
    key: &'static str,
) -> Result<String, DataValidationError> {
    match required(fields, key)? {
        Value::String(text) => Ok(text.clone()),
        other => Err(DataValidationError::InvalidType {
            kind: "string",
            field: key,
            found: json_type_name(other),
        }),
    }
}

fn decode_price(value: &Value) -> Result<Decimal, DataValidationError> {
    let exact = match value {
        Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                Decimal::from(integer)
            } else if let Some(integer) = number.as_u64() {
                Decimal::from(integer)
            } else {
                let float = number.as_f64().unwrap_or(f64::NAN);
                Decimal::from_f64_retain(float).ok_or_else(|| {
                    DataValidationError::InvalidPrice(format!("{float:e} is out of decimal range"))
                })?
            }
        }
        Value::String(text) => parse_price_text(text)?,
        other => {
            return Err(DataValidationError::InvalidType {
                kind: "decimal",
                field: "price",
                found: json_type_name(other),
            })
        }
    };

    quantize_price(exact)
}

fn decode_available(value: &Value) -> Result<bool, DataValidationError> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        other => Err(DataValidationError::InvalidType {
            kind: "boolean",
            field: "available",
            found: json_type_name(other),
        }),
    }
}

fn decode_category(value: &Value) -> Result<Category, DataValidationError> {
    match value {
        Value::String(token) => token.parse(),
        other => Err(DataValidationError::InvalidAttribute(other.to_string())),
    }
}

fn describe_non_mapping(data: &Value) -> String {
    match data {
        Value::Null => "(no data)".to_string(),
        other => format!("(expected an object, got {})", json_type_name(other)),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_price_text, quantize_price};
    use crate::model::product::DataValidationError;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn quantize_rounds_ties_away_from_zero() {
        assert_eq!(quantize_price(dec("0.125")).unwrap(), dec("0.13"));
        assert_eq!(quantize_price(dec("0.135")).unwrap(), dec("0.14"));
        assert_eq!(quantize_price(dec("-0.125")).unwrap(), dec("-0.13"));
        assert_eq!(quantize_price(dec("12.344")).unwrap(), dec("12.34"));
    }

    #[test]
    fn quantize_pins_scale_to_cents() {
        assert_eq!(quantize_price(dec("7")).unwrap().to_string(), "7.00");
        assert_eq!(quantize_price(dec("12.5")).unwrap().to_string(), "12.50");
    }

    #[test]
    fn quantize_rejects_values_without_room_for_cents() {
        let err = quantize_price(dec("1000000000000000000000000000")).unwrap_err();
        assert!(matches!(err, DataValidationError::InvalidPrice(_)));
        assert!(quantize_price(Decimal::MAX).is_err());
    }

    #[test]
    fn parse_price_text_strips_quotes_and_spaces() {
        assert_eq!(parse_price_text(" \"12.50\" ").unwrap(), dec("12.50"));
        assert_eq!(parse_price_text("1.5e1").unwrap(), dec("15"));
    }

    #[test]
    fn parse_price_text_rejects_garbage() {
        let err = parse_price_text("twelve").unwrap_err();
        assert!(matches!(err, DataValidationError::InvalidPrice(_)));
        assert!(parse_price_text(" \"\" ").is_err());
    }
}
