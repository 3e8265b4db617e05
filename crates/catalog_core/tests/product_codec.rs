mod common;

use catalog_core::{Category, DataValidationError, Product};
use common::{product_json, sample_product};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;

fn dec(text: &str) -> Decimal {
    Decimal::from_str(text).unwrap()
}

#[test]
fn serialize_a_product() {
    let mut product = sample_product(3);
    product.id = Some(7);

    let data = product.serialize();
    let fields = data.as_object().unwrap();
    assert_eq!(fields.len(), 6);
    assert_eq!(data["id"], 7);
    assert_eq!(data["name"], product.name.as_str());
    assert_eq!(data["description"], product.description.as_str());
    assert_eq!(data["price"].as_f64(), Some(8.75));
    assert_eq!(data["available"], product.available);
    assert_eq!(data["category"], product.category.name());
}

#[test]
fn serialize_unpersisted_product_has_null_id() {
    let data = sample_product(0).serialize();
    assert_eq!(data["id"], Value::Null);
}

#[test]
fn deserialize_then_serialize_preserves_fields() {
    for seed in 0..8 {
        let original = sample_product(seed);
        let mut input = original.serialize();
        input.as_object_mut().unwrap().remove("id");

        let decoded = Product::from_value(&input).unwrap();
        assert_eq!(decoded.id, None);
        assert_eq!(decoded.name, original.name);
        assert_eq!(decoded.description, original.description);
        assert_eq!(decoded.price, original.price);
        assert_eq!(decoded.available, original.available);
        assert_eq!(decoded.category, original.category);
        assert_eq!(decoded.serialize(), original.serialize());
    }
}

#[test]
fn deserialize_keeps_existing_id() {
    let mut product = sample_product(1);
    product.id = Some(99);
    product.deserialize(&product_json(json!(3))).unwrap();
    assert_eq!(product.id, Some(99));
    assert_eq!(product.name, "Fedora");
    assert_eq!(product.price.to_string(), "3.00");
}

#[test]
fn float_price_uses_exact_binary_value_and_rounds_half_up() {
    // 12.345 is stored as 12.3450000000000006394..., so it rounds up.
    let product = Product::from_value(&product_json(json!(12.345))).unwrap();
    assert_eq!(product.price, dec("12.35"));

    // 2.675 is stored as 2.6749999999999998223..., so it rounds down.
    let product = Product::from_value(&product_json(json!(2.675))).unwrap();
    assert_eq!(product.price, dec("2.67"));

    // 0.125 is exact in binary; the tie goes away from zero.
    let product = Product::from_value(&product_json(json!(0.125))).unwrap();
    assert_eq!(product.price, dec("0.13"));
}

#[test]
fn text_price_rounds_half_up_not_half_even() {
    let product = Product::from_value(&product_json(json!("0.125"))).unwrap();
    assert_eq!(product.price, dec("0.13"));

    let product = Product::from_value(&product_json(json!("2.665"))).unwrap();
    assert_eq!(product.price, dec("2.67"));
}

#[test]
fn text_price_tolerates_surrounding_quotes_and_spaces() {
    let product = Product::from_value(&product_json(json!(" \"19.99\" "))).unwrap();
    assert_eq!(product.price, dec("19.99"));
}

#[test]
fn integer_price_is_padded_to_cents() {
    let product = Product::from_value(&product_json(json!(20))).unwrap();
    assert_eq!(product.price.to_string(), "20.00");
    assert_eq!(product.serialize()["price"].as_f64(), Some(20.0));
}

#[test]
fn deserialize_with_missing_data() {
    let err = Product::from_value(&Value::Null).unwrap_err();
    assert!(matches!(err, DataValidationError::BadData(_)));
    assert!(err.to_string().contains("bad or no data"));
}

#[test]
fn deserialize_with_bad_data() {
    let err = Product::from_value(&json!("not a dict")).unwrap_err();
    assert!(matches!(err, DataValidationError::BadData(_)));

    let err = Product::from_value(&json!([1, 2, 3])).unwrap_err();
    assert!(matches!(err, DataValidationError::BadData(_)));
}

#[test]
fn deserialize_empty_mapping_reports_first_missing_key() {
    let err = Product::from_value(&json!({})).unwrap_err();
    assert_eq!(err, DataValidationError::MissingField("name"));
    assert_eq!(err.to_string(), "Invalid product: missing name");
}

#[test]
fn deserialize_missing_required_fields() {
    let err = Product::from_value(&json!({ "description": "Missing name" })).unwrap_err();
    assert_eq!(err, DataValidationError::MissingField("name"));

    for key in ["description", "price", "available", "category"] {
        let mut data = product_json(json!(1.5));
        data.as_object_mut().unwrap().remove(key);
        let err = Product::from_value(&data).unwrap_err();
        assert_eq!(err.to_string(), format!("Invalid product: missing {key}"));
    }
}

#[test]
fn deserialize_invalid_boolean() {
    let data = json!({
        "name": "Test",
        "description": "Test",
        "price": 10.00,
        "available": "yes",
        "category": "FOOD"
    });
    let err = Product::from_value(&data).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid type for boolean [available]: string"
    );

    let mut data = data;
    data["available"] = json!(1);
    assert!(matches!(
        Product::from_value(&data),
        Err(DataValidationError::InvalidType { field: "available", found: "number", .. })
    ));
}

#[test]
fn deserialize_invalid_category() {
    let mut data = product_json(json!(5));
    data["category"] = json!("INVALID");
    let err = Product::from_value(&data).unwrap_err();
    assert_eq!(err, DataValidationError::InvalidAttribute("INVALID".to_string()));
    assert_eq!(err.to_string(), "Invalid attribute: INVALID");

    data["category"] = json!("food");
    assert!(Product::from_value(&data).is_err());

    data["category"] = json!(2);
    assert!(matches!(
        Product::from_value(&data),
        Err(DataValidationError::InvalidAttribute(_))
    ));
}

#[test]
fn deserialize_rejects_unparseable_price() {
    let err = Product::from_value(&product_json(json!("cheap"))).unwrap_err();
    assert!(matches!(err, DataValidationError::InvalidPrice(_)));

    let err = Product::from_value(&product_json(json!(true))).unwrap_err();
    assert!(matches!(
        err,
        DataValidationError::InvalidType { field: "price", found: "boolean", .. }
    ));
}

#[test]
fn deserialize_rejects_price_too_large_for_cents() {
    for price in [json!(1e27), json!("1e27"), json!("79228162514264337593543950335")] {
        let err = Product::from_value(&product_json(price.clone())).unwrap_err();
        assert!(
            matches!(err, DataValidationError::InvalidPrice(_)),
            "{price} gave {err}"
        );
    }
}

#[test]
fn out_of_range_float_price_is_reported_briefly() {
    let err = Product::from_value(&product_json(json!(1e300))).unwrap_err();
    assert_eq!(
        err,
        DataValidationError::InvalidPrice("1e300 is out of decimal range".to_string())
    );
}

#[test]
fn deserialize_rejects_non_string_name() {
    let mut data = product_json(json!(5));
    data["name"] = json!(12);
    let err = Product::from_value(&data).unwrap_err();
    assert!(matches!(
        err,
        DataValidationError::InvalidType { field: "name", .. }
    ));
}

#[test]
fn failed_deserialize_leaves_record_untouched() {
    let original = sample_product(4);
    let mut product = original.clone();

    let mut data = product_json(json!(5));
    data["category"] = json!("INVALID");
    assert!(product.deserialize(&data).is_err());
    assert_eq!(product, original);
}

#[test]
fn every_category_name_is_accepted() {
    for category in Category::ALL {
        let mut data = product_json(json!(1));
        data["category"] = json!(category.name());
        assert_eq!(Product::from_value(&data).unwrap().category, category);
    }
}
