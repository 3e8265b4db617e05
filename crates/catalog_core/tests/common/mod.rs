#![allow(dead_code)]

use catalog_core::{Category, Product};
use rust_decimal::Decimal;
use serde_json::{json, Value};

const NAMES: &[&str] = &[
    "Hat", "Pants", "Shirt", "Apple", "Banana", "Pots", "Towels", "Ford", "Chevy", "Hammer",
    "Wrench",
];

/// Deterministic product fixture; `seed` picks name, price and category.
pub fn sample_product(seed: usize) -> Product {
    let category = Category::ALL[1 + seed % (Category::ALL.len() - 1)];
    Product::new(
        NAMES[seed % NAMES.len()],
        format!("Sample product #{seed}"),
        Decimal::new(500 + (seed as i64) * 125, 2),
        seed % 2 == 0,
        category,
    )
}

pub fn product_json(price: Value) -> Value {
    json!({
        "name": "Fedora",
        "description": "A red hat",
        "price": price,
        "available": true,
        "category": "CLOTHS",
    })
}
