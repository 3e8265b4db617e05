//! Product domain model and its plain-mapping codec.
//!
//! # Responsibility
//! - Define the canonical product record shared by repository and service.
//! - Convert records to and from untyped JSON mappings.
//!
//! # Invariants
//! - Prices are exact decimals quantized to cents.
//! - Every decode failure surfaces as `DataValidationError`.

pub mod codec;
pub mod product;
