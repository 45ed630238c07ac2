//! Products domain module.
//!
//! This crate contains the product catalog rules, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage):
//! - `product`: the `Product` entity and its invariants
//! - `validation`: declarative request field rules and their evaluator

pub mod product;
pub mod validation;

pub use product::{NewProduct, Price, Product, ProductChanges};
pub use validation::{FieldError, FieldRule, Location, RequestInput};
