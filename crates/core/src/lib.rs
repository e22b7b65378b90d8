//! `stockwise-core`: value types shared by the analytics engine and its adapters.
//!
//! This crate contains **pure** data (no IO, no async, no storage).

pub mod error;
pub mod id;
pub mod sales;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::ProductId;
pub use sales::{CatalogAggregate, DailySalesRecord};
pub use value_object::ValueObject;
