//! Shared types for the flooring order system
//!
//! Domain value types used by the order store and its callers:
//! products, orders, validation errors and money rounding.
//! Nothing in this crate touches the filesystem.

pub mod error;
pub mod models;
pub mod money;

// Re-exports
pub use error::ValidationError;
pub use models::{
    FIELD_DELIMITER, MAX_AREA, MAX_COST_PER_SQUARE_FOOT, MAX_TAX_RATE, MIN_AREA, NewOrder, Order,
    OrderEdit, OrderKey, Product,
};
pub use rust_decimal::Decimal;
