//! Error types for the shared crate

use rust_decimal::Decimal;
use thiserror::Error;

/// Field-level violations raised while constructing a product or an order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Order numbers start at 1
    #[error("Order number must be positive")]
    OrderNumber,

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    /// Text would break the `::` separated record layout
    #[error("{field} must not contain '::' or line breaks")]
    ForbiddenCharacters { field: &'static str },

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: Decimal },

    /// Upper bounds keep every derived cost inside `Decimal` range
    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        field: &'static str,
        max: Decimal,
        value: Decimal,
    },

    #[error("Area must be at least 100 sq. ft., got {0}")]
    AreaTooSmall(Decimal),
}
