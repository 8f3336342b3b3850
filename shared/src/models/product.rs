//! Product Model

use rust_decimal::Decimal;
use serde::Serialize;

use super::order::check_text_field;
use crate::error::ValidationError;

/// Largest material or labor cost per square foot
pub const MAX_COST_PER_SQUARE_FOOT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Flooring product entity
///
/// Reference data owned by the product catalog. Orders embed a copy of the
/// product as it was when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Product {
    product_type: String,
    /// Material cost per square foot
    cost_per_square_foot: Decimal,
    /// Labor cost per square foot
    labor_cost_per_square_foot: Decimal,
}

impl Product {
    pub fn new(
        product_type: impl Into<String>,
        cost_per_square_foot: Decimal,
        labor_cost_per_square_foot: Decimal,
    ) -> Result<Self, ValidationError> {
        let product_type = check_text_field("Product type", product_type.into())?;
        check_cost("Cost per square foot", cost_per_square_foot)?;
        check_cost("Labor cost per square foot", labor_cost_per_square_foot)?;

        // abs() only turns -0 into 0 here
        Ok(Self {
            product_type,
            cost_per_square_foot: cost_per_square_foot.abs(),
            labor_cost_per_square_foot: labor_cost_per_square_foot.abs(),
        })
    }

    pub fn product_type(&self) -> &str {
        &self.product_type
    }

    pub fn cost_per_square_foot(&self) -> Decimal {
        self.cost_per_square_foot
    }

    pub fn labor_cost_per_square_foot(&self) -> Decimal {
        self.labor_cost_per_square_foot
    }
}

fn check_cost(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::Negative { field, value });
    }
    if value > MAX_COST_PER_SQUARE_FOOT {
        return Err(ValidationError::TooLarge {
            field,
            max: MAX_COST_PER_SQUARE_FOOT,
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_rejects_negative_costs() {
        let err = Product::new("Tile", Decimal::new(-1, 0), Decimal::ONE).unwrap_err();
        assert!(matches!(err, ValidationError::Negative { .. }));

        let err = Product::new("Tile", Decimal::ONE, Decimal::new(-350, 2)).unwrap_err();
        assert!(matches!(err, ValidationError::Negative { .. }));
    }

    #[test]
    fn test_rejects_delimiter_in_type() {
        let err = Product::new("Wood::Oak", Decimal::ONE, Decimal::ONE).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ForbiddenCharacters {
                field: "Product type"
            }
        );
    }

    #[test]
    fn test_rejects_costs_above_maximum() {
        let err = Product::new("Gold", Decimal::new(1_000_001, 0), Decimal::ONE).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TooLarge {
                field: "Cost per square foot",
                ..
            }
        ));
        assert!(Product::new("Gold", MAX_COST_PER_SQUARE_FOOT, MAX_COST_PER_SQUARE_FOOT).is_ok());
    }

    #[test]
    fn test_zero_costs_are_allowed() {
        let p = Product::new("Sample", Decimal::ZERO, Decimal::ZERO).unwrap();
        assert_eq!(p.product_type(), "Sample");

        // -0.00 is zero, not negative
        let negative_zero = Decimal::from_str("-0.00").unwrap();
        let p = Product::new("Sample", negative_zero, negative_zero).unwrap();
        assert_eq!(p.cost_per_square_foot().to_string(), "0.00");
    }
}
