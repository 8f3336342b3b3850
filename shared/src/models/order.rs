//! Order Model
//!
//! An order is an immutable value. Edits build a new `Order` carrying the same
//! [`OrderKey`]; costs are derived on demand and never stored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::product::Product;
use crate::error::ValidationError;
use crate::money::percent_of;

/// Field separator of the order record files
pub const FIELD_DELIMITER: &str = "::";

/// Smallest area (sq. ft.) a single order may cover
pub const MIN_AREA: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Largest area (sq. ft.) a single order may cover
pub const MAX_AREA: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Largest tax rate, in percent
pub const MAX_TAX_RATE: Decimal = Decimal::ONE_HUNDRED;

/// Identity of an order: unique across the whole store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderKey {
    pub date: NaiveDate,
    pub number: u32,
}

impl OrderKey {
    pub fn new(date: NaiveDate, number: u32) -> Self {
        Self { date, number }
    }
}

impl std::fmt::Display for OrderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} on {}", self.number, self.date)
    }
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Order {
    order_date: NaiveDate,
    order_number: u32,
    customer_name: String,
    /// State abbreviation
    state: String,
    /// Tax rate in percentage (e.g., 9.25 = 9.25%)
    tax_rate: Decimal,
    /// Product snapshot taken when the order was placed
    product: Product,
    /// Area in square feet
    area: Decimal,
}

impl Order {
    /// Build a validated order
    ///
    /// Text fields are trimmed. Fails if the number is zero, a text field is
    /// empty or would break the record layout, the tax rate is outside
    /// `0..=`[`MAX_TAX_RATE`] or the area is outside [`MIN_AREA`]`..=`[`MAX_AREA`].
    pub fn new(
        order_date: NaiveDate,
        order_number: u32,
        customer_name: impl Into<String>,
        state: impl Into<String>,
        tax_rate: Decimal,
        product: Product,
        area: Decimal,
    ) -> Result<Self, ValidationError> {
        if order_number == 0 {
            return Err(ValidationError::OrderNumber);
        }
        let customer_name = check_text_field("Customer name", customer_name.into())?;
        let state = check_text_field("State", state.into())?;
        if tax_rate < Decimal::ZERO {
            return Err(ValidationError::Negative {
                field: "Tax rate",
                value: tax_rate,
            });
        }
        if tax_rate > MAX_TAX_RATE {
            return Err(ValidationError::TooLarge {
                field: "Tax rate",
                max: MAX_TAX_RATE,
                value: tax_rate,
            });
        }
        if area < MIN_AREA {
            return Err(ValidationError::AreaTooSmall(area));
        }
        if area > MAX_AREA {
            return Err(ValidationError::TooLarge {
                field: "Area",
                max: MAX_AREA,
                value: area,
            });
        }

        Ok(Self {
            order_date,
            order_number,
            customer_name,
            state,
            // -0.00 is stored as 0.00
            tax_rate: tax_rate.abs(),
            product,
            area,
        })
    }

    /// Build the edited version of this order, keeping its key
    ///
    /// `tax` carries the new state together with the rate resolved for it.
    pub fn revise(
        &self,
        customer_name: Option<String>,
        tax: Option<(String, Decimal)>,
        product: Option<Product>,
        area: Option<Decimal>,
    ) -> Result<Self, ValidationError> {
        let (state, tax_rate) = tax.unwrap_or_else(|| (self.state.clone(), self.tax_rate));
        Self::new(
            self.order_date,
            self.order_number,
            customer_name.unwrap_or_else(|| self.customer_name.clone()),
            state,
            tax_rate,
            product.unwrap_or_else(|| self.product.clone()),
            area.unwrap_or(self.area),
        )
    }

    pub fn key(&self) -> OrderKey {
        OrderKey::new(self.order_date, self.order_number)
    }

    pub fn order_date(&self) -> NaiveDate {
        self.order_date
    }

    pub fn order_number(&self) -> u32 {
        self.order_number
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn area(&self) -> Decimal {
        self.area
    }

    // ========== Derived costs (unrounded) ==========

    pub fn material_cost(&self) -> Decimal {
        self.area * self.product.cost_per_square_foot()
    }

    pub fn labor_cost(&self) -> Decimal {
        self.area * self.product.labor_cost_per_square_foot()
    }

    pub fn tax(&self) -> Decimal {
        percent_of(self.untaxed_total(), self.tax_rate)
    }

    pub fn total(&self) -> Decimal {
        self.untaxed_total() + self.tax()
    }

    fn untaxed_total(&self) -> Decimal {
        self.material_cost() + self.labor_cost()
    }
}

/// Raw input for a new order, before tax and product lookup
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_date: NaiveDate,
    pub customer_name: String,
    pub state: String,
    pub product_type: String,
    pub area: Decimal,
}

/// Edit order payload
///
/// `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct OrderEdit {
    pub customer_name: Option<String>,
    pub state: Option<String>,
    pub product_type: Option<String>,
    pub area: Option<Decimal>,
}

impl OrderEdit {
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none()
            && self.state.is_none()
            && self.product_type.is_none()
            && self.area.is_none()
    }
}

/// Trim a text field and make sure it fits in a `::` separated record
pub(crate) fn check_text_field(
    field: &'static str,
    value: String,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.contains(FIELD_DELIMITER) || trimmed.contains(['\n', '\r']) {
        return Err(ValidationError::ForbiddenCharacters { field });
    }
    Ok(trimmed.to_string())
}
