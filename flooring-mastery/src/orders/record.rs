//! Order record codec
//!
//! One order per line, fields separated by `::`.
//!
//! | # | Column | Stored | Written on save |
//! |---|--------|--------|-----------------|
//! | 0 | OrderNumber | yes | as is |
//! | 1 | CustomerName | yes | as is |
//! | 2 | State | yes | as is |
//! | 3 | TaxRate | yes | as is |
//! | 4 | ProductType | yes | as is |
//! | 5 | Area | yes | as is |
//! | 6 | CostPerSquareFoot | yes | as is |
//! | 7 | LaborCostPerSquareFoot | yes | as is |
//! | 8..=11 | MaterialCost, LaborCost, Tax, Total | no | rounded to cents |
//!
//! Computed columns are ignored when reading and recomputed from the stored ones.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::money::format_money;
use shared::{FIELD_DELIMITER, Order, Product, ValidationError};
use thiserror::Error;

/// Header line of a per-date order file
pub const ORDER_FILE_HEADER: &str = "OrderNumber::CustomerName::State::TaxRate::ProductType::Area::CostPerSquareFoot::LaborCostPerSquareFoot::MaterialCost::LaborCost::Tax::Total";

/// Header line of the consolidated export file
pub const EXPORT_FILE_HEADER: &str = "OrderNumber::CustomerName::State::TaxRate::ProductType::Area::CostPerSquareFoot::LaborCostPerSquareFoot::MaterialCost::LaborCost::Tax::Total::OrderDate";

/// Stored columns required on every line
const STORED_FIELDS: usize = 8;
/// Stored columns plus the computed cost columns
const FULL_FIELDS: usize = 12;

const FILE_PREFIX: &str = "Orders_";
const FILE_SUFFIX: &str = ".txt";
/// `Orders_` + `MMDDYYYY` + `.txt`
const FILE_NAME_LEN: usize = 19;

/// Date format of the export file's trailing column
pub const EXPORT_DATE_FORMAT: &str = "%m-%d-%Y";

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("expected 8 to 12 fields, found {0}")]
    FieldCount(usize),

    #[error("invalid {field} '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

// ========== File names ==========

/// `Orders_MMDDYYYY.txt` for the given date
pub fn partition_file_name(date: NaiveDate) -> String {
    format!("{FILE_PREFIX}{}{FILE_SUFFIX}", date.format("%m%d%Y"))
}

/// Inverse of [`partition_file_name`]
///
/// Month sits at offset 7..9, day at 9..11 and the 4-digit year at 11..15.
/// Returns `None` for anything that does not follow the convention exactly.
pub fn parse_partition_file_name(name: &str) -> Option<NaiveDate> {
    if name.len() != FILE_NAME_LEN
        || !name.starts_with(FILE_PREFIX)
        || !name.ends_with(FILE_SUFFIX)
    {
        return None;
    }
    let digits = name.get(7..15)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let month = digits[0..2].parse().ok()?;
    let day = digits[2..4].parse().ok()?;
    let year = digits[4..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

// ========== Lines ==========

/// Parse one data line of the file holding `date`'s orders
pub fn parse_order_line(line: &str, date: NaiveDate) -> Result<Order, RecordError> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if !(STORED_FIELDS..=FULL_FIELDS).contains(&fields.len()) {
        return Err(RecordError::FieldCount(fields.len()));
    }

    let order_number = fields[0]
        .trim()
        .parse::<u32>()
        .map_err(|_| RecordError::InvalidNumber {
            field: "OrderNumber",
            value: fields[0].to_string(),
        })?;
    let tax_rate = parse_decimal("TaxRate", fields[3])?;
    let area = parse_decimal("Area", fields[5])?;
    let cost = parse_decimal("CostPerSquareFoot", fields[6])?;
    let labor_cost = parse_decimal("LaborCostPerSquareFoot", fields[7])?;

    let product = Product::new(fields[4], cost, labor_cost)?;
    Ok(Order::new(
        date,
        order_number,
        fields[1],
        fields[2],
        tax_rate,
        product,
        area,
    )?)
}

/// Line written to a per-date order file
pub fn format_order_line(order: &Order) -> String {
    let product = order.product();
    [
        order.order_number().to_string(),
        order.customer_name().to_string(),
        order.state().to_string(),
        order.tax_rate().to_string(),
        product.product_type().to_string(),
        order.area().to_string(),
        product.cost_per_square_foot().to_string(),
        product.labor_cost_per_square_foot().to_string(),
        format_money(order.material_cost()),
        format_money(order.labor_cost()),
        format_money(order.tax()),
        format_money(order.total()),
    ]
    .join(FIELD_DELIMITER)
}

/// Line written to the export file: the order line plus its date
pub fn format_export_line(order: &Order) -> String {
    format!(
        "{}{FIELD_DELIMITER}{}",
        format_order_line(order),
        order.order_date().format(EXPORT_DATE_FORMAT)
    )
}

fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, RecordError> {
    Decimal::from_str(value.trim()).map_err(|_| RecordError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
