//! State tax table
//!
//! File layout: header line, then `State::StateName::TaxRate` per line.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use shared::{FIELD_DELIMITER, MAX_TAX_RATE};

use super::{CatalogError, CatalogResult, TaxRateProvider, read_data_lines};

#[derive(Debug, Clone, Default)]
pub struct TaxTable {
    /// abbreviation → (state name, percent rate)
    rates: BTreeMap<String, (String, Decimal)>,
}

impl TaxTable {
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let mut rates = BTreeMap::new();

        for (line_no, line) in read_data_lines(path)? {
            let malformed = |reason: String| CatalogError::Malformed {
                path: path.to_path_buf(),
                line: line_no,
                reason,
            };

            let fields: Vec<&str> = line.split(FIELD_DELIMITER).map(str::trim).collect();
            let [abbr, name, rate] = fields.as_slice() else {
                return Err(malformed(format!("expected 3 fields, found {}", fields.len())));
            };
            if abbr.is_empty() {
                return Err(malformed("empty state abbreviation".to_string()));
            }
            let rate = Decimal::from_str(rate)
                .ok()
                .filter(|r| (Decimal::ZERO..=MAX_TAX_RATE).contains(r))
                .ok_or_else(|| malformed(format!("invalid tax rate '{rate}'")))?;

            rates.insert(abbr.to_string(), (name.to_string(), rate));
        }

        tracing::debug!(states = rates.len(), "Tax rates loaded from {}", path.display());
        Ok(Self { rates })
    }

    /// Build from `(abbreviation, state name, rate)` entries
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str, Decimal)>) -> Self {
        Self {
            rates: entries
                .into_iter()
                .map(|(abbr, name, rate)| (abbr.to_string(), (name.to_string(), rate)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl TaxRateProvider for TaxTable {
    fn rate_for_state(&self, abbr: &str) -> Option<Decimal> {
        self.rates.get(abbr).map(|(_, rate)| *rate)
    }

    fn states(&self) -> Vec<String> {
        self.rates.keys().cloned().collect()
    }

    fn state_name(&self, abbr: &str) -> Option<String> {
        self.rates.get(abbr).map(|(name, _)| name.clone())
    }
}
