//! Read-only reference data consulted before an order is built
//!
//! - **tax**: state abbreviation → tax rate (percent)
//! - **product**: product type → [`Product`]
//!
//! The service only sees the traits below; the file-backed tables are the
//! default implementations.

pub mod product;
pub mod tax;

use std::io;
use std::path::PathBuf;

use rust_decimal::Decimal;
use shared::Product;
use thiserror::Error;

pub use product::ProductTable;
pub use tax::TaxTable;

/// Tax rates by state
pub trait TaxRateProvider {
    /// Percent rate for a state abbreviation
    fn rate_for_state(&self, abbr: &str) -> Option<Decimal>;

    /// Every known state abbreviation, sorted
    fn states(&self) -> Vec<String>;

    /// Full name for an abbreviation, e.g. `TX` → `Texas`
    fn state_name(&self, abbr: &str) -> Option<String>;
}

/// Products by type
pub trait ProductCatalog {
    fn by_type(&self, product_type: &str) -> Option<Product>;

    /// Every product, sorted by type
    fn all_types(&self) -> Vec<Product>;
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unable to load {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}: missing header line")]
    MissingHeader { path: PathBuf },

    #[error("{path}:{line}: {reason}")]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Data lines of a reference file with their 1-based line numbers
///
/// The first line is the header and is skipped; blank lines are ignored.
fn read_data_lines(path: &std::path::Path) -> CatalogResult<Vec<(usize, String)>> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut lines = content.lines();
    if lines.next().is_none() {
        return Err(CatalogError::MissingHeader {
            path: path.to_path_buf(),
        });
    }

    Ok(lines
        .enumerate()
        .map(|(idx, line)| (idx + 2, line.trim_end_matches('\r').to_string()))
        .filter(|(_, line)| !line.trim().is_empty())
        .collect())
}
