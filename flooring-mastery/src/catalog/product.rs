//! Product catalog
//!
//! File layout: header line, then `ProductType,CostPerSquareFoot,LaborCostPerSquareFoot`.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use shared::Product;

use super::{CatalogError, CatalogResult, ProductCatalog, read_data_lines};

const PRODUCT_DELIMITER: char = ',';

#[derive(Debug, Clone, Default)]
pub struct ProductTable {
    products: BTreeMap<String, Product>,
}

impl ProductTable {
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let mut products = BTreeMap::new();

        for (line_no, line) in read_data_lines(path)? {
            let malformed = |reason: String| CatalogError::Malformed {
                path: path.to_path_buf(),
                line: line_no,
                reason,
            };

            let fields: Vec<&str> = line.split(PRODUCT_DELIMITER).map(str::trim).collect();
            let [product_type, cost, labor_cost] = fields.as_slice() else {
                return Err(malformed(format!("expected 3 fields, found {}", fields.len())));
            };
            let cost = Decimal::from_str(cost)
                .map_err(|_| malformed(format!("invalid cost per square foot '{cost}'")))?;
            let labor_cost = Decimal::from_str(labor_cost).map_err(|_| {
                malformed(format!("invalid labor cost per square foot '{labor_cost}'"))
            })?;

            let product = Product::new(*product_type, cost, labor_cost)
                .map_err(|e| malformed(e.to_string()))?;
            products.insert(product.product_type().to_string(), product);
        }

        tracing::debug!(products = products.len(), "Products loaded from {}", path.display());
        Ok(Self { products })
    }

    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products
                .into_iter()
                .map(|p| (p.product_type().to_string(), p))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for ProductTable {
    fn by_type(&self, product_type: &str) -> Option<Product> {
        self.products.get(product_type).cloned()
    }

    fn all_types(&self) -> Vec<Product> {
        self.products.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_products(content: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Products.txt");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_products() {
        let (_dir, path) = write_products(
            "ProductType,CostPerSquareFoot,LaborCostPerSquareFoot\r\nCarpet,2.25,2.10\r\nTile,3.50,4.15\r\n",
        );
        let table = ProductTable::load(&path).unwrap();

        assert_eq!(table.len(), 2);
        let carpet = table.by_type("Carpet").unwrap();
        assert_eq!(carpet.cost_per_square_foot(), Decimal::new(225, 2));
        assert_eq!(carpet.labor_cost_per_square_foot(), Decimal::new(210, 2));
        assert_eq!(table.by_type("Marble"), None);

        let types: Vec<String> = table
            .all_types()
            .iter()
            .map(|p| p.product_type().to_string())
            .collect();
        assert_eq!(types, vec!["Carpet", "Tile"]);
    }

    #[test]
    fn test_load_rejects_bad_rows() {
        let (_dir, path) = write_products("header\nCarpet,2.25\n");
        assert!(matches!(
            ProductTable::load(&path),
            Err(CatalogError::Malformed { line: 2, .. })
        ));

        let (_dir, path) = write_products("header\nCarpet,2.25,2.10\nTile,cheap,4.15\n");
        assert!(matches!(
            ProductTable::load(&path),
            Err(CatalogError::Malformed { line: 3, .. })
        ));

        let (_dir, path) = write_products("header\nCarpet,-2.25,2.10\n");
        assert!(matches!(
            ProductTable::load(&path),
            Err(CatalogError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn test_from_products() {
        let table = ProductTable::from_products([
            Product::new("Wood", Decimal::new(515, 2), Decimal::new(475, 2)).unwrap(),
        ]);
        assert!(table.by_type("Wood").is_some());
        assert!(!table.is_empty());
    }
}
