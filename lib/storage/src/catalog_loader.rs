//! Catalog CSV loading
//!
//! Reads the delimited product table into a [`Catalog`]. Required columns are
//! located by header name; any other columns are ignored.

use crate::error::{LoadError, Result};
use simrec_core::{Catalog, Product, ProductId};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Instant;
use tracing::info;

pub const COL_PRODUCT_ID: &str = "product_id";
pub const COL_PRODUCT_NAME: &str = "product_name";
pub const COL_BRAND_NAME: &str = "brand_name";
pub const COL_PRICE: &str = "price_usd";
pub const COL_CATEGORY: &str = "primary_category";

/// Column positions resolved from the header row
struct Columns {
    id: usize,
    name: usize,
    brand: usize,
    price: usize,
    category: usize,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| LoadError::MissingColumn {
                    column: column.to_string(),
                    available: headers.iter().map(str::to_string).collect(),
                })
        };

        Ok(Self {
            id: find(COL_PRODUCT_ID)?,
            name: find(COL_PRODUCT_NAME)?,
            brand: find(COL_BRAND_NAME)?,
            price: find(COL_PRICE)?,
            category: find(COL_CATEGORY)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CatalogLoader {
    delimiter: u8,
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CatalogLoader {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load a catalog file from disk
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Catalog> {
        let path = path.as_ref();
        let started = Instant::now();
        let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
        let catalog = self.load_reader(BufReader::new(file))?;

        info!(
            path = %path.display(),
            products = catalog.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse catalog rows from any reader
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Catalog> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(false)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| LoadError::Csv {
                line: 1,
                message: format!("failed to read headers: {e}"),
            })?
            .clone();
        let columns = Columns::resolve(&headers)?;

        let mut products = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| LoadError::Csv {
                line: e.position().map(|p| p.line()).unwrap_or(0),
                message: e.to_string(),
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            products.push(Self::parse_row(&record, &columns, line)?);
        }

        Ok(Catalog::new(products))
    }

    fn parse_row(record: &csv::StringRecord, columns: &Columns, line: u64) -> Result<Product> {
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let raw_price = field(columns.price);
        let price = raw_price
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| LoadError::InvalidPrice {
                line,
                value: raw_price.to_string(),
            })?;

        let category = match field(columns.category) {
            "" => None,
            c => Some(c.to_string()),
        };

        Ok(Product {
            id: ProductId::parse(field(columns.id)),
            name: field(columns.name).to_string(),
            brand: field(columns.brand).to_string(),
            price,
            category,
        })
    }
}
