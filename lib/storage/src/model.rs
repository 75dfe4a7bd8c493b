use crate::catalog_loader::CatalogLoader;
use crate::error::Result;
use crate::matrix_loader::{MatrixFormat, MatrixLoader};
use simrec_core::{Catalog, Recommender, SimilarityMatrix};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Where the two static inputs live and how to read them
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub catalog_path: PathBuf,
    pub matrix_path: PathBuf,
    pub matrix_format: Option<MatrixFormat>,
    pub matrix_checksum: Option<String>,
    pub delimiter: u8,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("metadata/products.csv"),
            matrix_path: PathBuf::from("metadata/hybrid_similarity.json"),
            matrix_format: None,
            matrix_checksum: None,
            delimiter: b',',
        }
    }
}

/// Summary of a completed load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub products: usize,
    pub duplicate_ids: usize,
    pub matrix_rows: usize,
    pub matrix_columns: usize,
    /// Matrix rows whose id has no catalog entry
    pub rows_without_product: usize,
    pub elapsed: Duration,
}

/// The loaded, read-only recommendation model
pub struct ModelStore {
    recommender: Arc<Recommender>,
    report: LoadReport,
}

impl ModelStore {
    /// Load catalog and similarity matrix. Any failure aborts the whole load.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let started = Instant::now();

        let catalog = CatalogLoader::new()
            .with_delimiter(config.delimiter)
            .load(&config.catalog_path)?;

        let mut loader = MatrixLoader::new();
        if let Some(format) = config.matrix_format {
            loader = loader.with_format(format);
        }
        if let Some(expected) = &config.matrix_checksum {
            loader = loader.with_checksum(expected.clone());
        }
        let matrix = loader.load(&config.matrix_path)?;

        Ok(Self::from_parts(catalog, matrix, started))
    }

    /// Wrap already-built inputs
    pub fn from_parts(catalog: Catalog, matrix: SimilarityMatrix, started: Instant) -> Self {
        let rows_without_product = matrix
            .row_ids()
            .iter()
            .filter(|id| !catalog.contains(id))
            .count();
        if rows_without_product > 0 {
            warn!(rows_without_product, "similarity rows without a catalog product");
        }

        let report = LoadReport {
            products: catalog.len(),
            duplicate_ids: catalog.duplicate_ids(),
            matrix_rows: matrix.len(),
            matrix_columns: matrix.num_columns(),
            rows_without_product,
            elapsed: started.elapsed(),
        };
        info!(
            products = report.products,
            matrix_rows = report.matrix_rows,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "model ready"
        );

        Self {
            recommender: Arc::new(Recommender::new(catalog, matrix)),
            report,
        }
    }

    #[inline]
    pub fn recommender(&self) -> Arc<Recommender> {
        self.recommender.clone()
    }

    #[inline]
    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}
