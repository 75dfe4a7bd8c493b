//! # simrec
//!
//! "More like this" product recommendations from a precomputed similarity
//! matrix and a product catalog.
//!
//! Both inputs are loaded once at startup and never mutated; every query is a
//! pure in-memory lookup: take the product's similarity row, rank it by score,
//! drop the product itself, keep the top N and join them against the catalog.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! simrec --catalog metadata/products.csv --matrix metadata/hybrid_similarity.json --http-port 8080
//! curl 'http://localhost:8080/products/P473671/recommendations?count=5'
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use simrec::prelude::*;
//!
//! let store = ModelStore::load(&ModelConfig::default()).unwrap();
//! let recommender = store.recommender();
//! for record in recommender.recommend("P473671", 5) {
//!     println!("{} by {} (${})", record.name, record.brand, record.price);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - [`simrec-core`](https://docs.rs/simrec-core) - Data model, catalog, similarity matrix, recommender
//! - [`simrec-storage`](https://docs.rs/simrec-storage) - Catalog CSV and matrix file loaders
//! - [`simrec-api`](https://docs.rs/simrec-api) - REST API

// Re-export core types
pub use simrec_core::{
    Catalog, DenseMatrix, Lookup, Product, ProductId,
    Recommendation, RecommendationRecord, Recommender, SimilarityMatrix, Error, Result,
    DEFAULT_RECOMMENDATIONS,
};

// Re-export storage
pub use simrec_storage::{
    CatalogLoader, LoadError, LoadReport, MatrixFormat, MatrixLoader, ModelConfig, ModelStore,
};

// Re-export API
pub use simrec_api::{ApiSettings, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, Product, ProductId, RecommendationRecord, Recommender, SimilarityMatrix,
        ModelConfig, ModelStore, MatrixFormat,
        ApiSettings, RestApi,
    };
}
