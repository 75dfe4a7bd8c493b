//! # simrec Core
//!
//! Core library for the simrec product recommender.
//!
//! This crate provides the in-memory data model and the lookup itself:
//!
//! - [`ProductId`] - Canonical string identifier (numeric ids are coerced once, here)
//! - [`Product`] / [`Catalog`] - Immutable product metadata with id and category lookups
//! - [`SimilarityMatrix`] - Precomputed pairwise similarity scores keyed by id
//! - [`Recommender`] - Top-N "more like this" over a catalog and a matrix
//!
//! ## Example
//!
//! ```rust
//! use simrec_core::{Catalog, DenseMatrix, Product, ProductId, Recommender, SimilarityMatrix};
//!
//! let catalog = Catalog::new(vec![
//!     Product::new("A", "Alpha Serum", "Acme", 30.0),
//!     Product::new("B", "Beta Toner", "Acme", 20.0),
//!     Product::new("C", "Gamma Cream", "Glow", 55.0),
//! ]);
//!
//! let ids: Vec<ProductId> = ["A", "B", "C"].iter().map(|s| ProductId::from(*s)).collect();
//! let matrix = SimilarityMatrix::from_dense(DenseMatrix {
//!     index: ids.clone(),
//!     columns: ids,
//!     data: vec![
//!         vec![Some(1.0), Some(0.2), Some(0.9)],
//!         vec![Some(0.2), Some(1.0), Some(0.4)],
//!         vec![Some(0.9), Some(0.4), Some(1.0)],
//!     ],
//! })
//! .unwrap();
//!
//! let recommender = Recommender::new(catalog, matrix);
//! let records = recommender.recommend("A", 1);
//! assert_eq!(records[0].name, "Gamma Cream");
//! ```

pub mod catalog;
pub mod error;
mod filter;
pub mod matrix;
pub mod product;
pub mod recommend;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use matrix::{DenseMatrix, SimilarityMatrix};
pub use product::{Product, ProductId, Recommendation, RecommendationRecord};
pub use recommend::{Lookup, Recommender, DEFAULT_RECOMMENDATIONS};
