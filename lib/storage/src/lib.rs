//! # simrec Storage
//!
//! Loads the two static inputs of the recommender once at startup:
//!
//! - [`CatalogLoader`] - delimited product table (`product_id`, `product_name`,
//!   `brand_name`, `price_usd`, `primary_category`)
//! - [`MatrixLoader`] - precomputed similarity matrix (JSON, gzip JSON, bincode)
//! - [`ModelStore`] - loads both and hands out a shared [`simrec_core::Recommender`]

pub mod catalog_loader;
pub mod error;
pub mod matrix_loader;
pub mod model;

pub use catalog_loader::CatalogLoader;
pub use error::{LoadError, Result};
pub use matrix_loader::{checksum, encode_matrix, save_matrix, MatrixFormat, MatrixLoader};
pub use model::{LoadReport, ModelConfig, ModelStore};
