//! # simrec API
//!
//! JSON REST surface over a shared [`simrec_core::Recommender`]: category
//! browsing, product-name resolution and similar-product recommendations.

pub mod rest;

pub use rest::{ApiSettings, RecommendationResponse, RestApi, NO_RECOMMENDATIONS};
