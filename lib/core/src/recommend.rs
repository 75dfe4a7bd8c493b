//! Similarity Index
//!
//! Answers "what are the N products most similar to X, excluding X?" over an
//! injected [`Catalog`] and [`SimilarityMatrix`]. Both are read-only after
//! construction, so a `Recommender` can be shared behind an `Arc` by any
//! number of callers without locking.

use crate::{Catalog, ProductId, Recommendation, RecommendationRecord, SimilarityMatrix};
use tracing::debug;

/// Count used when the caller does not ask for one
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

/// Outcome of a lookup that keeps "unknown product" apart from "no matches"
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// The identifier has no row in the similarity matrix
    UnknownProduct,
    /// Ranked results; may be empty when no neighbour survives catalog filtering
    Found(Vec<Recommendation>),
}

impl Lookup {
    pub fn into_recommendations(self) -> Vec<Recommendation> {
        match self {
            Lookup::UnknownProduct => Vec::new(),
            Lookup::Found(recs) => recs,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Catalog,
    matrix: SimilarityMatrix,
}

impl Recommender {
    pub fn new(catalog: Catalog, matrix: SimilarityMatrix) -> Self {
        Self { catalog, matrix }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    /// Neighbours of `product_id`, best first, without the product itself.
    ///
    /// Ties keep persisted column order (stable sort). Returns `None` when the
    /// product has no similarity row.
    pub fn ranked_neighbors(
        &self,
        product_id: impl Into<ProductId>,
        count: usize,
    ) -> Option<Vec<(ProductId, f64)>> {
        let product_id = product_id.into();
        let row = self.matrix.row(&product_id)?;

        let mut scored: Vec<(&ProductId, f64)> = row.filter(|(id, _)| **id != product_id).collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(count);

        Some(scored.into_iter().map(|(id, score)| (id.clone(), score)).collect())
    }

    /// Full lookup with identifiers and scores
    pub fn lookup(&self, product_id: impl Into<ProductId>, count: usize) -> Lookup {
        let product_id = product_id.into();

        let Some(neighbors) = self.ranked_neighbors(&product_id, count) else {
            debug!(product_id = %product_id, "no similarity row");
            return Lookup::UnknownProduct;
        };

        let ids: Vec<ProductId> = neighbors.iter().map(|(id, _)| id.clone()).collect();
        let matches = self.catalog.filter_by_ids(&ids);

        // Rank order, one record per id (first catalog row wins)
        let recommendations: Vec<Recommendation> = neighbors
            .iter()
            .filter_map(|(id, score)| {
                matches.iter().find(|p| p.id == *id).map(|product| Recommendation {
                    product_id: id.clone(),
                    score: *score,
                    record: product.to_record(),
                })
            })
            .collect();

        debug!(
            product_id = %product_id,
            requested = count,
            ranked = neighbors.len(),
            returned = recommendations.len(),
            "recommendation lookup"
        );
        Lookup::Found(recommendations)
    }

    /// Top-`count` recommendations with identifier and score.
    /// Unknown products yield an empty vector.
    pub fn recommend_scored(&self, product_id: impl Into<ProductId>, count: usize) -> Vec<Recommendation> {
        self.lookup(product_id, count).into_recommendations()
    }

    /// Top-`count` `{name, brand, price}` records for `product_id`.
    ///
    /// Never fails: an unknown product, `count == 0`, or a row whose
    /// neighbours are all missing from the catalog all give an empty vector.
    pub fn recommend(&self, product_id: impl Into<ProductId>, count: usize) -> Vec<RecommendationRecord> {
        self.recommend_scored(product_id, count)
            .into_iter()
            .map(|rec| rec.record)
            .collect()
    }

    /// [`recommend`](Self::recommend) with [`DEFAULT_RECOMMENDATIONS`]
    pub fn recommend_default(&self, product_id: impl Into<ProductId>) -> Vec<RecommendationRecord> {
        self.recommend(product_id, DEFAULT_RECOMMENDATIONS)
    }
}
