//! Catalog Store
//!
//! Ordered, immutable product metadata with an identifier index. Supports the
//! two lookups the recommender and its callers need: filtering by a set of
//! identifiers and filtering by category.

use crate::filter::FilterCondition;
use crate::{Product, ProductId};
use ahash::{AHashMap, AHashSet};
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    /// id -> position of its first occurrence
    index: AHashMap<ProductId, usize>,
    duplicates: usize,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        let mut index = AHashMap::with_capacity(products.len());
        let mut duplicates = 0;
        for (pos, product) in products.iter().enumerate() {
            if index.contains_key(&product.id) {
                duplicates += 1;
            } else {
                index.insert(product.id.clone(), pos);
            }
        }

        if duplicates > 0 {
            warn!(duplicates, "catalog contains repeated product ids; recommendations use the first row of each");
        }

        Self { products, index, duplicates }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Number of rows whose id was already seen earlier in the catalog
    #[inline]
    pub fn duplicate_ids(&self) -> usize {
        self.duplicates
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// First product with this id
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).map(|&pos| &self.products[pos])
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.index.contains_key(id)
    }

    fn select(&self, condition: &FilterCondition<'_>) -> Vec<&Product> {
        self.products.iter().filter(|p| condition.matches(p)).collect()
    }

    /// Every row whose id is in `ids`, catalog order
    pub fn filter_by_ids(&self, ids: &[ProductId]) -> Vec<&Product> {
        if ids.is_empty() {
            return Vec::new();
        }
        self.select(&FilterCondition::Ids(ids.iter().collect()))
    }

    /// Every row in `category`, catalog order
    pub fn filter_by_category(&self, category: &str) -> Vec<&Product> {
        self.select(&FilterCondition::Category(category))
    }

    /// Distinct non-empty categories, sorted
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = AHashSet::new();
        let mut categories: Vec<&str> = self
            .products
            .iter()
            .filter_map(|p| p.category.as_deref())
            .filter(|c| seen.insert(*c))
            .collect();
        categories.sort_unstable();
        categories
    }

    /// Distinct product names in `category`, first-occurrence order
    pub fn product_names(&self, category: &str) -> Vec<&str> {
        let mut seen = AHashSet::new();
        self.filter_by_category(category)
            .into_iter()
            .map(|p| p.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Id of the first product named `name` within `category`
    pub fn resolve_name(&self, category: &str, name: &str) -> Option<&ProductId> {
        self.products
            .iter()
            .find(|p| p.category.as_deref() == Some(category) && p.name == name)
            .map(|p| &p.id)
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Catalog::new(iter.into_iter().collect())
    }
}
