use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Canonical product identifier.
///
/// The catalog may store identifiers as numbers while the similarity matrix is
/// keyed by strings. Every conversion into `ProductId` produces the same
/// decimal string form, so `ProductId::from(12u64)`, `ProductId::from(12.0)`
/// and `ProductId::from("12")` compare equal. Surrounding whitespace is
/// trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawProductId", into = "String")]
pub struct ProductId(String);

/// Wire forms accepted when deserializing an identifier
#[derive(Deserialize)]
#[serde(untagged)]
enum RawProductId {
    String(String),
    Integer(i64),
    Float(f64),
}

impl From<RawProductId> for ProductId {
    fn from(raw: RawProductId) -> Self {
        match raw {
            RawProductId::String(s) => ProductId::from(s),
            RawProductId::Integer(i) => ProductId::from(i),
            RawProductId::Float(f) => ProductId::from(f),
        }
    }
}

impl ProductId {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<ProductId>) -> Self {
        id.into()
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse a raw textual cell (CSV field, JSON key) into the canonical form.
    ///
    /// Integral float spellings such as `"12.0"` or `"-12.0"` collapse to
    /// `"12"` and `"-12"`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some(int_part) = trimmed.strip_suffix(".0") {
            let digits = int_part.strip_prefix('-').unwrap_or(int_part);
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                return ProductId(int_part.to_string());
            }
        }
        ProductId(trimmed.to_string())
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        ProductId::parse(&s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        ProductId::parse(s)
    }
}

impl From<&String> for ProductId {
    fn from(s: &String) -> Self {
        ProductId::parse(s)
    }
}

impl From<&ProductId> for ProductId {
    fn from(id: &ProductId) -> Self {
        id.clone()
    }
}

impl From<u64> for ProductId {
    fn from(i: u64) -> Self {
        ProductId(i.to_string())
    }
}

impl From<i64> for ProductId {
    fn from(i: i64) -> Self {
        ProductId(i.to_string())
    }
}

impl From<u32> for ProductId {
    fn from(i: u32) -> Self {
        ProductId(i.to_string())
    }
}

impl From<i32> for ProductId {
    fn from(i: i32) -> Self {
        ProductId(i.to_string())
    }
}

impl From<f64> for ProductId {
    fn from(f: f64) -> Self {
        if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
            ProductId((f as i64).to_string())
        } else {
            ProductId(f.to_string())
        }
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// A catalog row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Product {
    #[inline]
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        brand: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: brand.into(),
            price,
            category: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Project to the `{name, brand, price}` shape returned to callers
    #[inline]
    #[must_use]
    pub fn to_record(&self) -> RecommendationRecord {
        RecommendationRecord {
            name: self.name.clone(),
            brand: self.brand.clone(),
            price: self.price,
        }
    }
}

/// What a recommendation query hands back per product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationRecord {
    pub name: String,
    pub brand: String,
    pub price: f64,
}

/// A recommendation with the identifier and similarity score it was ranked by
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub product_id: ProductId,
    pub score: f64,
    #[serde(flatten)]
    pub record: RecommendationRecord,
}
