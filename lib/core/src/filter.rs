// Catalog row selection
use crate::{Product, ProductId};
use ahash::AHashSet;

/// Condition a catalog row must meet to be selected
#[derive(Debug, Clone)]
pub(crate) enum FilterCondition<'a> {
    Category(&'a str),
    Ids(AHashSet<&'a ProductId>),
}

impl FilterCondition<'_> {
    pub(crate) fn matches(&self, product: &Product) -> bool {
        match self {
            FilterCondition::Category(category) => product.category.as_deref() == Some(*category),
            FilterCondition::Ids(ids) => ids.contains(&product.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, category: Option<&str>) -> Product {
        let p = Product::new(id, format!("name {}", id), "Acme", 10.0);
        match category {
            Some(c) => p.with_category(c),
            None => p,
        }
    }

    #[test]
    fn test_category_condition_ignores_missing_category() {
        let cond = FilterCondition::Category("Skincare");
        assert!(cond.matches(&product("1", Some("Skincare"))));
        assert!(!cond.matches(&product("2", Some("Makeup"))));
        assert!(!cond.matches(&product("3", None)));
    }

    #[test]
    fn test_ids_condition_uses_canonical_ids() {
        let wanted = [ProductId::from(7u64), ProductId::from("9.0")];
        let cond = FilterCondition::Ids(wanted.iter().collect());
        assert!(cond.matches(&product("7", None)));
        assert!(cond.matches(&product("9", None)));
        assert!(!cond.matches(&product("8", None)));
    }
}
