//! Local filtering/sorting of the fetched product catalog.

use anyhow::{bail, Result};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::format::normalize_token;
use crate::grocery::{Category, ProductItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    Name,
    PriceAsc,
    PriceDesc,
}

impl FromStr for ProductSort {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_lowercase().as_str() {
            "name" => ProductSort::Name,
            "price_asc" | "price-asc" => ProductSort::PriceAsc,
            "price_desc" | "price-desc" => ProductSort::PriceDesc,
            other => bail!("unknown product sort '{other}' (expected name, price_asc, price_desc)"),
        })
    }
}

/// `None` means "all" for category and store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub search: String,
    pub category: Option<Category>,
    pub store: Option<String>,
    pub sort: ProductSort,
}

/// Case-insensitive name ordering with the raw name as tie-breaker.
pub fn compare_names(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

pub fn filter_products(products: &[ProductItem], query: &ProductQuery) -> Vec<ProductItem> {
    let search = normalize_token(&query.search);
    let store = query.store.as_deref().map(normalize_token);

    let mut rows: Vec<ProductItem> = products
        .iter()
        .filter(|p| search.is_empty() || p.name.to_lowercase().contains(&search))
        .filter(|p| query.category.is_none_or(|c| p.category() == c))
        .filter(|p| store.as_ref().is_none_or(|s| normalize_token(&p.store) == *s))
        .cloned()
        .collect();

    match query.sort {
        ProductSort::PriceAsc => rows.sort_by(|a, b| a.unit_price().total_cmp(&b.unit_price())),
        ProductSort::PriceDesc => rows.sort_by(|a, b| b.unit_price().total_cmp(&a.unit_price())),
        ProductSort::Name => rows.sort_by(|a, b| compare_names(&a.name, &b.name)),
    }
    rows
}

/// Distinct normalized categories present in the catalog.
pub fn category_options(products: &[ProductItem]) -> Vec<Category> {
    let set: BTreeSet<Category> = products.iter().map(ProductItem::category).collect();
    let mut out: Vec<Category> = set.into_iter().collect();
    out.sort_by(|a, b| a.label().cmp(b.label()));
    out
}

/// Distinct non-blank store labels, alphabetical.
pub fn store_options(products: &[ProductItem]) -> Vec<String> {
    let set: BTreeSet<String> = products
        .iter()
        .map(|p| p.store.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let mut out: Vec<String> = set.into_iter().collect();
    out.sort_by(|a, b| compare_names(a, b));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<ProductItem> {
        vec![
            ProductItem::new("1", "Amul Milk", Category::Dairy, 68.0).with_store("BigBasket"),
            ProductItem::new("2", "Brown Bread", Category::Bakery, 45.0).with_store("Blinkit"),
            ProductItem::new("3", "almond milk", Category::Beverages, 199.0).with_store("bigbasket "),
            ProductItem::new("4", "Mystery", Category::Other, 10.0).with_store("  "),
        ]
    }

    #[test]
    fn test_search_and_name_sort() {
        let q = ProductQuery { search: "MILK".into(), ..Default::default() };
        let rows = filter_products(&catalog(), &q);
        let names: Vec<_> = rows.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["almond milk", "Amul Milk"]);
    }

    #[test]
    fn test_store_and_category_filters() {
        let q = ProductQuery { store: Some("BIGBASKET".into()), ..Default::default() };
        assert_eq!(filter_products(&catalog(), &q).len(), 2);

        let q = ProductQuery { category: Some(Category::Bakery), ..Default::default() };
        let rows = filter_products(&catalog(), &q);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "2");
    }

    #[test]
    fn test_price_sorts() {
        let q = ProductQuery { sort: ProductSort::PriceDesc, ..Default::default() };
        let ids: Vec<_> = filter_products(&catalog(), &q).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["3", "1", "2", "4"]);
    }

    #[test]
    fn test_options() {
        assert_eq!(
            category_options(&catalog()),
            vec![Category::Bakery, Category::Beverages, Category::Dairy, Category::Other]
        );
        assert_eq!(store_options(&catalog()), vec!["BigBasket", "bigbasket", "Blinkit"]);
    }
}
