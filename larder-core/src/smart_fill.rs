//! Smart-fill: suggest a category and price for a partially typed item name.
//!
//! Sources are tried in strict priority order and the first hit wins:
//! 1) the user's own purchase history
//! 2) the locally cached product catalog
//! 3) a remote catalog search (network; failures count as "no match")
//! 4) the keyword categorizer, which always answers

use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashSet;

use crate::categorizer::guess_category;
use crate::grocery::{Category, GroceryItem, ProductItem, PurchaseRecord};
use crate::products::compare_names;
use crate::validate::ValidationError;

/// Hints shown per source.
pub const HINT_LIMIT: usize = 4;
/// Results requested from the remote catalog.
pub const REMOTE_LIMIT: usize = 8;

/// Remote product search seam (implemented over the REST client).
pub trait ProductSearch {
    fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<ProductItem>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    History,
    LocalCatalog,
    RemoteCatalog,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub category: Category,
    /// Only present when the source had a positive price.
    pub price: Option<f64>,
    /// Catalog sources may replace the typed name with the catalog's.
    pub canonical_name: Option<String>,
    pub source: SuggestionSource,
}

impl Suggestion {
    fn from_history(item: &GroceryItem) -> Self {
        Self {
            category: item.category(),
            price: positive(item.unit_price()),
            canonical_name: None,
            source: SuggestionSource::History,
        }
    }

    fn from_product(product: &ProductItem, source: SuggestionSource) -> Self {
        Self {
            category: product.category(),
            price: positive(product.unit_price()),
            canonical_name: Some(product.name.clone()),
            source,
        }
    }
}

fn positive(v: f64) -> Option<f64> {
    (v > 0.0).then_some(v)
}

/// Past snapshot items whose name contains `query`, most recent first,
/// one per distinct (lowercased) name.
///
/// Recency is the item's own `created_at`, falling back to the purchase
/// date; ties go to the more recent purchase.
pub fn history_hints(query: &str, records: &[PurchaseRecord], limit: usize) -> Vec<GroceryItem> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return vec![];
    }

    let mut candidates: Vec<(&GroceryItem, &PurchaseRecord)> = records
        .iter()
        .flat_map(|r| r.items_snapshot.iter().map(move |i| (i, r)))
        .filter(|(i, _)| i.name.to_lowercase().contains(&q))
        .collect();

    candidates.sort_by_key(|(i, r)| {
        (
            Reverse(i.created_at.unwrap_or(r.purchase_date)),
            Reverse(r.purchase_date),
        )
    });

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|(i, _)| seen.insert(i.name.to_lowercase()))
        .take(limit)
        .map(|(i, _)| i.clone())
        .collect()
}

/// Catalog products containing `query`; prefix matches first, then
/// alphabetical.
pub fn catalog_hints(query: &str, products: &[ProductItem], limit: usize) -> Vec<ProductItem> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return vec![];
    }

    let matching = products.iter().filter(|p| p.name.to_lowercase().contains(&q)).collect();
    rank_by_prefix(&q, matching).into_iter().take(limit).cloned().collect()
}

/// Remote results are already matched server-side, so they are only ordered.
pub fn remote_hints(query: &str, found: &[ProductItem]) -> Vec<ProductItem> {
    let q = query.trim().to_lowercase();
    rank_by_prefix(&q, found.iter().collect()).into_iter().cloned().collect()
}

fn rank_by_prefix<'a>(q: &str, mut ranked: Vec<&'a ProductItem>) -> Vec<&'a ProductItem> {
    ranked.sort_by(|a, b| {
        let a_starts = a.name.to_lowercase().starts_with(q);
        let b_starts = b.name.to_lowercase().starts_with(q);
        b_starts
            .cmp(&a_starts)
            .then_with(|| compare_names(&a.name, &b.name))
    });
    ranked
}

/// Resolution chain over one snapshot of user data.
pub struct SmartFill<'a> {
    pub history: &'a [PurchaseRecord],
    pub catalog: &'a [ProductItem],
    pub remote: Option<&'a dyn ProductSearch>,
    pub remote_limit: usize,
}

impl<'a> SmartFill<'a> {
    pub fn new(history: &'a [PurchaseRecord], catalog: &'a [ProductItem]) -> Self {
        Self {
            history,
            catalog,
            remote: None,
            remote_limit: REMOTE_LIMIT,
        }
    }

    pub fn with_remote(mut self, remote: &'a dyn ProductSearch) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_remote_limit(mut self, limit: usize) -> Self {
        self.remote_limit = limit;
        self
    }

    /// Always produces a suggestion for a non-blank query.
    pub fn resolve(&self, query: &str) -> Result<Suggestion, ValidationError> {
        let q = query.trim();
        if q.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }

        if let Some(item) = history_hints(q, self.history, 1).first() {
            tracing::debug!(query = q, name = %item.name, "smart-fill: history match");
            return Ok(Suggestion::from_history(item));
        }

        if let Some(product) = catalog_hints(q, self.catalog, 1).first() {
            tracing::debug!(query = q, name = %product.name, "smart-fill: catalog match");
            return Ok(Suggestion::from_product(product, SuggestionSource::LocalCatalog));
        }

        if let Some(remote) = self.remote {
            match remote.search(q, self.remote_limit) {
                Ok(found) => {
                    if let Some(product) = remote_hints(q, &found).first() {
                        tracing::debug!(query = q, name = %product.name, "smart-fill: remote match");
                        return Ok(Suggestion::from_product(product, SuggestionSource::RemoteCatalog));
                    }
                }
                Err(e) => {
                    tracing::warn!(query = q, error = %e, "smart-fill: remote search failed; falling back");
                }
            }
        }

        Ok(Suggestion {
            category: guess_category(q),
            price: None,
            canonical_name: None,
            source: SuggestionSource::Heuristic,
        })
    }
}
