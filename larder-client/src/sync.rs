//! Loading the user's data snapshot and the mutating actions built on it.

use anyhow::{bail, Result};
use serde::Serialize;
use tokio::task::JoinSet;

use larder_core::categorizer::guess_category;
use larder_core::recipes::missing_ingredients_for;
use larder_core::validate::{check_pantry_duplicate, parse_price, parse_quantity, require_name};
use larder_core::{
    total_cost, Category, GroceryItem, MonthlySummary, NewGroceryItem, PantryItem, ProductItem,
    PurchaseRecord, Recipe,
};

use crate::api::{ApiClient, ApiError};
use crate::cache::LocalCache;

/// Everything the derived views are computed from.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub grocery: Vec<GroceryItem>,
    pub pantry: Vec<PantryItem>,
    pub history: Vec<PurchaseRecord>,
    pub summary: Option<MonthlySummary>,
    /// History came from the local cache because the fetch failed.
    pub history_from_cache: bool,
    /// Informational message for a recovered load failure.
    pub notice: Option<String>,
}

/// Fetch list, pantry, history and summary together. A failure is never
/// fatal: the last cached history is shown instead, with a notice.
pub async fn load_snapshot(api: &ApiClient, cache: &LocalCache, user_id: &str) -> Snapshot {
    let fetched = tokio::try_join!(
        api.list_grocery(),
        api.list_pantry(),
        api.purchase_history(),
        api.monthly_summary(),
    );

    match fetched {
        Ok((grocery, pantry, history, summary)) => {
            cache.write_history(user_id, &history);
            tracing::debug!(
                user_id = %user_id,
                grocery = grocery.len(),
                pantry = pantry.len(),
                history = history.len(),
                "snapshot loaded"
            );
            Snapshot {
                grocery,
                pantry,
                history,
                summary,
                history_from_cache: false,
                notice: None,
            }
        }
        Err(e) => fallback_snapshot(cache, user_id, &e),
    }
}

fn fallback_snapshot(cache: &LocalCache, user_id: &str, error: &ApiError) -> Snapshot {
    tracing::warn!(user_id = %user_id, error = %error, "snapshot load failed; using cached history");
    let history = cache.read_history(user_id);
    Snapshot {
        history_from_cache: !history.is_empty(),
        history,
        notice: Some(format!("{error} Showing your last saved purchase history.")),
        ..Snapshot::default()
    }
}

/// Product catalog, loaded on its own so catalog outages never block the
/// rest of the app. Failure yields an empty catalog.
pub async fn load_catalog(api: &ApiClient, limit: usize) -> Vec<ProductItem> {
    match api.products(limit).await {
        Ok(products) => products,
        Err(e) => {
            tracing::warn!(error = %e, "product catalog unavailable");
            Vec::new()
        }
    }
}

/// Raw user input for a new grocery line.
#[derive(Debug, Clone, Default)]
pub struct GroceryDraft {
    pub name: String,
    /// `None` lets the keyword categorizer pick.
    pub category: Option<Category>,
    pub quantity: String,
    pub price: String,
}

/// Validate a draft before anything is sent. Fails with
/// [`larder_core::ValidationError`] or [`larder_core::DuplicateInPantry`].
pub fn prepare_grocery_item(
    draft: &GroceryDraft,
    pantry: &[PantryItem],
    allow_duplicate: bool,
) -> Result<NewGroceryItem> {
    let name = require_name(&draft.name)?;
    let quantity = parse_quantity(&draft.quantity)?;
    let price = parse_price(&draft.price)?;
    check_pantry_duplicate(&name, pantry, allow_duplicate)?;

    let category = draft.category.unwrap_or_else(|| guess_category(&name));
    Ok(NewGroceryItem {
        name,
        category,
        quantity,
        price,
    })
}

pub async fn add_grocery_item(
    api: &ApiClient,
    draft: &GroceryDraft,
    pantry: &[PantryItem],
    allow_duplicate: bool,
) -> Result<NewGroceryItem> {
    let item = prepare_grocery_item(draft, pantry, allow_duplicate)?;
    api.create_grocery(&item).await?;
    tracing::info!(name = %item.name, category = %item.category, "added grocery item");
    Ok(item)
}

/// One quantity-1, unpriced line per ingredient not already on the list.
pub fn missing_ingredient_items(recipe: &Recipe, grocery: &[GroceryItem]) -> Vec<NewGroceryItem> {
    let names: Vec<&str> = grocery.iter().map(|g| g.name.as_str()).collect();
    missing_ingredients_for(recipe, &names)
        .into_iter()
        .map(|name| NewGroceryItem {
            category: guess_category(&name),
            name,
            quantity: 1.0,
            price: 0.0,
        })
        .collect()
}

/// Post every missing ingredient concurrently; returns what was added.
pub async fn add_missing_ingredients(
    api: &ApiClient,
    recipe: &Recipe,
    grocery: &[GroceryItem],
) -> Result<Vec<NewGroceryItem>> {
    let items = missing_ingredient_items(recipe, grocery);
    if items.is_empty() {
        return Ok(items);
    }

    let mut set = JoinSet::new();
    for item in items.iter().cloned() {
        let api = api.clone();
        set.spawn(async move { api.create_grocery(&item).await });
    }
    while let Some(joined) = set.join_next().await {
        joined??;
    }

    tracing::info!(recipe = recipe.name, added = items.len(), "added missing ingredients");
    Ok(items)
}

/// Finalize the current list; returns the total that was recorded.
pub async fn finalize_purchase(api: &ApiClient, grocery: &[GroceryItem]) -> Result<f64> {
    if grocery.is_empty() {
        bail!("Add items to your grocery list before finalizing.");
    }
    let total = total_cost(grocery);
    api.finalize().await?;
    tracing::info!(total, items = grocery.len(), "purchase finalized");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::{DuplicateInPantry, ValidationError, RECIPE_CATALOG};

    fn draft(name: &str) -> GroceryDraft {
        GroceryDraft {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_prepare_defaults_and_guess() {
        let item = prepare_grocery_item(&draft("  Toned Milk "), &[], false).unwrap();
        assert_eq!(item.name, "Toned Milk");
        assert_eq!(item.category, Category::Dairy);
        assert_eq!(item.quantity, 1.0);
        assert_eq!(item.price, 0.0);
    }

    #[test]
    fn test_prepare_explicit_category_wins() {
        let d = GroceryDraft {
            category: Some(Category::Snacks),
            quantity: "3".into(),
            price: "20".into(),
            ..draft("Milk Bikis")
        };
        let item = prepare_grocery_item(&d, &[], false).unwrap();
        assert_eq!(item.category, Category::Snacks);
        assert_eq!(item.quantity, 3.0);
    }

    #[test]
    fn test_prepare_rejects_before_any_request() {
        let err = prepare_grocery_item(&draft(" "), &[], false).unwrap_err();
        assert_eq!(err.downcast_ref::<ValidationError>(), Some(&ValidationError::EmptyName));

        let d = GroceryDraft { price: "abc".into(), ..draft("Milk") };
        let err = prepare_grocery_item(&d, &[], false).unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
    }

    #[test]
    fn test_prepare_blocks_pantry_duplicate_unless_allowed() {
        let pantry = vec![PantryItem::new("p1", "Rice", 5.0)];
        let err = prepare_grocery_item(&draft("rice"), &pantry, false).unwrap_err();
        assert!(err.downcast_ref::<DuplicateInPantry>().is_some());
        assert!(prepare_grocery_item(&draft("rice"), &pantry, true).is_ok());
    }

    #[test]
    fn test_missing_ingredient_items() {
        let recipe = RECIPE_CATALOG
            .iter()
            .find(|r| r.name == "Paneer Bhurji")
            .unwrap();
        let grocery = vec![
            GroceryItem::new("g1", "paneer", Category::Dairy),
            GroceryItem::new("g2", "Onion", Category::Produce),
        ];
        let items = missing_ingredient_items(recipe, &grocery);
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Tomato", "Spices", "Oil"]);
        assert!(items.iter().all(|i| i.quantity == 1.0 && i.price == 0.0));
        assert_eq!(items[2].category, Category::Pantry);
    }

    #[test]
    fn test_fallback_uses_cached_history() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        let err = ApiError::Status { status: 503, message: "Service down.".into() };

        let snap = fallback_snapshot(&cache, "u1", &err);
        assert!(!snap.history_from_cache);
        assert_eq!(snap.notice.as_deref(), Some("Service down. Showing your last saved purchase history."));

        let record = PurchaseRecord::new(
            "h1",
            250.0,
            chrono::Utc::now(),
        );
        cache.write_history("u1", &[record]);
        let snap = fallback_snapshot(&cache, "u1", &err);
        assert!(snap.history_from_cache);
        assert_eq!(snap.history.len(), 1);
        assert!(snap.grocery.is_empty());
    }
}
