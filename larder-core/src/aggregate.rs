//! Aggregation over the live grocery list and pantry.
//!
//! Everything here is a pure projection of the latest fetched snapshot:
//! inputs are borrowed, outputs are fresh values, nothing is cached.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::format::finite_or_zero;
use crate::grocery::{Category, GroceryItem, MonthlySummary, PantryItem};

/// Days ahead (inclusive) that count as "expiring soon".
pub const EXPIRY_WINDOW_DAYS: i64 = 3;

/// Sum of price x quantity over the list.
pub fn total_cost(items: &[GroceryItem]) -> f64 {
    items.iter().map(GroceryItem::line_cost).sum()
}

/// Partition by normalized category, keeping input order inside each group.
pub fn group_by_category(items: &[GroceryItem]) -> BTreeMap<Category, Vec<GroceryItem>> {
    let mut groups: BTreeMap<Category, Vec<GroceryItem>> = BTreeMap::new();
    for item in items {
        groups.entry(item.category()).or_default().push(item.clone());
    }
    groups
}

pub fn low_stock(pantry: &[PantryItem]) -> Vec<PantryItem> {
    pantry.iter().filter(|p| p.is_low_stock()).cloned().collect()
}

/// Items whose expiry falls within `[today, today + window_days]`.
pub fn expiring_soon(pantry: &[PantryItem], today: NaiveDate, window_days: i64) -> Vec<PantryItem> {
    pantry
        .iter()
        .filter(|p| p.expires_within(today, window_days))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetProjection {
    pub projected: f64,
    pub remaining: f64,
    pub over_budget: bool,
}

pub fn budget_projection(
    current_month_total: f64,
    pending_list_total: f64,
    budget_limit: f64,
) -> BudgetProjection {
    let projected = finite_or_zero(current_month_total) + finite_or_zero(pending_list_total);
    let remaining = finite_or_zero(budget_limit) - projected;
    BudgetProjection {
        projected,
        remaining,
        over_budget: remaining < 0.0,
    }
}

/// Previous vs current month, in chart order.
pub fn budget_comparison(summary: Option<&MonthlySummary>) -> [(&'static str, f64); 2] {
    [
        ("Previous", summary.map(MonthlySummary::previous).unwrap_or(0.0)),
        ("Current", summary.map(MonthlySummary::current).unwrap_or(0.0)),
    ]
}

/// Names of pantry items that are actually in stock, as lookup keys.
pub fn in_stock_names(pantry: &[PantryItem]) -> HashSet<String> {
    pantry
        .iter()
        .filter(|p| p.is_in_stock())
        .map(PantryItem::name_key)
        .collect()
}

/// Pick grocery items to drop so the list sheds at least `amount_to_recover`.
///
/// Ranking:
/// - items already stocked in the pantry first (avoid re-buying owned stock)
/// - then line cost DESC
/// - ties keep input order
///
/// The target is capped at the list's own total.
pub fn removal_suggestions(
    grocery: &[GroceryItem],
    pantry: &[PantryItem],
    amount_to_recover: f64,
) -> Vec<GroceryItem> {
    let needed = finite_or_zero(amount_to_recover).min(total_cost(grocery));
    if grocery.is_empty() || needed <= 0.0 {
        return vec![];
    }

    let stocked = in_stock_names(pantry);
    let mut ranked: Vec<(&GroceryItem, bool, f64)> = grocery
        .iter()
        .map(|g| (g, stocked.contains(&g.name_key()), g.line_cost()))
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.2.total_cmp(&a.2)));

    let mut picks = Vec::new();
    let mut recovered = 0.0;
    for (item, _, cost) in ranked {
        picks.push(item.clone());
        recovered += cost;
        if recovered >= needed {
            break;
        }
    }
    picks
}

/// In-stock pantry entry with exactly this (case-insensitive) name.
pub fn pantry_duplicate<'a>(name: &str, pantry: &'a [PantryItem]) -> Option<&'a PantryItem> {
    let key = name.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }
    pantry.iter().find(|p| p.is_in_stock() && p.name_key() == key)
}

/// How many list items are ticked off in shopping mode.
pub fn checked_count(items: &[GroceryItem], checked: &HashSet<String>) -> usize {
    items.iter().filter(|i| checked.contains(&i.id)).count()
}

/// Shopping progress, 0-100, rounded; 0 for an empty list.
pub fn completion_percent(items: &[GroceryItem], checked: &HashSet<String>) -> u32 {
    if items.is_empty() {
        return 0;
    }
    let done = checked_count(items, checked) as f64;
    ((done / items.len() as f64) * 100.0).round() as u32
}
