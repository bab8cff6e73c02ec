//! Terminal rendering for command output.

use chrono::NaiveDate;
use chrono_tz::Tz;

use larder_core::aggregate::{budget_comparison, expiring_soon, group_by_category, low_stock};
use larder_core::format::{format_display_date, format_inr, format_quantity};
use larder_core::history::{average, MonthBucket, TrendPoint};
use larder_core::{
    BudgetProjection, GroceryItem, MealPlan, MonthlySummary, PantryItem, ProductItem,
    PurchaseRecord, RecipeMatch, RecipeMatches, Suggestion, SuggestionSource, EXPIRY_WINDOW_DAYS,
};

const BAR_WIDTH: f64 = 30.0;

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let n = ((value / max) * BAR_WIDTH).round().max(1.0) as usize;
    "█".repeat(n)
}

pub fn print_grocery(items: &[GroceryItem]) {
    if items.is_empty() {
        println!("Your grocery list is empty.");
        return;
    }
    for (category, group) in group_by_category(items) {
        println!("{category} ({})", group.len());
        for item in &group {
            println!(
                "  [{}] {}  {} x {} = {}",
                item.id,
                item.name,
                format_quantity(item.qty()),
                format_inr(item.unit_price()),
                format_inr(item.line_cost())
            );
        }
    }
    println!("\nTotal: {}", format_inr(larder_core::total_cost(items)));
}

pub fn print_pantry(items: &[PantryItem], today: NaiveDate) {
    if items.is_empty() {
        println!("Your pantry is empty.");
        return;
    }
    for item in items {
        let mut flags = Vec::new();
        if item.is_low_stock() {
            flags.push("low");
        }
        if item.expires_within(today, EXPIRY_WINDOW_DAYS) {
            flags.push("expiring");
        }
        let expiry = item
            .expiry_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let flags = if flags.is_empty() { String::new() } else { format!("  ({})", flags.join(", ")) };
        println!(
            "[{}] {}  qty {}  expires {}{}",
            item.id,
            item.item_name,
            format_quantity(item.qty()),
            expiry,
            flags
        );
    }
}

pub fn print_alerts(items: &[PantryItem], today: NaiveDate) {
    let low = low_stock(items);
    let expiring = expiring_soon(items, today, EXPIRY_WINDOW_DAYS);

    println!("Low stock ({}):", low.len());
    for item in &low {
        println!("  {}  qty {}", item.item_name, format_quantity(item.qty()));
    }
    println!("Expiring within {EXPIRY_WINDOW_DAYS} days ({}):", expiring.len());
    for item in &expiring {
        if let Some(d) = item.expiry_date {
            println!("  {}  {}", item.item_name, d.format("%Y-%m-%d"));
        }
    }
}

fn print_recipe_line(m: &RecipeMatch) {
    println!(
        "  [{}] {}  {}%  ({} kcal, {}g protein)",
        m.recipe.id, m.recipe.name, m.match_percent, m.recipe.calories, m.recipe.protein_g
    );
    if !m.missing.is_empty() {
        println!("      missing: {}", m.missing.join(", "));
    }
}

pub fn print_recipes(matches: &RecipeMatches) {
    println!("Cook now ({}):", matches.cook_now.len());
    for m in &matches.cook_now {
        print_recipe_line(m);
    }
    println!("Need items ({}):", matches.need_items.len());
    for m in &matches.need_items {
        print_recipe_line(m);
    }
}

pub struct BudgetView<'a> {
    pub limit: f64,
    pub pending: f64,
    pub projection: BudgetProjection,
    pub summary: Option<&'a MonthlySummary>,
    pub suggestions: &'a [GroceryItem],
}

pub fn print_budget(view: &BudgetView<'_>) {
    println!("Budget limit:       {}", format_inr(view.limit));
    println!(
        "This month so far:  {}",
        format_inr(view.summary.map(MonthlySummary::current).unwrap_or(0.0))
    );
    println!("Pending list:       {}", format_inr(view.pending));
    println!("Projected:          {}", format_inr(view.projection.projected));
    println!("Remaining:          {}", format_inr(view.projection.remaining));

    let comparison = budget_comparison(view.summary);
    let max = comparison.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    println!();
    for (label, value) in comparison {
        println!("{label:>9} {:>14} {}", format_inr(value), bar(value, max));
    }

    if view.projection.over_budget {
        println!(
            "\nOver budget by {}. Consider removing:",
            format_inr(-view.projection.remaining)
        );
        for item in view.suggestions {
            println!("  [{}] {}  {}", item.id, item.name, format_inr(item.line_cost()));
        }
    }
}

pub fn print_history(records: &[PurchaseRecord], tz: Tz) {
    if records.is_empty() {
        println!("No purchases match.");
        return;
    }
    for r in records {
        println!(
            "[{}] {}  {}  {} item(s)",
            r.id,
            format_display_date(r.purchase_date, tz),
            format_inr(r.amount()),
            r.items_snapshot.len()
        );
        for item in &r.items_snapshot {
            println!("    {} ({}) x {}", item.name, item.category(), format_quantity(item.qty()));
        }
    }
    println!("\n{} purchase(s), average {}", records.len(), format_inr(average(records)));
}

pub fn print_trends(months: &[MonthBucket], recent: &[TrendPoint]) {
    println!("Monthly spend:");
    let max = months.iter().map(|b| b.amount).fold(0.0, f64::max);
    for b in months {
        println!("  {} {} {:>14} {}", b.key, b.label, format_inr(b.amount), bar(b.amount, max));
    }

    println!("\nRecent purchases:");
    let max = recent.iter().map(|p| p.amount).fold(0.0, f64::max);
    for p in recent {
        println!("  {:>4} {} {:>14} {}", p.label, p.date, format_inr(p.amount), bar(p.amount, max));
    }
}

pub fn print_suggestion(query: &str, s: &Suggestion) {
    let source = match s.source {
        SuggestionSource::History => "your purchase history",
        SuggestionSource::LocalCatalog => "the product catalog",
        SuggestionSource::RemoteCatalog => "a catalog search",
        SuggestionSource::Heuristic => "name keywords",
    };
    println!("{}", s.canonical_name.as_deref().unwrap_or(query.trim()));
    println!("  category: {}", s.category);
    match s.price {
        Some(p) => println!("  price:    {}", format_inr(p)),
        None => println!("  price:    -"),
    }
    println!("  (from {source})");
}

pub fn print_products(products: &[ProductItem]) {
    if products.is_empty() {
        println!("No products match.");
        return;
    }
    for p in products {
        let store = if p.store.trim().is_empty() { "-" } else { p.store.trim() };
        println!("[{}] {}  {}  {}  {}", p.id, p.name, p.category(), format_inr(p.unit_price()), store);
    }
}

pub fn print_meal_plan(plan: &MealPlan) {
    for (day, recipe) in plan.entries() {
        println!("{day:<10} {}", recipe.unwrap_or("-"));
    }
}
