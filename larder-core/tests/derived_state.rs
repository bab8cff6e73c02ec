use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use larder_core::aggregate::{expiring_soon, group_by_category, low_stock, EXPIRY_WINDOW_DAYS};
use larder_core::history::average;
use larder_core::{
    budget_projection, filter_history, match_recipes, monthly_series, removal_suggestions,
    sort_history, total_cost, Category, DietFilter, GroceryItem, HistoryFilter, PantryItem,
    PurchaseRecord, Recipe, SortMode, RECIPE_CATALOG,
};

const CURRY: Recipe = Recipe {
    id: "curry",
    name: "Simple Paneer Curry",
    diet: &[],
    calories: 400,
    protein_g: 20,
    ingredients: &["Paneer", "Tomato", "Onion", "Spices"],
};

const EMPTY: Recipe = Recipe {
    id: "empty",
    name: "Air",
    diet: &[],
    calories: 0,
    protein_g: 0,
    ingredients: &[],
};

fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn grocery_list() -> Vec<GroceryItem> {
    let mut unknown = GroceryItem::new("g4", "Dish Soap", Category::Other).with_price(85.0);
    unknown.category = "Household".to_string();
    vec![
        GroceryItem::new("g1", "Milk", Category::Dairy).with_quantity(2.0).with_price(30.0),
        GroceryItem::new("g2", "Onion", Category::Produce).with_quantity(1.5).with_price(40.0),
        GroceryItem::new("g3", "Paneer", Category::Dairy).with_price(90.0),
        unknown,
    ]
}

fn three_records() -> Vec<PurchaseRecord> {
    vec![
        PurchaseRecord::new("jan", 500.0, day(2024, 1, 10)),
        PurchaseRecord::new("feb", 1200.0, day(2024, 2, 5)),
        PurchaseRecord::new("mar", 300.0, day(2024, 3, 1)),
    ]
}

#[test]
fn total_cost_is_sum_of_line_costs() {
    let items = grocery_list();
    let expected: f64 = items.iter().map(|i| i.unit_price() * i.qty()).sum();
    assert_eq!(total_cost(&items), expected);
    assert_eq!(total_cost(&items), 60.0 + 60.0 + 90.0 + 85.0);
    assert_eq!(total_cost(&[]), 0.0);
}

#[test]
fn total_cost_treats_missing_and_non_finite_as_zero() {
    let mut items = grocery_list();
    items[0].price = None;
    items[1].quantity = Some(f64::NAN);
    items[2].price = Some(f64::INFINITY);
    assert_eq!(total_cost(&items), 85.0);
}

#[test]
fn group_by_category_partitions_every_item_once() {
    let items = grocery_list();
    let groups = group_by_category(&items);

    let mut seen: Vec<&str> = groups.values().flatten().map(|i| i.id.as_str()).collect();
    seen.sort();
    assert_eq!(seen, ["g1", "g2", "g3", "g4"]);

    let dairy: Vec<_> = groups[&Category::Dairy].iter().map(|i| i.id.as_str()).collect();
    assert_eq!(dairy, ["g1", "g3"]);
    assert_eq!(groups[&Category::Other][0].name, "Dish Soap");
}

#[test]
fn expiring_soon_is_a_closed_window() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let pantry = vec![
        PantryItem::new("today", "Curd", 1.0).with_expiry(today),
        PantryItem::new("plus3", "Bread", 1.0).with_expiry(NaiveDate::from_ymd_opt(2024, 6, 13).unwrap()),
        PantryItem::new("plus4", "Eggs", 1.0).with_expiry(NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()),
        PantryItem::new("none", "Rice", 1.0),
    ];
    let ids: Vec<_> = expiring_soon(&pantry, today, EXPIRY_WINDOW_DAYS)
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, ["today", "plus3"]);
}

#[test]
fn low_stock_threshold_is_two() {
    let pantry: Vec<_> = [0.0, 1.0, 2.0, 3.0]
        .iter()
        .map(|q| PantryItem::new(format!("q{q}"), "Item", *q))
        .collect();
    let ids: Vec<_> = low_stock(&pantry).into_iter().map(|p| p.id).collect();
    assert_eq!(ids, ["q0", "q1", "q2"]);
}

#[test]
fn recipe_moves_to_cook_now_when_pantry_completes() {
    let mut pantry = vec![
        PantryItem::new("1", "Paneer", 1.0),
        PantryItem::new("2", "tomato", 4.0),
        PantryItem::new("3", "Onion", 2.0),
    ];
    let result = match_recipes(&[CURRY], &pantry, DietFilter::All, "");
    assert!(result.cook_now.is_empty());
    let m = &result.need_items[0];
    assert_eq!(m.matched_count, 3);
    assert_eq!(m.missing, ["Spices"]);
    assert_eq!(m.match_percent, 75);

    pantry.push(PantryItem::new("4", "Spices", 1.0));
    let result = match_recipes(&[CURRY], &pantry, DietFilter::All, "");
    assert!(result.need_items.is_empty());
    assert_eq!(result.cook_now[0].match_percent, 100);
}

#[test]
fn out_of_stock_pantry_items_do_not_match() {
    let pantry = vec![PantryItem::new("1", "Spices", 0.0)];
    let result = match_recipes(&[CURRY], &pantry, DietFilter::All, "");
    assert_eq!(result.all[0].matched_count, 0);
}

#[test]
fn recipe_without_ingredients_is_never_ready() {
    let result = match_recipes(&[EMPTY], &[], DietFilter::All, "");
    assert!(result.cook_now.is_empty());
    assert_eq!(result.need_items[0].match_percent, 0);
}

#[test]
fn history_min_amount_then_highest() {
    let filter = HistoryFilter { min_amount: Some(400.0), ..Default::default() };
    let rows = filter_history(&three_records(), &filter, chrono_tz::Asia::Kolkata);
    assert_eq!(rows.len(), 2);
    let totals: Vec<f64> = sort_history(&rows, SortMode::Highest)
        .iter()
        .map(PurchaseRecord::amount)
        .collect();
    assert_eq!(totals, [1200.0, 500.0]);
}

#[test]
fn monthly_series_is_fixed_length() {
    let reference = day(2024, 3, 15);
    let series = monthly_series(&three_records(), 6, reference);
    assert_eq!(series.len(), 6);
    assert_eq!(series.iter().map(|b| b.amount).sum::<f64>(), 2000.0);

    let empty = monthly_series(&[], 6, reference);
    assert_eq!(empty.len(), 6);
    assert!(empty.iter().all(|b| b.amount == 0.0));

    // records outside the window are not counted
    let narrow = monthly_series(&three_records(), 2, reference);
    assert_eq!(narrow.iter().map(|b| b.amount).sum::<f64>(), 1500.0);
}

#[test]
fn average_of_nothing_is_zero() {
    assert_eq!(average(&[]), 0.0);
    assert!(!average(&[]).is_nan());
}

#[test]
fn budget_projection_over_budget() {
    let p = budget_projection(2000.0, 800.0, 2500.0);
    assert_eq!(p.projected, 2800.0);
    assert_eq!(p.remaining, -300.0);
    assert!(p.over_budget);
}

#[test]
fn derived_views_are_idempotent_and_leave_inputs_alone() {
    let items = grocery_list();
    let pantry = vec![
        PantryItem::new("1", "Onion", 3.0),
        PantryItem::new("2", "Paneer", 1.0).with_expiry(NaiveDate::from_ymd_opt(2024, 6, 11).unwrap()),
    ];
    let records = three_records();
    let items_before = items.clone();
    let pantry_before = pantry.clone();
    let records_before = records.clone();

    assert_eq!(group_by_category(&items), group_by_category(&items));
    assert_eq!(
        removal_suggestions(&items, &pantry, 100.0),
        removal_suggestions(&items, &pantry, 100.0)
    );
    assert_eq!(
        match_recipes(RECIPE_CATALOG, &pantry, DietFilter::All, ""),
        match_recipes(RECIPE_CATALOG, &pantry, DietFilter::All, "")
    );
    let filter = HistoryFilter { text_query: Some("2024".into()), ..Default::default() };
    let tz = chrono_tz::Asia::Kolkata;
    assert_eq!(filter_history(&records, &filter, tz), filter_history(&records, &filter, tz));
    assert_eq!(
        sort_history(&records, SortMode::Lowest),
        sort_history(&records, SortMode::Lowest)
    );
    let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    assert_eq!(expiring_soon(&pantry, today, 3), expiring_soon(&pantry, today, 3));

    assert_eq!(items, items_before);
    assert_eq!(pantry, pantry_before);
    assert_eq!(records, records_before);
}
