//! larder-core: Grocery, pantry and purchase types plus the derived views
//! computed from them (totals, budgets, recipe readiness, history series).

pub mod grocery;
pub mod format;
pub mod aggregate;
pub mod recipes;
pub mod recipe_catalog;
pub mod history;
pub mod products;
pub mod smart_fill;
pub mod validate;

pub use grocery::{
    Category, GroceryItem, GroceryItemPatch, MonthlySummary, NewGroceryItem, NewPantryItem,
    PantryCreateResponse, PantryItem, ProductItem, PurchaseRecord, Trend, LOW_STOCK_THRESHOLD,
};
pub use format::{finite_or_zero, format_display_date, format_inr, normalize_token};
pub use aggregate::{budget_projection, removal_suggestions, total_cost, BudgetProjection, EXPIRY_WINDOW_DAYS};
pub use recipes::{match_recipes, DietFilter, DietTag, MealPlan, Recipe, RecipeMatch, RecipeMatches};
pub use recipe_catalog::RECIPE_CATALOG;
pub use history::{filter_history, monthly_series, recent_trend, sort_history, HistoryFilter, SortMode};
pub use products::{filter_products, ProductQuery, ProductSort};
pub use smart_fill::{ProductSearch, SmartFill, Suggestion, SuggestionSource};
pub use validate::{DuplicateInPantry, ValidationError};

/// Keyword heuristic mapping a free-text item name to a category
pub mod categorizer {
    use once_cell::sync::Lazy;
    use regex::Regex;

    use super::Category;

    /// First matching pattern wins; order matters ("butter chicken" is Dairy).
    static RULES: Lazy<Vec<(Regex, Category)>> = Lazy::new(|| {
        [
            (r"milk|cheese|yogurt|butter|paneer", Category::Dairy),
            (r"bread|bun|cake|biscuit|rusk", Category::Bakery),
            (r"chicken|mutton|fish|egg|meat", Category::Meat),
            (r"frozen|ice cream|nugget|peas", Category::Frozen),
            (r"rice|flour|atta|oil|salt|sugar|dal|lentil|spice", Category::Pantry),
            (r"juice|cola|soda|water|tea|coffee", Category::Beverages),
            (r"chips|nacho|chocolate|cookie|snack", Category::Snacks),
        ]
        .into_iter()
        .filter_map(|(pattern, category)| Regex::new(pattern).ok().map(|re| (re, category)))
        .collect()
    });

    /// Guess a category from an item name; anything unrecognised is Produce.
    pub fn guess_category(name: &str) -> Category {
        let normalized = name.to_lowercase();
        RULES
            .iter()
            .find(|(re, _)| re.is_match(&normalized))
            .map(|(_, category)| *category)
            .unwrap_or(Category::Produce)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_guess_dairy() {
            assert_eq!(guess_category("Amul Paneer 200g"), Category::Dairy);
            assert_eq!(guess_category("Greek YOGURT"), Category::Dairy);
        }

        #[test]
        fn test_guess_first_rule_wins() {
            assert_eq!(guess_category("Butter Chicken"), Category::Dairy);
            assert_eq!(guess_category("Egg Bun"), Category::Bakery);
        }

        #[test]
        fn test_guess_pantry_and_beverages() {
            assert_eq!(guess_category("Basmati Rice"), Category::Pantry);
            assert_eq!(guess_category("Green Tea"), Category::Beverages);
            assert_eq!(guess_category("Frozen Peas"), Category::Frozen);
            assert_eq!(guess_category("Potato Chips"), Category::Snacks);
        }

        #[test]
        fn test_guess_default_produce() {
            assert_eq!(guess_category("Tomato"), Category::Produce);
            assert_eq!(guess_category(""), Category::Produce);
        }

        #[test]
        fn test_all_rules_compile() {
            assert_eq!(RULES.len(), 7);
        }
    }
}

pub use categorizer::guess_category;
