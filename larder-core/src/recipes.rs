//! Recipe matching against pantry stock, plus the weekly meal plan.
//!
//! Matching is exact after lowercasing (no fuzzy/substring matching):
//! "Tomato" in the pantry satisfies "tomato" but not "Cherry Tomato".

use anyhow::{bail, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use crate::grocery::PantryItem;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DietTag {
    Vegetarian,
    HighProtein,
    LowCarb,
    GlutenFree,
}

impl DietTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            DietTag::Vegetarian => "vegetarian",
            DietTag::HighProtein => "high-protein",
            DietTag::LowCarb => "low-carb",
            DietTag::GlutenFree => "gluten-free",
        }
    }
}

/// `all` or a single diet tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DietFilter {
    #[default]
    All,
    Only(DietTag),
}

impl DietFilter {
    pub fn allows(&self, recipe: &Recipe) -> bool {
        match self {
            DietFilter::All => true,
            DietFilter::Only(tag) => recipe.diet.contains(tag),
        }
    }
}

impl FromStr for DietFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_lowercase().as_str() {
            "all" | "" => DietFilter::All,
            "vegetarian" => DietFilter::Only(DietTag::Vegetarian),
            "high-protein" => DietFilter::Only(DietTag::HighProtein),
            "low-carb" => DietFilter::Only(DietTag::LowCarb),
            "gluten-free" => DietFilter::Only(DietTag::GlutenFree),
            other => bail!(
                "unknown diet '{other}' (expected all, vegetarian, high-protein, low-carb, gluten-free)"
            ),
        })
    }
}

/// Static recipe definition. Not user data.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Recipe {
    pub id: &'static str,
    pub name: &'static str,
    pub diet: &'static [DietTag],
    pub calories: u32,
    pub protein_g: u32,
    pub ingredients: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecipeMatch {
    pub recipe: Recipe,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub matched_count: usize,
    pub total_count: usize,
    /// 0-100, rounded.
    pub match_percent: u32,
    pub pantry_ready: bool,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RecipeMatches {
    /// Every ingredient is in stock.
    pub cook_now: Vec<RecipeMatch>,
    /// At least one ingredient missing.
    pub need_items: Vec<RecipeMatch>,
    /// Both of the above, ranked by match percent DESC.
    pub all: Vec<RecipeMatch>,
}

/// Lowercased names of pantry items with quantity > 0.
pub fn pantry_lookup(pantry: &[PantryItem]) -> HashSet<String> {
    pantry
        .iter()
        .filter(|p| p.is_in_stock())
        .map(|p| p.item_name.to_lowercase())
        .collect()
}

/// Score one recipe against a pantry lookup set.
pub fn match_recipe(recipe: &Recipe, lookup: &HashSet<String>) -> RecipeMatch {
    let (matched, missing): (Vec<&str>, Vec<&str>) = recipe
        .ingredients
        .iter()
        .copied()
        .partition(|ing| lookup.contains(&ing.to_lowercase()));

    let total_count = recipe.ingredients.len();
    let match_percent = if total_count == 0 {
        0
    } else {
        ((matched.len() as f64 / total_count as f64) * 100.0).round() as u32
    };
    // An empty ingredient list is never vacuously ready.
    let pantry_ready = total_count > 0 && missing.is_empty();

    RecipeMatch {
        recipe: *recipe,
        matched_count: matched.len(),
        total_count,
        match_percent,
        pantry_ready,
        matched: matched.into_iter().map(str::to_string).collect(),
        missing: missing.into_iter().map(str::to_string).collect(),
    }
}

/// Filter the catalog by diet and name, score against the pantry, rank.
pub fn match_recipes(
    catalog: &[Recipe],
    pantry: &[PantryItem],
    diet: DietFilter,
    query: &str,
) -> RecipeMatches {
    let lookup = pantry_lookup(pantry);
    let query = query.trim().to_lowercase();

    let mut all: Vec<RecipeMatch> = catalog
        .iter()
        .filter(|r| diet.allows(r))
        .filter(|r| query.is_empty() || r.name.to_lowercase().contains(&query))
        .map(|r| match_recipe(r, &lookup))
        .collect();

    // Stable: ties keep catalog order.
    all.sort_by(|a, b| b.match_percent.cmp(&a.match_percent));

    let (cook_now, need_items) = all.iter().cloned().partition(|m| m.pantry_ready);
    RecipeMatches { cook_now, need_items, all }
}

/// Ingredients not already on the grocery list (exact, case-insensitive).
pub fn missing_ingredients_for<S: AsRef<str>>(recipe: &Recipe, grocery_names: &[S]) -> Vec<String> {
    let on_list: HashSet<String> = grocery_names
        .iter()
        .map(|n| n.as_ref().trim().to_lowercase())
        .collect();
    recipe
        .ingredients
        .iter()
        .filter(|ing| !on_list.contains(&ing.to_lowercase()))
        .map(|ing| ing.to_string())
        .collect()
}

pub fn find_recipe<'a>(catalog: &'a [Recipe], id_or_name: &str) -> Option<&'a Recipe> {
    let key = id_or_name.trim().to_lowercase();
    catalog
        .iter()
        .find(|r| r.id == key || r.name.to_lowercase() == key)
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// One planned recipe name per weekday.
///
/// Serialized as `{"Monday": "Dal Tadka", "Tuesday": "", ...}`; unknown keys
/// are ignored when reading and missing days stay unplanned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct MealPlan {
    days: [Option<String>; 7],
}

impl MealPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, day: Weekday) -> Option<&str> {
        self.days[day.num_days_from_monday() as usize].as_deref()
    }

    /// Blank names clear the slot.
    pub fn set(&mut self, day: Weekday, recipe_name: &str) {
        let name = recipe_name.trim();
        self.days[day.num_days_from_monday() as usize] =
            if name.is_empty() { None } else { Some(name.to_string()) };
    }

    /// Overlay the planned days of `other` onto this plan.
    pub fn merge(&mut self, other: &MealPlan) {
        for (slot, incoming) in self.days.iter_mut().zip(other.days.iter()) {
            if incoming.is_some() {
                *slot = incoming.clone();
            }
        }
    }

    /// Monday..Sunday with display names.
    pub fn entries(&self) -> Vec<(&'static str, Option<&str>)> {
        WEEK.iter().map(|d| (day_name(*d), self.get(*d))).collect()
    }
}

impl From<BTreeMap<String, String>> for MealPlan {
    fn from(map: BTreeMap<String, String>) -> Self {
        let mut plan = MealPlan::new();
        for (key, value) in map {
            if let Ok(day) = key.parse::<Weekday>() {
                plan.set(day, &value);
            }
        }
        plan
    }
}

impl From<MealPlan> for BTreeMap<String, String> {
    fn from(plan: MealPlan) -> Self {
        WEEK.iter()
            .map(|d| (day_name(*d).to_string(), plan.get(*d).unwrap_or("").to_string()))
            .collect()
    }
}
