//! Grocery, pantry and purchase-history record types as served by the backend.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::format::amount;

/// Quantity at or below which a pantry item counts as low stock.
pub const LOW_STOCK_THRESHOLD: f64 = 2.0;

/// Fixed grocery categories, in display order.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Produce,
    Dairy,
    Bakery,
    Meat,
    Frozen,
    Pantry,
    Beverages,
    Snacks,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Produce,
        Category::Dairy,
        Category::Bakery,
        Category::Meat,
        Category::Frozen,
        Category::Pantry,
        Category::Beverages,
        Category::Snacks,
        Category::Other,
    ];

    /// Display label, identical to the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Produce => "Produce",
            Category::Dairy => "Dairy",
            Category::Bakery => "Bakery",
            Category::Meat => "Meat",
            Category::Frozen => "Frozen",
            Category::Pantry => "Pantry",
            Category::Beverages => "Beverages",
            Category::Snacks => "Snacks",
            Category::Other => "Other",
        }
    }

    /// Case-insensitive lookup; anything unrecognised lands in `Other`.
    pub fn normalize(raw: &str) -> Category {
        let wanted = raw.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == wanted)
            .unwrap_or(Category::Other)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Category::normalize(raw.as_deref().unwrap_or("")))
    }
}

/// A to-buy entry on the live grocery list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroceryItem {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    /// Raw category as stored by the backend; see [`GroceryItem::category`].
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl GroceryItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            user_id: String::new(),
            name: name.into(),
            category: category.label().to_string(),
            quantity: Some(1.0),
            price: Some(0.0),
            created_at: None,
        }
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn category(&self) -> Category {
        Category::normalize(&self.category)
    }

    pub fn qty(&self) -> f64 {
        amount(self.quantity)
    }

    pub fn unit_price(&self) -> f64 {
        amount(self.price)
    }

    /// price x quantity; never cached.
    pub fn line_cost(&self) -> f64 {
        self.unit_price() * self.qty()
    }

    /// Lookup key used for pantry and recipe comparisons.
    pub fn name_key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

/// An owned-stock entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PantryItem {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub item_name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl PantryItem {
    pub fn new(id: impl Into<String>, item_name: impl Into<String>, quantity: f64) -> Self {
        Self {
            id: id.into(),
            user_id: String::new(),
            item_name: item_name.into(),
            quantity: Some(quantity),
            expiry_date: None,
            created_at: None,
        }
    }

    pub fn with_expiry(mut self, expiry: NaiveDate) -> Self {
        self.expiry_date = Some(expiry);
        self
    }

    pub fn qty(&self) -> f64 {
        amount(self.quantity)
    }

    pub fn is_low_stock(&self) -> bool {
        self.qty() <= LOW_STOCK_THRESHOLD
    }

    pub fn is_in_stock(&self) -> bool {
        self.qty() > 0.0
    }

    /// True when the expiry date falls in `[today, today + window_days]`.
    /// A missing expiry never matches.
    pub fn expires_within(&self, today: NaiveDate, window_days: i64) -> bool {
        let Some(expiry) = self.expiry_date else {
            return false;
        };
        let last = today + Duration::days(window_days);
        expiry >= today && expiry <= last
    }

    pub fn name_key(&self) -> String {
        self.item_name.trim().to_lowercase()
    }
}

/// A finalized purchase with a frozen copy of the list at finalize time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseRecord {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_amount: Option<f64>,
    pub purchase_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items_snapshot: Vec<GroceryItem>,
}

impl PurchaseRecord {
    pub fn new(id: impl Into<String>, total_amount: f64, purchase_date: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            user_id: String::new(),
            total_amount: Some(total_amount),
            purchase_date,
            items_snapshot: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: Vec<GroceryItem>) -> Self {
        self.items_snapshot = items;
        self
    }

    pub fn amount(&self) -> f64 {
        amount(self.total_amount)
    }

    /// Calendar date of the purchase in UTC.
    pub fn iso_date(&self) -> NaiveDate {
        self.purchase_date.date_naive()
    }
}

/// A read-only entry from the external product catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub store: String,
}

impl ProductItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.label().to_string(),
            price: Some(price),
            brand: None,
            store: String::new(),
        }
    }

    pub fn with_store(mut self, store: impl Into<String>) -> Self {
        self.store = store.into();
        self
    }

    pub fn category(&self) -> Category {
        Category::normalize(&self.category)
    }

    pub fn unit_price(&self) -> f64 {
        amount(self.price)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub enum Trend {
    #[serde(rename = "up")]
    Up,
    #[serde(rename = "down")]
    Down,
    /// Missing or unrecognised.
    #[default]
    #[serde(rename = "flat")]
    Flat,
}

impl<'de> Deserialize<'de> for Trend {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
            Some(NumberOrText::Text(s)) if s.trim() == "up" => Trend::Up,
            Some(NumberOrText::Text(s)) if s.trim() == "down" => Trend::Down,
            _ => Trend::Flat,
        })
    }
}

/// Server-computed month-over-month spending summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlySummary {
    #[serde(default, deserialize_with = "lenient_number")]
    pub current_month_total: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub previous_month_total: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub change_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub savings: Option<f64>,
    #[serde(default)]
    pub trend: Trend,
}

impl MonthlySummary {
    pub fn current(&self) -> f64 {
        amount(self.current_month_total)
    }

    pub fn previous(&self) -> f64 {
        amount(self.previous_month_total)
    }
}

/// Body for `POST /api/grocery-items`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewGroceryItem {
    pub name: String,
    pub category: Category,
    pub quantity: f64,
    pub price: f64,
}

/// Body for `PATCH /api/grocery-items/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GroceryItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Body for `POST /api/pantry` and `PATCH /api/pantry/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPantryItem {
    pub item_name: String,
    pub quantity: f64,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PantryCreateResponse {
    #[serde(default)]
    pub merged_duplicate: bool,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
    Other(#[allow(dead_code)] serde::de::IgnoredAny),
}

/// Accepts a JSON number, a numeric string or null; anything else reads as missing.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(v)) => Some(v),
        Some(NumberOrText::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(NumberOrText::Other(_)) | None => None,
    })
}
