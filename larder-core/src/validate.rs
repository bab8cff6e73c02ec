//! Input validation for user-entered values.

use thiserror::Error;

use crate::aggregate::pantry_duplicate;
use crate::grocery::PantryItem;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("item name cannot be empty")]
    EmptyName,
    #[error("type something to smart-fill")]
    EmptyQuery,
    #[error("budget must be a positive number, got '{0}'")]
    InvalidBudget(String),
    #[error("quantity must be a non-negative number, got '{0}'")]
    InvalidQuantity(String),
    #[error("price must be a non-negative number, got '{0}'")]
    InvalidPrice(String),
}

/// Adding an item the pantry already stocks, without an explicit override.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("'{name}' is already in your pantry (qty {quantity}); pass the override to add it anyway")]
pub struct DuplicateInPantry {
    pub name: String,
    pub pantry_id: String,
    pub quantity: f64,
}

/// Trimmed, non-empty item name.
pub fn require_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}

pub fn parse_budget(raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ValidationError::InvalidBudget(raw.trim().to_string())),
    }
}

/// Blank means 1.
pub fn parse_quantity(raw: &str) -> Result<f64, ValidationError> {
    parse_number(raw, 1.0).ok_or_else(|| ValidationError::InvalidQuantity(raw.trim().to_string()))
}

/// Blank means 0 (price unknown).
pub fn parse_price(raw: &str) -> Result<f64, ValidationError> {
    parse_number(raw, 0.0).ok_or_else(|| ValidationError::InvalidPrice(raw.trim().to_string()))
}

fn parse_number(raw: &str, blank: f64) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(blank);
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

pub fn check_pantry_duplicate(
    name: &str,
    pantry: &[PantryItem],
    allow_duplicate: bool,
) -> Result<(), DuplicateInPantry> {
    if allow_duplicate {
        return Ok(());
    }
    match pantry_duplicate(name, pantry) {
        Some(p) => Err(DuplicateInPantry {
            name: p.item_name.clone(),
            pantry_id: p.id.clone(),
            quantity: p.qty(),
        }),
        None => Ok(()),
    }
}
