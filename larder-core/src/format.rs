//! Currency, date and text formatting shared by every view.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::grocery::GroceryItem;

/// Non-finite numbers (NaN, inf) become 0.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Optional backend number with the neutral default applied.
pub fn amount(value: Option<f64>) -> f64 {
    value.map(finite_or_zero).unwrap_or(0.0)
}

/// Round to two decimals, the precision used for chart series.
pub fn round2(value: f64) -> f64 {
    (finite_or_zero(value) * 100.0).round() / 100.0
}

/// Format as Indian rupees with en-IN digit grouping: `₹1,23,456.50`.
pub fn format_inr(value: f64) -> String {
    let value = finite_or_zero(value);
    let paise = (value.abs() * 100.0).round() as u64;
    let rupees = paise / 100;
    let fraction = paise % 100;
    let sign = if value < 0.0 && paise > 0 { "-" } else { "" };
    format!("{sign}₹{}.{fraction:02}", group_indian(rupees))
}

fn group_indian(n: u64) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Trim and lowercase for case-insensitive comparisons.
pub fn normalize_token(value: &str) -> String {
    value.trim().to_lowercase()
}

/// `dd/mm/yyyy` in the user's display zone.
pub fn format_display_date(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%d/%m/%Y").to_string()
}

/// Quantities print without a trailing `.0` when whole.
pub fn format_quantity(qty: f64) -> String {
    let qty = finite_or_zero(qty);
    if qty.fract() == 0.0 {
        format!("{}", qty as i64)
    } else {
        format!("{qty}")
    }
}

/// Plain numbered list, one `N. name - Qty q` line per item.
pub fn copy_text(items: &[GroceryItem]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {} - Qty {}", i + 1, item.name, format_quantity(item.qty())))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shareable list with per-line cost and a total footer.
pub fn share_text(items: &[GroceryItem]) -> String {
    let mut lines = vec!["My Current Grocery List".to_string()];
    let mut total = 0.0;
    for (i, item) in items.iter().enumerate() {
        total += item.line_cost();
        lines.push(format!(
            "{}. {} - Qty {} - {}",
            i + 1,
            item.name,
            format_quantity(item.qty()),
            format_inr(item.line_cost())
        ));
    }
    lines.push(format!("Total: {}", format_inr(total)));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grocery::Category;
    use chrono::TimeZone;

    #[test]
    fn test_format_inr_grouping() {
        assert_eq!(format_inr(0.0), "₹0.00");
        assert_eq!(format_inr(68.0), "₹68.00");
        assert_eq!(format_inr(1234.5), "₹1,234.50");
        assert_eq!(format_inr(123456.5), "₹1,23,456.50");
        assert_eq!(format_inr(12345678.0), "₹1,23,45,678.00");
        assert_eq!(format_inr(-300.0), "-₹300.00");
        assert_eq!(format_inr(f64::NAN), "₹0.00");
    }

    #[test]
    fn test_display_date_uses_zone() {
        let at = Utc.with_ymd_and_hms(2024, 1, 10, 20, 0, 0).unwrap();
        assert_eq!(format_display_date(at, chrono_tz::UTC), "10/01/2024");
        // 20:00 UTC is already the next day in India
        assert_eq!(format_display_date(at, chrono_tz::Asia::Kolkata), "11/01/2024");
    }

    #[test]
    fn test_share_text() {
        let items = vec![
            GroceryItem::new("1", "Milk", Category::Dairy).with_quantity(2.0).with_price(30.0),
            GroceryItem::new("2", "Bread", Category::Bakery).with_quantity(1.0).with_price(38.0),
        ];
        assert_eq!(
            share_text(&items),
            "My Current Grocery List\n1. Milk - Qty 2 - ₹60.00\n2. Bread - Qty 1 - ₹38.00\nTotal: ₹98.00"
        );
        assert_eq!(copy_text(&items), "1. Milk - Qty 2\n2. Bread - Qty 1");
    }

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("  Paneer "), "paneer");
        assert_eq!(format_quantity(1.5), "1.5");
    }
}
