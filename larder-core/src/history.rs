//! Purchase-history filtering, sorting and chart series.

use anyhow::{bail, Result};
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

use crate::format::{format_display_date, round2};
use crate::grocery::PurchaseRecord;

pub const DEFAULT_MONTH_COUNT: usize = 6;
/// A century of months.
pub const MAX_MONTH_COUNT: usize = 1200;
pub const DEFAULT_TREND_WINDOW: usize = 10;

/// All provided filters must match. `None` (or a non-positive minimum)
/// disables a filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryFilter {
    pub text_query: Option<String>,
    pub exact_date: Option<NaiveDate>,
    pub min_amount: Option<f64>,
}

impl HistoryFilter {
    pub fn matches(&self, record: &PurchaseRecord, tz: Tz) -> bool {
        if let Some(date) = self.exact_date {
            if record.iso_date() != date {
                return false;
            }
        }

        if let Some(min) = self.min_amount.filter(|m| m.is_finite() && *m > 0.0) {
            if record.amount() < min {
                return false;
            }
        }

        match self.text_query.as_deref().map(|q| q.trim().to_lowercase()) {
            Some(q) if !q.is_empty() => searchable_text(record, tz).contains(&q),
            _ => true,
        }
    }
}

/// Lowercased text a free-text history query is matched against:
/// amount, display date, ISO date, item count, then each item's
/// name/category/quantity.
pub fn searchable_text(record: &PurchaseRecord, tz: Tz) -> String {
    let items = record
        .items_snapshot
        .iter()
        .map(|i| format!("{} {} {}", i.name, i.category(), i.qty()))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{} {} {} {} {}",
        record.amount(),
        format_display_date(record.purchase_date, tz),
        record.iso_date().format("%Y-%m-%d"),
        record.items_snapshot.len(),
        items
    )
    .to_lowercase()
}

pub fn filter_history(records: &[PurchaseRecord], filter: &HistoryFilter, tz: Tz) -> Vec<PurchaseRecord> {
    records.iter().filter(|r| filter.matches(r, tz)).cloned().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
    Highest,
    Lowest,
}

impl FromStr for SortMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_lowercase().as_str() {
            "newest" => SortMode::Newest,
            "oldest" => SortMode::Oldest,
            "highest" => SortMode::Highest,
            "lowest" => SortMode::Lowest,
            other => bail!("unknown sort '{other}' (expected newest, oldest, highest, lowest)"),
        })
    }
}

/// Stable sort; equal keys keep their input order.
pub fn sort_history(records: &[PurchaseRecord], mode: SortMode) -> Vec<PurchaseRecord> {
    let mut rows = records.to_vec();
    match mode {
        SortMode::Newest => rows.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date)),
        SortMode::Oldest => rows.sort_by(|a, b| a.purchase_date.cmp(&b.purchase_date)),
        SortMode::Highest => rows.sort_by(|a, b| b.amount().total_cmp(&a.amount())),
        SortMode::Lowest => rows.sort_by(|a, b| a.amount().total_cmp(&b.amount())),
    }
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    /// `YYYY-MM`
    pub key: String,
    /// Short month name, e.g. `Jan`.
    pub label: String,
    pub amount: f64,
}

fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Exactly `month_count` buckets (at most `MAX_MONTH_COUNT`) ending at the
/// reference month (inclusive), oldest first. Empty months are 0, never
/// absent. Months are UTC.
pub fn monthly_series(
    records: &[PurchaseRecord],
    month_count: usize,
    reference: DateTime<Utc>,
) -> Vec<MonthBucket> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for r in records {
        *totals.entry(month_key(r.iso_date())).or_insert(0.0) += r.amount();
    }

    let anchor = reference.date_naive().with_day(1).unwrap_or(reference.date_naive());
    (0..month_count.min(MAX_MONTH_COUNT) as u32)
        .rev()
        .filter_map(|back| anchor.checked_sub_months(Months::new(back)))
        .map(|first| {
            let key = month_key(first);
            let amount = round2(totals.get(&key).copied().unwrap_or(0.0));
            MonthBucket {
                label: first.format("%b").to_string(),
                key,
                amount,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// `#1`, `#2`, ... oldest first.
    pub label: String,
    pub amount: f64,
    pub date: String,
}

/// The latest `window` purchases in chronological order.
pub fn recent_trend(records: &[PurchaseRecord], window: usize, tz: Tz) -> Vec<TrendPoint> {
    let sorted = sort_history(records, SortMode::Oldest);
    let skip = sorted.len().saturating_sub(window);
    sorted
        .iter()
        .skip(skip)
        .enumerate()
        .map(|(i, r)| TrendPoint {
            label: format!("#{}", i + 1),
            amount: round2(r.amount()),
            date: format_display_date(r.purchase_date, tz),
        })
        .collect()
}

/// Mean purchase total; 0 when there is nothing to average.
pub fn average(records: &[PurchaseRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().map(PurchaseRecord::amount).sum::<f64>() / records.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grocery::{Category, GroceryItem};
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
    }

    fn sample() -> Vec<PurchaseRecord> {
        vec![
            PurchaseRecord::new("jan", 500.0, at(2024, 1, 10)).with_items(vec![
                GroceryItem::new("g1", "Paneer", Category::Dairy).with_quantity(2.0),
            ]),
            PurchaseRecord::new("feb", 1200.0, at(2024, 2, 5)),
            PurchaseRecord::new("mar", 300.0, at(2024, 3, 1)),
        ]
    }

    fn ids(rows: &[PurchaseRecord]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_min_amount_then_highest() {
        let filter = HistoryFilter { min_amount: Some(400.0), ..Default::default() };
        let rows = filter_history(&sample(), &filter, chrono_tz::UTC);
        assert_eq!(ids(&rows), ["jan", "feb"]);
        let sorted = sort_history(&rows, SortMode::Highest);
        assert_eq!(ids(&sorted), ["feb", "jan"]);
    }

    #[test]
    fn test_non_positive_min_amount_is_inactive() {
        let filter = HistoryFilter { min_amount: Some(0.0), ..Default::default() };
        assert_eq!(filter_history(&sample(), &filter, chrono_tz::UTC).len(), 3);
    }

    #[test]
    fn test_exact_date_ignores_time_of_day() {
        let mut records = sample();
        records[1].purchase_date = Utc.with_ymd_and_hms(2024, 2, 5, 23, 59, 0).unwrap();
        let filter = HistoryFilter {
            exact_date: NaiveDate::from_ymd_opt(2024, 2, 5),
            ..Default::default()
        };
        assert_eq!(ids(&filter_history(&records, &filter, chrono_tz::UTC)), ["feb"]);
    }

    #[test]
    fn test_text_query_covers_items_and_dates() {
        let records = sample();
        let by_item = HistoryFilter { text_query: Some(" PANEER ".into()), ..Default::default() };
        assert_eq!(ids(&filter_history(&records, &by_item, chrono_tz::UTC)), ["jan"]);

        let by_category = HistoryFilter { text_query: Some("dairy".into()), ..Default::default() };
        assert_eq!(ids(&filter_history(&records, &by_category, chrono_tz::UTC)), ["jan"]);

        let by_iso = HistoryFilter { text_query: Some("2024-03".into()), ..Default::default() };
        assert_eq!(ids(&filter_history(&records, &by_iso, chrono_tz::UTC)), ["mar"]);

        let by_amount = HistoryFilter { text_query: Some("1200".into()), ..Default::default() };
        assert_eq!(ids(&filter_history(&records, &by_amount, chrono_tz::UTC)), ["feb"]);
    }

    #[test]
    fn test_all_filters_must_match() {
        let filter = HistoryFilter {
            text_query: Some("paneer".into()),
            min_amount: Some(600.0),
            ..Default::default()
        };
        assert!(filter_history(&sample(), &filter, chrono_tz::UTC).is_empty());
    }

    #[test]
    fn test_sort_modes_stable() {
        let mut records = sample();
        records.push(PurchaseRecord::new("mar2", 300.0, at(2024, 3, 2)));
        assert_eq!(ids(&sort_history(&records, SortMode::Newest)), ["mar2", "mar", "feb", "jan"]);
        assert_eq!(ids(&sort_history(&records, SortMode::Oldest)), ["jan", "feb", "mar", "mar2"]);
        assert_eq!(ids(&sort_history(&records, SortMode::Lowest)), ["mar", "mar2", "jan", "feb"]);
    }

    #[test]
    fn test_monthly_series_fixed_length() {
        let reference = at(2024, 3, 20);
        let series = monthly_series(&sample(), 6, reference);
        let keys: Vec<_> = series.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, ["2023-10", "2023-11", "2023-12", "2024-01", "2024-02", "2024-03"]);
        assert_eq!(series[3].label, "Jan");
        assert_eq!(series[3].amount, 500.0);
        assert_eq!(series[0].amount, 0.0);
        let sum: f64 = series.iter().map(|b| b.amount).sum();
        assert_eq!(sum, 2000.0);

        assert_eq!(monthly_series(&[], 6, reference).len(), 6);
    }

    #[test]
    fn test_monthly_series_huge_count_is_capped_and_unique() {
        let series = monthly_series(&sample(), usize::MAX, at(2024, 3, 20));
        assert_eq!(series.len(), MAX_MONTH_COUNT);
        assert_eq!(series.last().map(|b| b.key.as_str()), Some("2024-03"));
        assert_eq!(series[0].key, "1924-04");
        let mut keys: Vec<_> = series.iter().map(|b| b.key.clone()).collect();
        keys.dedup();
        assert_eq!(keys.len(), MAX_MONTH_COUNT);
        let sum: f64 = series.iter().map(|b| b.amount).sum();
        assert_eq!(sum, 2000.0);
    }

    #[test]
    fn test_monthly_series_sums_same_month() {
        let records = vec![
            PurchaseRecord::new("a", 100.25, at(2024, 3, 1)),
            PurchaseRecord::new("b", 50.5, at(2024, 3, 31)),
        ];
        let series = monthly_series(&records, 1, at(2024, 3, 5));
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].amount, 150.75);
    }

    #[test]
    fn test_recent_trend_window() {
        let records: Vec<_> = (1..=12)
            .rev()
            .map(|d| PurchaseRecord::new(format!("r{d}"), d as f64, at(2024, 5, d)))
            .collect();
        let trend = recent_trend(&records, 10, chrono_tz::UTC);
        assert_eq!(trend.len(), 10);
        assert_eq!(trend[0].label, "#1");
        assert_eq!(trend[0].amount, 3.0);
        assert_eq!(trend[9].amount, 12.0);
        assert_eq!(trend[9].date, "12/05/2024");
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[]), 0.0);
        assert!((average(&sample()) - 666.666).abs() < 0.01);
    }

    #[test]
    fn test_sort_mode_parse() {
        assert_eq!("Highest".parse::<SortMode>().unwrap(), SortMode::Highest);
        assert!("random".parse::<SortMode>().is_err());
    }
}
