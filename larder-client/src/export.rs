//! CSV export of purchase history.
//!
//! Columns: id, date (display zone, dd/mm/yyyy), total, items (count),
//! item_names (`; `-separated, in snapshot order).

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use larder_core::format::{format_display_date, round2};
use larder_core::PurchaseRecord;

#[derive(Debug, Serialize)]
struct HistoryRow<'a> {
    id: &'a str,
    date: String,
    total: f64,
    items: usize,
    item_names: String,
}

impl<'a> HistoryRow<'a> {
    fn from_record(record: &'a PurchaseRecord, tz: Tz) -> Self {
        Self {
            id: &record.id,
            date: format_display_date(record.purchase_date, tz),
            total: round2(record.amount()),
            items: record.items_snapshot.len(),
            item_names: record
                .items_snapshot
                .iter()
                .map(|i| i.name.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

pub fn write_history_csv<W: Write>(writer: W, records: &[PurchaseRecord], tz: Tz) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if records.is_empty() {
        // serialize() only emits headers alongside the first row
        wtr.write_record(["id", "date", "total", "items", "item_names"])?;
    }
    for record in records {
        wtr.serialize(HistoryRow::from_record(record, tz))
            .with_context(|| format!("writing history row {}", record.id))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_history_csv(path: impl AsRef<Path>, records: &[PurchaseRecord], tz: Tz) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_history_csv(file, records, tz)
}
