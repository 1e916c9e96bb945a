//! Date-range pivoting and per-shop derived columns.
//!
//! Reshapes (date, metric, value) rows into one row per date with one column
//! per metric, then attaches the Revenue/Profit columns the reports render.
//! Everything here is a stateless transform over rows passed in.

use std::collections::HashMap;

use shared::{DailyEntry, ReportRow, Shop};

use crate::config::ProfitConfig;
use crate::domain::profit;

/// Pivoted rows: metric columns in first-seen order, one entry per date in
/// ascending date order. A metric with no value on a date is absent from
/// that date's map, not zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    pub metrics: Vec<String>,
    pub rows: Vec<(String, HashMap<String, i64>)>,
}

/// Pivot entries that are already ordered by date.
pub fn pivot(entries: &[DailyEntry]) -> Pivot {
    let mut metrics: Vec<String> = Vec::new();
    let mut rows: Vec<(String, HashMap<String, i64>)> = Vec::new();

    for entry in entries {
        if !metrics.contains(&entry.metric) {
            metrics.push(entry.metric.clone());
        }
        match rows.last_mut() {
            Some((date, values)) if *date == entry.date => {
                values.insert(entry.metric.clone(), entry.value);
            }
            _ => {
                let mut values = HashMap::new();
                values.insert(entry.metric.clone(), entry.value);
                rows.push((entry.date.clone(), values));
            }
        }
    }

    Pivot { metrics, rows }
}

/// Split date-ordered entries into per-date groups, preserving order.
pub fn group_by_date(entries: Vec<DailyEntry>) -> Vec<(String, Vec<DailyEntry>)> {
    let mut groups: Vec<(String, Vec<DailyEntry>)> = Vec::new();
    for entry in entries {
        match groups.last_mut() {
            Some((date, group)) if *date == entry.date => group.push(entry),
            _ => groups.push((entry.date.clone(), vec![entry])),
        }
    }
    groups
}

/// Aggregate profit for one shop over a full set of rows.
pub fn shop_profit(shop: Shop, entries: &[DailyEntry], config: &ProfitConfig) -> i64 {
    match shop {
        Shop::Barber => profit::barber_profit(entries, &config.barber),
        Shop::Shoe => profit::shoe_profit(entries, &config.shoe),
        Shop::Meatball => profit::meatball_profit(entries, &config.meatball),
    }
}

/// Derived (revenue, profit) report columns for one date's rows.
pub fn shop_day_columns(shop: Shop, entries: &[DailyEntry], config: &ProfitConfig) -> (i64, i64) {
    match shop {
        Shop::Barber => profit::barber_day_columns(entries, &config.barber),
        Shop::Shoe => profit::shoe_day_columns(entries, &config.shoe),
        Shop::Meatball => profit::meatball_day_columns(entries, &config.meatball),
    }
}

/// Build the pivoted report rows for one shop: the metric columns plus the
/// derived Revenue/Profit columns per date.
pub fn build_report_rows(
    shop: Shop,
    entries: Vec<DailyEntry>,
    config: &ProfitConfig,
) -> (Vec<String>, Vec<ReportRow>) {
    let pivoted = pivot(&entries);
    let grouped = group_by_date(entries);

    let rows = pivoted
        .rows
        .into_iter()
        .zip(grouped)
        .map(|((date, values), (_, day_entries))| {
            let (revenue, profit) = shop_day_columns(shop, &day_entries, config);
            ReportRow {
                date,
                values,
                revenue,
                profit,
            }
        })
        .collect();

    (pivoted.metrics, rows)
}
