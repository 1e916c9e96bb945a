//! Weekly inventory usage reconciliation.
//!
//! Differencing a start-of-week snapshot against an end-of-week snapshot
//! yields per-item consumption and cost. The functions here are pure: they
//! operate on rows already fetched by the storage layer and never touch the
//! database.

use shared::{UsageLine, UsageReport};

/// One snapshot row as fetched by the storage layer: item name, unit cost,
/// recorded quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub name: String,
    pub cost: i64,
    pub quantity: f64,
}

/// Reconcile one week's snapshots into a usage report.
///
/// Items are paired by name equality. An item present in only one snapshot
/// is skipped without a diagnostic; renaming an item mid-week therefore
/// drops it from the report. Matching by id instead would close that hole
/// and is a known candidate improvement.
///
/// Returns None when either snapshot set is empty: an incomplete week yields
/// no report rather than a partial one. `amount_used` may be negative when
/// an item was restocked mid-week; it is not clamped.
pub fn reconcile(
    week_number: u32,
    year: i32,
    start: &[SnapshotRow],
    end: &[SnapshotRow],
) -> Option<UsageReport> {
    if start.is_empty() || end.is_empty() {
        return None;
    }

    let mut lines = Vec::new();
    let mut total_cost: i64 = 0;

    // Report order follows the start-snapshot fetch order.
    for start_item in start {
        if let Some(end_item) = end.iter().find(|e| e.name == start_item.name) {
            let amount_used = start_item.quantity - end_item.quantity;
            // Truncation toward zero, not rounding
            let line_cost = (amount_used * start_item.cost as f64) as i64;

            lines.push(UsageLine {
                name: start_item.name.clone(),
                amount_used: round_one_decimal(amount_used),
                unit_cost: start_item.cost,
                line_cost,
            });
            total_cost += line_cost;
        }
    }

    Some(UsageReport {
        week_number,
        year,
        lines,
        total_cost,
    })
}

/// One decimal place for display; the line cost is computed from the
/// unrounded amount.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, cost: i64, quantity: f64) -> SnapshotRow {
        SnapshotRow {
            name: name.to_string(),
            cost,
            quantity,
        }
    }

    #[test]
    fn computes_usage_and_cost_per_item() {
        let start = vec![row("Meatballs", 5, 10.0)];
        let end = vec![row("Meatballs", 5, 4.0)];

        let report = reconcile(3, 2024, &start, &end).unwrap();
        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.lines[0].name, "Meatballs");
        assert_eq!(report.lines[0].amount_used, 6.0);
        assert_eq!(report.lines[0].unit_cost, 5);
        assert_eq!(report.lines[0].line_cost, 30);
        assert_eq!(report.total_cost, 30);
    }

    #[test]
    fn total_is_the_sum_of_line_costs() {
        let start = vec![row("Meatballs", 5, 10.0), row("Bread", 3, 8.0)];
        let end = vec![row("Meatballs", 5, 4.0), row("Bread", 3, 2.0)];

        let report = reconcile(3, 2024, &start, &end).unwrap();
        assert_eq!(report.lines.len(), 2);
        let sum: i64 = report.lines.iter().map(|l| l.line_cost).sum();
        assert_eq!(report.total_cost, sum);
        assert_eq!(report.total_cost, 30 + 18);
    }

    #[test]
    fn missing_snapshot_side_yields_no_report() {
        let start = vec![row("Meatballs", 5, 10.0)];

        assert_eq!(reconcile(3, 2024, &start, &[]), None);
        assert_eq!(reconcile(3, 2024, &[], &start), None);
        assert_eq!(reconcile(3, 2024, &[], &[]), None);
    }

    #[test]
    fn unmatched_items_are_silently_skipped() {
        let start = vec![row("Meatballs", 5, 10.0), row("Old Name", 4, 3.0)];
        let end = vec![row("Meatballs", 5, 4.0), row("New Name", 4, 1.0)];

        let report = reconcile(3, 2024, &start, &end).unwrap();
        // Only the name present on both sides appears
        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.lines[0].name, "Meatballs");
        assert_eq!(report.total_cost, 30);
    }

    #[test]
    fn restocked_items_yield_negative_usage() {
        let start = vec![row("Sauce", 4, 2.0)];
        let end = vec![row("Sauce", 4, 5.0)];

        let report = reconcile(3, 2024, &start, &end).unwrap();
        assert_eq!(report.lines[0].amount_used, -3.0);
        assert_eq!(report.lines[0].line_cost, -12);
        assert_eq!(report.total_cost, -12);
    }

    #[test]
    fn line_cost_truncates_toward_zero() {
        // 2.5 * 3 = 7.5 -> 7, not 8
        let start = vec![row("Bread", 3, 10.0)];
        let end = vec![row("Bread", 3, 7.5)];

        let report = reconcile(3, 2024, &start, &end).unwrap();
        assert_eq!(report.lines[0].line_cost, 7);
    }

    #[test]
    fn amount_used_is_rounded_for_display_only() {
        // 0.25 used at cost 10: display 0.3 (rounded), cost trunc(2.5) = 2
        let start = vec![row("Spice", 10, 1.0)];
        let end = vec![row("Spice", 10, 0.75)];

        let report = reconcile(3, 2024, &start, &end).unwrap();
        assert_eq!(report.lines[0].amount_used, 0.3);
        assert_eq!(report.lines[0].line_cost, 2);
    }

    #[test]
    fn order_follows_start_snapshot_order() {
        let start = vec![row("B", 1, 5.0), row("A", 1, 5.0), row("C", 1, 5.0)];
        let end = vec![row("A", 1, 1.0), row("C", 1, 1.0), row("B", 1, 1.0)];

        let report = reconcile(3, 2024, &start, &end).unwrap();
        let names: Vec<_> = report.lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }
}
