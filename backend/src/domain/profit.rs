//! Per-shop profit calculators.
//!
//! Pure functions over daily entry rows already restricted to one shop and
//! date range. Every calculator ignores metrics it does not recognize,
//! treats an empty input as zero revenue (profit collapses to the negated
//! fixed cost) and never fails.

use shared::DailyEntry;

use crate::config::{BarberRates, MeatballRates, ShoeRates};

pub const METRIC_ADULT_HAIRCUTS: &str = "Adult Haircuts";
pub const METRIC_CHILD_HAIRCUTS: &str = "Child Haircuts";
pub const METRIC_FREE_HAIRCUTS: &str = "Free Haircuts";
pub const METRIC_REVENUE: &str = "Revenue";
pub const METRIC_SALES: &str = "Sales";
pub const METRIC_SALAD_COST: &str = "Salad Cost";

fn sum_metric(entries: &[DailyEntry], metric: &str) -> i64 {
    entries
        .iter()
        .filter(|e| e.metric == metric)
        .map(|e| e.value)
        .sum()
}

/// Barber shop profit: half the haircut revenue minus the fixed cost.
pub fn barber_profit(entries: &[DailyEntry], rates: &BarberRates) -> i64 {
    let adult = sum_metric(entries, METRIC_ADULT_HAIRCUTS);
    let child = sum_metric(entries, METRIC_CHILD_HAIRCUTS);
    let free = sum_metric(entries, METRIC_FREE_HAIRCUTS);

    let revenue =
        adult * rates.adult_price + child * rates.child_price + free * rates.free_price;
    revenue.div_euclid(rates.revenue_divisor) - rates.fixed_cost
}

/// Barber per-day report columns: (revenue, profit).
///
/// The report column prices child haircuts with `child_price_reporting`,
/// which historically differs from the price the profit totals use.
pub fn barber_day_columns(entries: &[DailyEntry], rates: &BarberRates) -> (i64, i64) {
    let adult = sum_metric(entries, METRIC_ADULT_HAIRCUTS);
    let child = sum_metric(entries, METRIC_CHILD_HAIRCUTS);
    let free = sum_metric(entries, METRIC_FREE_HAIRCUTS);

    let raw = adult * rates.adult_price
        + child * rates.child_price_reporting
        + free * rates.free_price;
    let revenue = raw.div_euclid(rates.revenue_divisor);
    (revenue, revenue - rates.fixed_cost)
}

/// Shoe shop profit: revenue minus the fixed cost.
pub fn shoe_profit(entries: &[DailyEntry], rates: &ShoeRates) -> i64 {
    sum_metric(entries, METRIC_REVENUE) - rates.fixed_cost
}

/// Shoe per-day report columns: (revenue, profit).
pub fn shoe_day_columns(entries: &[DailyEntry], rates: &ShoeRates) -> (i64, i64) {
    let revenue = sum_metric(entries, METRIC_REVENUE);
    (revenue, revenue - rates.fixed_cost)
}

/// Meatball stand profit: half the sales minus salad cost and the fixed cost.
pub fn meatball_profit(entries: &[DailyEntry], rates: &MeatballRates) -> i64 {
    let sales = sum_metric(entries, METRIC_SALES);
    let salad_cost = sum_metric(entries, METRIC_SALAD_COST);
    sales.div_euclid(rates.sales_divisor) - salad_cost - rates.fixed_cost
}

/// Meatball per-day report columns: (revenue, profit). Revenue is the raw
/// sales figure.
pub fn meatball_day_columns(entries: &[DailyEntry], rates: &MeatballRates) -> (i64, i64) {
    let sales = sum_metric(entries, METRIC_SALES);
    (sales, meatball_profit(entries, rates))
}
