use serde::{Deserialize, Serialize};
use std::fmt;

/// The three shops tracked by the system.
///
/// The string forms below are also the values stored in the `shop` column of
/// `daily_entries`, so changing them invalidates existing databases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shop {
    #[serde(rename = "Barber Shop")]
    Barber,
    #[serde(rename = "Shoe Shop")]
    Shoe,
    #[serde(rename = "Meatball Stand")]
    Meatball,
}

impl Shop {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shop::Barber => "Barber Shop",
            Shop::Shoe => "Shoe Shop",
            Shop::Meatball => "Meatball Stand",
        }
    }

    pub fn all() -> [Shop; 3] {
        [Shop::Barber, Shop::Shoe, Shop::Meatball]
    }
}

impl fmt::Display for Shop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Shop {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Barber Shop" => Ok(Shop::Barber),
            "Shoe Shop" => Ok(Shop::Shoe),
            "Meatball Stand" => Ok(Shop::Meatball),
            other => Err(format!("unknown shop: {}", other)),
        }
    }
}

/// One daily metric row: a value recorded for a (date, shop, metric) key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    /// Calendar date in `YYYY-MM-DD` form
    pub date: String,
    pub shop: Shop,
    /// Metric name, e.g. "Adult Haircuts" or "Sales"
    pub metric: String,
    /// Recorded value, always non-negative
    pub value: i64,
}

/// A single metric/value pair inside a save request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub metric: String,
    pub value: i64,
}

/// Request to save one day's entries for a shop (idempotent upsert).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEntriesRequest {
    pub date: String,
    pub shop: Shop,
    pub entries: Vec<MetricValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEntriesResponse {
    pub saved_count: usize,
    pub success_message: String,
}

/// Query parameters for fetching entries of one shop over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRangeQuery {
    pub shop: Shop,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryListResponse {
    pub entries: Vec<DailyEntry>,
}

/// An inventory item with its unit cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    /// Unit cost in whole baht
    pub cost: i64,
}

/// Upsert an item by name: a new name inserts, an existing name updates cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertItemRequest {
    pub name: String,
    pub cost: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateItemRequest {
    pub name: String,
    pub cost: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResponse {
    pub item: InventoryItem,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemListResponse {
    pub items: Vec<InventoryItem>,
}

/// Whether a weekly snapshot captures the start or the end of a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotType {
    Start,
    End,
}

impl SnapshotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotType::Start => "start",
            SnapshotType::End => "end",
        }
    }
}

impl fmt::Display for SnapshotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SnapshotType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(SnapshotType::Start),
            "end" => Ok(SnapshotType::End),
            other => Err(format!("unknown snapshot type: {}", other)),
        }
    }
}

/// Quantity recorded for one item in a snapshot batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemQuantity {
    pub item_id: i64,
    pub quantity: f64,
}

/// Request to save a weekly snapshot batch.
///
/// `record_date` must be a Monday for start snapshots and a Sunday for end
/// snapshots; the week number and year are derived from it server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSnapshotsRequest {
    pub snapshot_type: SnapshotType,
    pub record_date: String,
    pub quantities: Vec<ItemQuantity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSnapshotsResponse {
    pub week_number: u32,
    pub year: i32,
    pub saved_count: usize,
    pub success_message: String,
}

/// Completeness marker for one tracked week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekStatus {
    pub week_number: u32,
    pub year: i32,
    pub start_inventory: bool,
    pub end_inventory: bool,
    /// True iff both snapshots were recorded
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekListResponse {
    pub weeks: Vec<WeekStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageReportQuery {
    pub week_number: u32,
    pub year: i32,
}

/// One line of a weekly usage report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLine {
    pub name: String,
    /// start quantity minus end quantity, rounded to one decimal for display;
    /// negative means the item was restocked mid-week
    pub amount_used: f64,
    pub unit_cost: i64,
    pub line_cost: i64,
}

/// Usage and cost report for one completed week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    pub week_number: u32,
    pub year: i32,
    pub lines: Vec<UsageLine>,
    pub total_cost: i64,
}

/// `report` is None when the week has no complete snapshot pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageReportResponse {
    pub report: Option<UsageReport>,
}

/// A savings account with a goal amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub balance: i64,
    pub goal: i64,
}

impl Account {
    /// Fraction of the goal reached, capped at 1.0. None when no goal is set.
    pub fn progress(&self) -> Option<f64> {
        if self.goal <= 0 {
            return None;
        }
        Some((self.balance as f64 / self.goal as f64).min(1.0))
    }

    /// Amount still missing towards the goal. None when no goal is set.
    pub fn remaining(&self) -> Option<i64> {
        if self.goal <= 0 {
            return None;
        }
        Some((self.goal - self.balance).max(0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    pub balance: i64,
    pub goal: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAccountRequest {
    pub name: String,
    pub balance: i64,
    pub goal: i64,
}

/// Deposit (positive amount) or withdraw (negative amount) on one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustBalanceRequest {
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub account: Account,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountListResponse {
    pub accounts: Vec<Account>,
}

/// Totals across all accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub total_balance: i64,
    pub total_goal: i64,
    /// Total balance over total goal, as a percentage. None when no account
    /// has a goal.
    pub overall_progress: Option<f64>,
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(TaskStatus::Pending),
            "Completed" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown task status: {}", other)),
        }
    }
}

/// A task or subtask. `parent_task` is None for root tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Deadline date in `YYYY-MM-DD` form
    pub deadline: String,
    pub status: TaskStatus,
    pub parent_task: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub name: String,
    pub description: String,
    pub deadline: String,
    pub parent_task: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub name: String,
    pub description: String,
    pub deadline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task: Task,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

/// The current main task: the first pending root task, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentTaskResponse {
    pub task: Option<Task>,
    /// Days until the deadline; negative when it has passed. None when there
    /// is no current task.
    pub days_remaining: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteTasksResponse {
    pub deleted_count: usize,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: String,
    pub end_date: String,
}

/// One pivoted report row: a date plus the metric values seen on that date.
///
/// A metric missing on a date is simply absent from `values`, it is not
/// filled with zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub date: String,
    pub values: std::collections::HashMap<String, i64>,
    /// Derived revenue for this date
    pub revenue: i64,
    /// Derived profit for this date
    pub profit: i64,
}

/// Pivoted date-range report for one shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopReport {
    pub shop: Shop,
    pub start_date: String,
    pub end_date: String,
    /// Metric column order, first-seen order within the range
    pub metrics: Vec<String>,
    /// One row per date, ascending
    pub rows: Vec<ReportRow>,
    /// Aggregate profit over the whole range
    pub total_profit: i64,
}

/// Per-day profit of one shop, for multi-day trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitPoint {
    pub date: String,
    pub shop: Shop,
    pub profit: i64,
}

/// Combined profit report across all shops for a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitReport {
    pub start_date: String,
    pub end_date: String,
    pub barber_profit: i64,
    pub shoe_profit: i64,
    pub meatball_profit: i64,
    pub total_profit: i64,
    /// Per-day series, present only for multi-day ranges
    pub series: Option<Vec<ProfitPoint>>,
}

/// Aggregation bucket for sales totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesPeriod {
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPeriodQuery {
    pub period: SalesPeriod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotal {
    /// Bucket label, `YYYY-Www` for weekly and `YYYY-MM` for monthly
    pub period: String,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesByPeriodResponse {
    pub rows: Vec<PeriodTotal>,
}

/// One week of the profit-vs-inventory comparison. A side with no data for
/// the week reports zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyComparison {
    pub week_number: u32,
    pub year: i32,
    pub inventory_cost: i64,
    pub profit: i64,
    pub revenue: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitVsInventoryResponse {
    pub rows: Vec<WeeklyComparison>,
}
