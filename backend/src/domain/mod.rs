//! # Domain Module
//!
//! Business logic for the shop tracker.
//!
//! The pure engine lives in `reconciliation`, `profit` and `reporting`:
//! stateless functions over rows the services fetch for them. Services own
//! the repositories, validate input before any write, and translate rows
//! into the response shapes the io layer serializes.
//!
//! ## Module Organization
//!
//! - **reconciliation**: weekly snapshot differencing (usage and cost)
//! - **profit**: per-shop profit calculators, driven by configured rates
//! - **reporting**: date-range pivoting and derived report columns
//! - **entry_service**: daily metric CRUD
//! - **inventory_service**: items, weekly snapshots, usage reports
//! - **report_service**: assembled profit and trend reports
//! - **account_service**: savings accounts and goals
//! - **task_service**: the task tree
//!
//! ## Business Rules
//!
//! - Re-saving a (date, shop, metric) or (item, type, week, year) record
//!   replaces the prior value; last write wins
//! - Start snapshots are recorded on Mondays, end snapshots on Sundays
//! - A week yields a usage report only when both snapshots exist
//! - Profit formulas ignore metrics they do not recognize and collapse to
//!   the negated fixed cost on empty input

pub mod account_service;
pub mod entry_service;
pub mod inventory_service;
pub mod profit;
pub mod reconciliation;
pub mod report_service;
pub mod reporting;
pub mod task_service;

pub use account_service::AccountService;
pub use entry_service::EntryService;
pub use inventory_service::InventoryService;
pub use report_service::ReportService;
pub use task_service::TaskService;
