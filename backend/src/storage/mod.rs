//! # Storage Module
//!
//! Handles all data persistence for the shop tracker.
//!
//! The storage layer owns schema creation and connection lifecycle and
//! exposes row-fetch-by-filter and upsert-by-unique-key operations to the
//! domain layer. It never computes derived numbers; reconciliation and
//! profit math live in the domain engine, which only consumes rows fetched
//! here.
//!
//! ## Key Responsibilities
//!
//! - **Connection Management**: single SQLite pool, schema ensured at startup
//! - **Upserts**: last-write-wins writes keyed by each table's uniqueness
//!   constraint (daily entries, weekly snapshots, inventory items)
//! - **Row Fetching**: filtered reads (shop + date range, week + year)
//! - **Atomicity**: batch writes run inside a single transaction

pub mod connection;
pub mod repositories;

// Re-export the main types that other modules need
pub use connection::DbConnection;
pub use repositories::{
    AccountRepository,
    EntryRepository,
    InventoryRepository,
    TaskRepository,
};
