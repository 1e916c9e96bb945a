//! # REST API Interface Layer
//!
//! HTTP endpoints for the shop tracker. This layer handles:
//! - JSON request/response serialization
//! - Error translation from domain errors to HTTP status codes
//! - Request logging
//!
//! Validation failures map to 400, unknown ids to 404, name collisions to
//! 409 and everything else to a generic 500. Incomplete data (a week with
//! only one snapshot, an empty date range) is a 200 with an empty payload,
//! not an error.

// Module declarations
pub mod account_apis;
pub mod entry_apis;
pub mod inventory_apis;
pub mod report_apis;
pub mod task_apis;
