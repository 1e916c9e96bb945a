//! Daily entry service: validation and persistence of per-day shop metrics.

use anyhow::Result;
use chrono::NaiveDate;
use log::info;

use crate::storage::{DbConnection, EntryRepository};
use shared::{EntryListResponse, EntryRangeQuery, SaveEntriesRequest, SaveEntriesResponse};

/// Service for recording and reading daily metric entries
#[derive(Clone)]
pub struct EntryService {
    entry_repository: EntryRepository,
}

impl EntryService {
    pub fn new(db: DbConnection) -> Self {
        let entry_repository = EntryRepository::new(db);
        Self { entry_repository }
    }

    /// Save one day's entries for a shop. The whole batch is validated
    /// before anything is written; a bad row aborts with no partial write.
    pub async fn save_entries(&self, request: SaveEntriesRequest) -> Result<SaveEntriesResponse> {
        info!(
            "Saving {} entries for {} on {}",
            request.entries.len(),
            request.shop,
            request.date
        );

        parse_date(&request.date)?;
        if request.entries.is_empty() {
            return Err(anyhow::anyhow!("No entries to save"));
        }
        for entry in &request.entries {
            if entry.metric.trim().is_empty() {
                return Err(anyhow::anyhow!("Metric name cannot be empty"));
            }
            if entry.value < 0 {
                return Err(anyhow::anyhow!(
                    "Value for '{}' cannot be negative",
                    entry.metric
                ));
            }
        }

        let saved_count = self
            .entry_repository
            .upsert_entries(&request.date, request.shop, &request.entries)
            .await?;

        Ok(SaveEntriesResponse {
            saved_count,
            success_message: format!(
                "{} entries for {} saved successfully",
                request.shop, request.date
            ),
        })
    }

    /// Entries of one shop over an inclusive date range.
    pub async fn entries_for_range(&self, query: EntryRangeQuery) -> Result<EntryListResponse> {
        let start = parse_date(&query.start_date)?;
        let end = parse_date(&query.end_date)?;
        if start > end {
            return Err(anyhow::anyhow!("Start date cannot be after end date"));
        }

        let entries = self
            .entry_repository
            .entries_for_range(query.shop, &query.start_date, &query.end_date)
            .await?;

        Ok(EntryListResponse { entries })
    }
}

pub(crate) fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date '{}', expected YYYY-MM-DD", date))
}
