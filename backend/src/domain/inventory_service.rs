//! Inventory service: item upkeep, weekly snapshot capture and the usage
//! report.
//!
//! Snapshot dates are constrained to the week boundaries (Monday for start,
//! Sunday for end); the week number and year a snapshot belongs to are
//! derived from the record date, never supplied by the caller.

use anyhow::Result;
use chrono::{Datelike, Weekday};
use log::info;

use crate::domain::entry_service::parse_date;
use crate::domain::reconciliation;
use crate::storage::{DbConnection, InventoryRepository};
use shared::{
    InventoryItem, ItemListResponse, SaveSnapshotsRequest, SaveSnapshotsResponse, SnapshotType,
    UpdateItemRequest, UpsertItemRequest, UsageReport, WeekListResponse,
};

/// Service for inventory items and weekly snapshots
#[derive(Clone)]
pub struct InventoryService {
    inventory_repository: InventoryRepository,
}

impl InventoryService {
    pub fn new(db: DbConnection) -> Self {
        let inventory_repository = InventoryRepository::new(db);
        Self {
            inventory_repository,
        }
    }

    /// Add an item, or update its cost when the name is already known.
    pub async fn upsert_item(&self, request: UpsertItemRequest) -> Result<InventoryItem> {
        if request.name.trim().is_empty() {
            return Err(anyhow::anyhow!("Item name cannot be empty"));
        }
        if request.cost < 0 {
            return Err(anyhow::anyhow!("Item cost cannot be negative"));
        }

        let item = self
            .inventory_repository
            .upsert_item(request.name.trim(), request.cost)
            .await?;
        info!("Upserted inventory item '{}' (id {})", item.name, item.id);
        Ok(item)
    }

    pub async fn update_item(&self, id: i64, request: UpdateItemRequest) -> Result<InventoryItem> {
        if request.name.trim().is_empty() {
            return Err(anyhow::anyhow!("Item name cannot be empty"));
        }
        if request.cost < 0 {
            return Err(anyhow::anyhow!("Item cost cannot be negative"));
        }

        let updated = self
            .inventory_repository
            .update_item(id, request.name.trim(), request.cost)
            .await?;
        if !updated {
            return Err(anyhow::anyhow!("Item {} not found", id));
        }

        Ok(InventoryItem {
            id,
            name: request.name.trim().to_string(),
            cost: request.cost,
        })
    }

    pub async fn list_items(&self) -> Result<ItemListResponse> {
        let items = self.inventory_repository.list_items().await?;
        Ok(ItemListResponse { items })
    }

    /// Save a snapshot batch for the week containing `record_date`.
    ///
    /// Start snapshots must be dated on a Monday and end snapshots on a
    /// Sunday; anything else aborts before any write. Saving also raises the
    /// week's completeness flag for the snapshot type.
    pub async fn save_snapshots(
        &self,
        request: SaveSnapshotsRequest,
    ) -> Result<SaveSnapshotsResponse> {
        let date = parse_date(&request.record_date)?;
        match request.snapshot_type {
            SnapshotType::Start if date.weekday() != Weekday::Mon => {
                return Err(anyhow::anyhow!(
                    "Start-of-week inventory must be recorded on a Monday"
                ));
            }
            SnapshotType::End if date.weekday() != Weekday::Sun => {
                return Err(anyhow::anyhow!(
                    "End-of-week inventory must be recorded on a Sunday"
                ));
            }
            _ => {}
        }

        if request.quantities.is_empty() {
            return Err(anyhow::anyhow!("No quantities to save"));
        }
        for item in &request.quantities {
            if item.quantity < 0.0 {
                return Err(anyhow::anyhow!("Quantities cannot be negative"));
            }
            if self.inventory_repository.get_item(item.item_id).await?.is_none() {
                return Err(anyhow::anyhow!("Item {} not found", item.item_id));
            }
        }

        // The year stays the calendar year of the record date even when the
        // ISO week belongs to the neighboring year; reports key on the same
        // pair, so the pairing stays consistent.
        let week_number = date.iso_week().week();
        let year = date.year();

        let saved_count = self
            .inventory_repository
            .upsert_snapshots(
                request.snapshot_type,
                &request.record_date,
                week_number,
                year,
                &request.quantities,
            )
            .await?;

        info!(
            "Saved {} {} snapshots for week {}/{}",
            saved_count, request.snapshot_type, week_number, year
        );

        Ok(SaveSnapshotsResponse {
            week_number,
            year,
            saved_count,
            success_message: format!(
                "{} inventory saved for week {}, {}",
                request.snapshot_type, week_number, year
            ),
        })
    }

    /// All tracked weeks with completeness flags, oldest first.
    pub async fn list_weeks(&self) -> Result<WeekListResponse> {
        let weeks = self.inventory_repository.list_weeks().await?;
        Ok(WeekListResponse { weeks })
    }

    /// Usage report for one week, or None while either snapshot is missing.
    pub async fn usage_report(&self, week_number: u32, year: i32) -> Result<Option<UsageReport>> {
        let start = self
            .inventory_repository
            .snapshot_rows(SnapshotType::Start, week_number, year)
            .await?;
        let end = self
            .inventory_repository
            .snapshot_rows(SnapshotType::End, week_number, year)
            .await?;

        let report = reconciliation::reconcile(week_number, year, &start, &end);
        if report.is_none() {
            info!(
                "Incomplete inventory records for week {}/{}, no report",
                week_number, year
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ItemQuantity;

    async fn create_test_service() -> InventoryService {
        let db = DbConnection::init_test().await.unwrap();
        InventoryService::new(db)
    }

    fn item_request(name: &str, cost: i64) -> UpsertItemRequest {
        UpsertItemRequest {
            name: name.to_string(),
            cost,
        }
    }

    fn snapshot_request(
        snapshot_type: SnapshotType,
        record_date: &str,
        quantities: Vec<(i64, f64)>,
    ) -> SaveSnapshotsRequest {
        SaveSnapshotsRequest {
            snapshot_type,
            record_date: record_date.to_string(),
            quantities: quantities
                .into_iter()
                .map(|(item_id, quantity)| ItemQuantity { item_id, quantity })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_snapshot_weekday_is_validated() {
        let service = create_test_service().await;
        let item = service.upsert_item(item_request("Meatballs", 5)).await.unwrap();

        // 2024-01-16 is a Tuesday
        let result = service
            .save_snapshots(snapshot_request(
                SnapshotType::Start,
                "2024-01-16",
                vec![(item.id, 10.0)],
            ))
            .await;
        assert!(result.is_err());

        // No tracking flag was raised by the failed save
        assert!(service.list_weeks().await.unwrap().weeks.is_empty());

        // 2024-01-15 is a Monday
        let response = service
            .save_snapshots(snapshot_request(
                SnapshotType::Start,
                "2024-01-15",
                vec![(item.id, 10.0)],
            ))
            .await
            .unwrap();
        assert_eq!(response.week_number, 3);
        assert_eq!(response.year, 2024);
    }

    #[tokio::test]
    async fn test_end_snapshot_requires_sunday() {
        let service = create_test_service().await;
        let item = service.upsert_item(item_request("Bread", 3)).await.unwrap();

        // 2024-01-20 is a Saturday
        assert!(service
            .save_snapshots(snapshot_request(
                SnapshotType::End,
                "2024-01-20",
                vec![(item.id, 4.0)],
            ))
            .await
            .is_err());

        // 2024-01-21 is a Sunday, same ISO week as Monday the 15th
        let response = service
            .save_snapshots(snapshot_request(
                SnapshotType::End,
                "2024-01-21",
                vec![(item.id, 4.0)],
            ))
            .await
            .unwrap();
        assert_eq!(response.week_number, 3);
    }

    #[tokio::test]
    async fn test_usage_report_for_complete_week() {
        let service = create_test_service().await;
        let item = service.upsert_item(item_request("Meatballs", 5)).await.unwrap();

        service
            .save_snapshots(snapshot_request(
                SnapshotType::Start,
                "2024-01-15",
                vec![(item.id, 10.0)],
            ))
            .await
            .unwrap();
        service
            .save_snapshots(snapshot_request(
                SnapshotType::End,
                "2024-01-21",
                vec![(item.id, 4.0)],
            ))
            .await
            .unwrap();

        let report = service.usage_report(3, 2024).await.unwrap().unwrap();
        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.lines[0].amount_used, 6.0);
        assert_eq!(report.total_cost, 30);

        let weeks = service.list_weeks().await.unwrap().weeks;
        assert_eq!(weeks.len(), 1);
        assert!(weeks[0].complete);
    }

    #[tokio::test]
    async fn test_incomplete_week_yields_no_report() {
        let service = create_test_service().await;
        let item = service.upsert_item(item_request("Meatballs", 5)).await.unwrap();

        service
            .save_snapshots(snapshot_request(
                SnapshotType::Start,
                "2024-01-15",
                vec![(item.id, 10.0)],
            ))
            .await
            .unwrap();

        assert!(service.usage_report(3, 2024).await.unwrap().is_none());

        let weeks = service.list_weeks().await.unwrap().weeks;
        assert!(weeks[0].start_inventory);
        assert!(!weeks[0].end_inventory);
        assert!(!weeks[0].complete);
    }

    #[tokio::test]
    async fn test_unknown_item_aborts_snapshot_batch() {
        let service = create_test_service().await;

        let result = service
            .save_snapshots(snapshot_request(
                SnapshotType::Start,
                "2024-01-15",
                vec![(999, 10.0)],
            ))
            .await;
        assert!(result.is_err());
        assert!(service.list_weeks().await.unwrap().weeks.is_empty());
    }
}
