use anyhow::Result;
use shared::{InventoryItem, ItemQuantity, SnapshotType, WeekStatus};
use sqlx::Row;

use crate::domain::reconciliation::SnapshotRow;
use crate::storage::connection::DbConnection;

/// Repository for inventory items, weekly snapshots and week tracking flags
#[derive(Clone)]
pub struct InventoryRepository {
    db: DbConnection,
}

impl InventoryRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert an item, or update its unit cost when the name already exists.
    pub async fn upsert_item(&self, name: &str, cost: i64) -> Result<InventoryItem> {
        sqlx::query(
            r#"
            INSERT INTO inventory_items (name, cost)
            VALUES (?, ?)
            ON CONFLICT(name) DO UPDATE SET cost = excluded.cost
            "#,
        )
        .bind(name)
        .bind(cost)
        .execute(self.db.pool())
        .await?;

        let row = sqlx::query(
            r#"
            SELECT id, name, cost FROM inventory_items WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_one(self.db.pool())
        .await?;

        Ok(InventoryItem {
            id: row.get("id"),
            name: row.get("name"),
            cost: row.get("cost"),
        })
    }

    /// Rename an item and/or change its cost. Returns false when the id is
    /// unknown.
    pub async fn update_item(&self, id: i64, name: &str, cost: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE inventory_items
            SET name = ?, cost = ?
            WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(cost)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_item(&self, id: i64) -> Result<Option<InventoryItem>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, cost FROM inventory_items WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| InventoryItem {
            id: r.get("id"),
            name: r.get("name"),
            cost: r.get("cost"),
        }))
    }

    pub async fn list_items(&self) -> Result<Vec<InventoryItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, cost FROM inventory_items ORDER BY id
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        let items = rows
            .iter()
            .map(|row| InventoryItem {
                id: row.get("id"),
                name: row.get("name"),
                cost: row.get("cost"),
            })
            .collect();
        Ok(items)
    }

    /// Upsert a snapshot batch and raise the matching tracking flag, all in
    /// one transaction. Re-saving a (item, type, week, year) replaces the
    /// prior quantity.
    pub async fn upsert_snapshots(
        &self,
        snapshot_type: SnapshotType,
        record_date: &str,
        week_number: u32,
        year: i32,
        quantities: &[ItemQuantity],
    ) -> Result<usize> {
        let mut tx = self.db.pool().begin().await?;

        for item in quantities {
            sqlx::query(
                r#"
                INSERT INTO weekly_inventory
                    (item_id, inventory_type, quantity, record_date, week_number, year)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(item_id, inventory_type, week_number, year)
                DO UPDATE SET quantity = excluded.quantity, record_date = excluded.record_date
                "#,
            )
            .bind(item.item_id)
            .bind(snapshot_type.as_str())
            .bind(item.quantity)
            .bind(record_date)
            .bind(week_number)
            .bind(year)
            .execute(&mut *tx)
            .await?;
        }

        let flag_column = match snapshot_type {
            SnapshotType::Start => "start_inventory",
            SnapshotType::End => "end_inventory",
        };
        let flag_query = format!(
            r#"
            INSERT INTO weekly_tracking (week_number, year, {flag})
            VALUES (?, ?, 1)
            ON CONFLICT(week_number, year)
            DO UPDATE SET {flag} = 1
            "#,
            flag = flag_column
        );
        sqlx::query(&flag_query)
            .bind(week_number)
            .bind(year)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(quantities.len())
    }

    /// Fetch the snapshot rows of one type for a week, joined with item name
    /// and unit cost. Ordered by snapshot insertion, which fixes the order of
    /// the usage report.
    pub async fn snapshot_rows(
        &self,
        snapshot_type: SnapshotType,
        week_number: u32,
        year: i32,
    ) -> Result<Vec<SnapshotRow>> {
        let rows = sqlx::query(
            r#"
            SELECT ii.name, ii.cost, wi.quantity
            FROM weekly_inventory wi
            JOIN inventory_items ii ON wi.item_id = ii.id
            WHERE wi.inventory_type = ? AND wi.week_number = ? AND wi.year = ?
            ORDER BY wi.id
            "#,
        )
        .bind(snapshot_type.as_str())
        .bind(week_number)
        .bind(year)
        .fetch_all(self.db.pool())
        .await?;

        let snapshots = rows
            .iter()
            .map(|row| SnapshotRow {
                name: row.get("name"),
                cost: row.get("cost"),
                quantity: row.get("quantity"),
            })
            .collect();
        Ok(snapshots)
    }

    /// All tracked weeks with their completeness flags, oldest first.
    pub async fn list_weeks(&self) -> Result<Vec<WeekStatus>> {
        let rows = sqlx::query(
            r#"
            SELECT week_number, year, start_inventory, end_inventory
            FROM weekly_tracking
            ORDER BY year, week_number
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        let weeks = rows
            .iter()
            .map(|row| {
                let start: bool = row.get("start_inventory");
                let end: bool = row.get("end_inventory");
                WeekStatus {
                    week_number: row.get::<i64, _>("week_number") as u32,
                    year: row.get::<i64, _>("year") as i32,
                    start_inventory: start,
                    end_inventory: end,
                    complete: start && end,
                }
            })
            .collect();
        Ok(weeks)
    }

    /// Total start-snapshot inventory value per week: SUM(quantity * cost),
    /// truncated to whole baht.
    pub async fn start_inventory_cost_by_week(&self) -> Result<Vec<(u32, i32, i64)>> {
        let rows = sqlx::query(
            r#"
            SELECT wi.week_number, wi.year,
                   CAST(SUM(wi.quantity * ii.cost) AS INTEGER) AS inventory_cost
            FROM weekly_inventory wi
            JOIN inventory_items ii ON wi.item_id = ii.id
            WHERE wi.inventory_type = 'start'
            GROUP BY wi.week_number, wi.year
            ORDER BY wi.year, wi.week_number
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        let costs = rows
            .iter()
            .map(|row| {
                (
                    row.get::<i64, _>("week_number") as u32,
                    row.get::<i64, _>("year") as i32,
                    row.get::<i64, _>("inventory_cost"),
                )
            })
            .collect();
        Ok(costs)
    }
}
