use anyhow::Result;
use shared::{DailyEntry, MetricValue, PeriodTotal, Shop};
use sqlx::Row;

use crate::storage::connection::DbConnection;

/// Repository for daily metric entries
#[derive(Clone)]
pub struct EntryRepository {
    db: DbConnection,
}

impl EntryRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Upsert one day's entries for a shop in a single transaction.
    ///
    /// Re-saving the same (date, shop, metric) replaces the prior value;
    /// last write wins, no history is kept.
    pub async fn upsert_entries(
        &self,
        date: &str,
        shop: Shop,
        entries: &[MetricValue],
    ) -> Result<usize> {
        let mut tx = self.db.pool().begin().await?;

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO daily_entries (date, shop, metric, value)
                VALUES (?, ?, ?, ?)
                ON CONFLICT(date, shop, metric)
                DO UPDATE SET value = excluded.value
                "#,
            )
            .bind(date)
            .bind(shop.as_str())
            .bind(&entry.metric)
            .bind(entry.value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(entries.len())
    }

    /// Fetch all entries of one shop within an inclusive date range,
    /// ordered by date (insertion order within a date).
    pub async fn entries_for_range(
        &self,
        shop: Shop,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<DailyEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT date, shop, metric, value
            FROM daily_entries
            WHERE shop = ? AND date BETWEEN ? AND ?
            ORDER BY date, id
            "#,
        )
        .bind(shop.as_str())
        .bind(start_date)
        .bind(end_date)
        .fetch_all(self.db.pool())
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            entries.push(DailyEntry {
                date: row.get("date"),
                shop,
                metric: row.get("metric"),
                value: row.get("value"),
            });
        }
        Ok(entries)
    }

    /// Fetch every entry of one shop, ordered by date.
    pub async fn entries_for_shop(&self, shop: Shop) -> Result<Vec<DailyEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT date, shop, metric, value
            FROM daily_entries
            WHERE shop = ?
            ORDER BY date, id
            "#,
        )
        .bind(shop.as_str())
        .fetch_all(self.db.pool())
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            entries.push(DailyEntry {
                date: row.get("date"),
                shop,
                metric: row.get("metric"),
                value: row.get("value"),
            });
        }
        Ok(entries)
    }

    /// Sum one metric of one shop into period buckets.
    ///
    /// `period_format` is a SQLite strftime format, e.g. `%Y-W%W` for weekly
    /// buckets or `%Y-%m` for monthly ones.
    pub async fn metric_totals_by_period(
        &self,
        shop: Shop,
        metric: &str,
        period_format: &str,
    ) -> Result<Vec<PeriodTotal>> {
        let rows = sqlx::query(
            r#"
            SELECT strftime(?, date) AS period, SUM(value) AS total
            FROM daily_entries
            WHERE shop = ? AND metric = ?
            GROUP BY period
            ORDER BY period
            "#,
        )
        .bind(period_format)
        .bind(shop.as_str())
        .bind(metric)
        .fetch_all(self.db.pool())
        .await?;

        let totals = rows
            .iter()
            .map(|row| PeriodTotal {
                period: row.get("period"),
                total: row.get("total"),
            })
            .collect();
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;

    async fn setup_test() -> EntryRepository {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        EntryRepository::new(db)
    }

    fn metric(name: &str, value: i64) -> MetricValue {
        MetricValue {
            metric: name.to_string(),
            value,
        }
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_last_write_wins() {
        let repo = setup_test().await;

        repo.upsert_entries("2024-01-15", Shop::Barber, &[metric("Adult Haircuts", 10)])
            .await
            .expect("Failed to save entries");
        repo.upsert_entries("2024-01-15", Shop::Barber, &[metric("Adult Haircuts", 12)])
            .await
            .expect("Failed to re-save entries");

        let entries = repo
            .entries_for_range(Shop::Barber, "2024-01-15", "2024-01-15")
            .await
            .expect("Failed to fetch entries");

        // Exactly one row remains, carrying the latest value
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].value, 12);
    }

    #[tokio::test]
    async fn test_range_fetch_is_shop_scoped_and_inclusive() {
        let repo = setup_test().await;

        repo.upsert_entries("2024-01-14", Shop::Shoe, &[metric("Revenue", 300)])
            .await
            .unwrap();
        repo.upsert_entries("2024-01-15", Shop::Shoe, &[metric("Revenue", 400)])
            .await
            .unwrap();
        repo.upsert_entries("2024-01-15", Shop::Meatball, &[metric("Sales", 900)])
            .await
            .unwrap();
        repo.upsert_entries("2024-01-16", Shop::Shoe, &[metric("Revenue", 500)])
            .await
            .unwrap();

        let entries = repo
            .entries_for_range(Shop::Shoe, "2024-01-14", "2024-01-15")
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.shop == Shop::Shoe));
        assert_eq!(entries[0].date, "2024-01-14");
        assert_eq!(entries[1].date, "2024-01-15");
    }

    #[tokio::test]
    async fn test_monthly_totals_group_and_sum() {
        let repo = setup_test().await;

        repo.upsert_entries("2024-01-15", Shop::Meatball, &[metric("Sales", 100)])
            .await
            .unwrap();
        repo.upsert_entries("2024-01-22", Shop::Meatball, &[metric("Sales", 150)])
            .await
            .unwrap();
        repo.upsert_entries("2024-02-05", Shop::Meatball, &[metric("Sales", 200)])
            .await
            .unwrap();
        // Other metrics must not leak into the totals
        repo.upsert_entries("2024-01-15", Shop::Meatball, &[metric("Salad Cost", 40)])
            .await
            .unwrap();

        let totals = repo
            .metric_totals_by_period(Shop::Meatball, "Sales", "%Y-%m")
            .await
            .unwrap();

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].period, "2024-01");
        assert_eq!(totals[0].total, 250);
        assert_eq!(totals[1].period, "2024-02");
        assert_eq!(totals[1].total, 200);
    }
}
