//! Report service: assembles the date-range reports the presentation layer
//! renders.
//!
//! Fetches rows through the repositories and hands them to the pure engine
//! modules; no arithmetic of its own beyond bucketing rows by week.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::Datelike;
use log::info;

use crate::config::ProfitConfig;
use crate::domain::entry_service::parse_date;
use crate::domain::profit::METRIC_SALES;
use crate::domain::reporting;
use crate::storage::{DbConnection, EntryRepository, InventoryRepository};
use shared::{
    DailyEntry, DateRangeQuery, ProfitPoint, ProfitReport, ProfitVsInventoryResponse,
    SalesByPeriodResponse, SalesPeriod, Shop, ShopReport, WeeklyComparison,
};

/// Service for pivoted shop reports and cross-shop profit reports
#[derive(Clone)]
pub struct ReportService {
    entry_repository: EntryRepository,
    inventory_repository: InventoryRepository,
    config: ProfitConfig,
}

impl ReportService {
    pub fn new(db: DbConnection, config: ProfitConfig) -> Self {
        let entry_repository = EntryRepository::new(db.clone());
        let inventory_repository = InventoryRepository::new(db);
        Self {
            entry_repository,
            inventory_repository,
            config,
        }
    }

    /// Pivoted report for one shop over an inclusive date range: metric
    /// columns plus derived Revenue/Profit per date, and the aggregate
    /// profit for the whole range.
    pub async fn shop_report(&self, shop: Shop, query: DateRangeQuery) -> Result<ShopReport> {
        let start = parse_date(&query.start_date)?;
        let end = parse_date(&query.end_date)?;
        if start > end {
            return Err(anyhow::anyhow!("Start date cannot be after end date"));
        }

        let entries = self
            .entry_repository
            .entries_for_range(shop, &query.start_date, &query.end_date)
            .await?;

        let total_profit = reporting::shop_profit(shop, &entries, &self.config);
        let (metrics, rows) = reporting::build_report_rows(shop, entries, &self.config);

        info!(
            "Generated {} report for {}..{} ({} rows)",
            shop,
            query.start_date,
            query.end_date,
            rows.len()
        );

        Ok(ShopReport {
            shop,
            start_date: query.start_date,
            end_date: query.end_date,
            metrics,
            rows,
            total_profit,
        })
    }

    /// Combined profit report across all shops. Multi-day ranges also carry
    /// a per-day per-shop profit series; single-day ranges skip it.
    pub async fn profit_report(&self, query: DateRangeQuery) -> Result<ProfitReport> {
        let start = parse_date(&query.start_date)?;
        let end = parse_date(&query.end_date)?;
        if start > end {
            return Err(anyhow::anyhow!("Start date cannot be after end date"));
        }

        let mut profits: Vec<(Shop, Vec<DailyEntry>, i64)> = Vec::new();
        for shop in Shop::all() {
            let entries = self
                .entry_repository
                .entries_for_range(shop, &query.start_date, &query.end_date)
                .await?;
            let profit = reporting::shop_profit(shop, &entries, &self.config);
            profits.push((shop, entries, profit));
        }

        let series = if start == end {
            None
        } else {
            let mut points = Vec::new();
            for (shop, entries, _) in &profits {
                for (date, day_entries) in reporting::group_by_date(entries.clone()) {
                    points.push(ProfitPoint {
                        date,
                        shop: *shop,
                        profit: reporting::shop_profit(*shop, &day_entries, &self.config),
                    });
                }
            }
            Some(points)
        };

        let barber_profit = profits[0].2;
        let shoe_profit = profits[1].2;
        let meatball_profit = profits[2].2;

        Ok(ProfitReport {
            start_date: query.start_date,
            end_date: query.end_date,
            barber_profit,
            shoe_profit,
            meatball_profit,
            total_profit: barber_profit + shoe_profit + meatball_profit,
            series,
        })
    }

    /// Meatball sales summed into weekly or monthly buckets.
    pub async fn meatball_sales_by_period(
        &self,
        period: SalesPeriod,
    ) -> Result<SalesByPeriodResponse> {
        let format = match period {
            SalesPeriod::Weekly => "%Y-W%W",
            SalesPeriod::Monthly => "%Y-%m",
        };
        let rows = self
            .entry_repository
            .metric_totals_by_period(Shop::Meatball, METRIC_SALES, format)
            .await?;
        Ok(SalesByPeriodResponse { rows })
    }

    /// Week-by-week comparison of meatball profit and revenue against the
    /// value of the start-of-week inventory. Weeks present on only one side
    /// report zero for the other.
    pub async fn profit_vs_inventory(&self) -> Result<ProfitVsInventoryResponse> {
        let mut merged: BTreeMap<(i32, u32), WeeklyComparison> = BTreeMap::new();

        for (week_number, year, inventory_cost) in
            self.inventory_repository.start_inventory_cost_by_week().await?
        {
            merged.insert(
                (year, week_number),
                WeeklyComparison {
                    week_number,
                    year,
                    inventory_cost,
                    profit: 0,
                    revenue: 0,
                },
            );
        }

        let entries = self.entry_repository.entries_for_shop(Shop::Meatball).await?;
        for (key, week_entries) in bucket_by_week(entries)? {
            let (year, week_number) = key;
            let profit = reporting::shop_profit(Shop::Meatball, &week_entries, &self.config);
            let revenue: i64 = week_entries
                .iter()
                .filter(|e| e.metric == METRIC_SALES)
                .map(|e| e.value)
                .sum();

            let row = merged.entry(key).or_insert_with(|| WeeklyComparison {
                week_number,
                year,
                inventory_cost: 0,
                profit: 0,
                revenue: 0,
            });
            row.profit = profit;
            row.revenue = revenue;
        }

        Ok(ProfitVsInventoryResponse {
            rows: merged.into_values().collect(),
        })
    }
}

/// Bucket entries by (calendar year, ISO week), the same pair snapshots are
/// keyed by, so both sides of the comparison line up.
fn bucket_by_week(
    entries: Vec<DailyEntry>,
) -> Result<BTreeMap<(i32, u32), Vec<DailyEntry>>> {
    let mut buckets: BTreeMap<(i32, u32), Vec<DailyEntry>> = BTreeMap::new();
    for entry in entries {
        let date = parse_date(&entry.date)?;
        let key = (date.year(), date.iso_week().week());
        buckets.entry(key).or_default().push(entry);
    }
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ItemQuantity, MetricValue, SaveSnapshotsRequest, SnapshotType};

    async fn create_test_service() -> (ReportService, crate::domain::EntryService, DbConnection) {
        let db = DbConnection::init_test().await.unwrap();
        let report_service = ReportService::new(db.clone(), ProfitConfig::default());
        let entry_service = crate::domain::EntryService::new(db.clone());
        (report_service, entry_service, db)
    }

    async fn save_day(
        entry_service: &crate::domain::EntryService,
        date: &str,
        shop: Shop,
        entries: Vec<(&str, i64)>,
    ) {
        entry_service
            .save_entries(shared::SaveEntriesRequest {
                date: date.to_string(),
                shop,
                entries: entries
                    .into_iter()
                    .map(|(metric, value)| MetricValue {
                        metric: metric.to_string(),
                        value,
                    })
                    .collect(),
            })
            .await
            .unwrap();
    }

    fn range(start: &str, end: &str) -> DateRangeQuery {
        DateRangeQuery {
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    #[tokio::test]
    async fn test_shop_report_pivots_and_totals() {
        let (report_service, entry_service, _db) = create_test_service().await;

        save_day(
            &entry_service,
            "2024-01-15",
            Shop::Meatball,
            vec![("Sales", 600), ("Salad Cost", 50)],
        )
        .await;
        save_day(&entry_service, "2024-01-16", Shop::Meatball, vec![("Sales", 400)]).await;

        let report = report_service
            .shop_report(Shop::Meatball, range("2024-01-15", "2024-01-16"))
            .await
            .unwrap();

        assert_eq!(report.metrics, vec!["Sales", "Salad Cost"]);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].profit, 50); // 300 - 50 - 200
        assert_eq!(report.rows[1].profit, 0); // 200 - 200
        // Aggregate applies the formula once over the whole range:
        // 1000/2 - 50 - 200
        assert_eq!(report.total_profit, 250);
    }

    #[tokio::test]
    async fn test_shop_report_with_no_data_is_empty_not_an_error() {
        let (report_service, _entry_service, _db) = create_test_service().await;

        let report = report_service
            .shop_report(Shop::Barber, range("2024-01-15", "2024-01-16"))
            .await
            .unwrap();

        assert!(report.metrics.is_empty());
        assert!(report.rows.is_empty());
        assert_eq!(report.total_profit, -260);
    }

    #[tokio::test]
    async fn test_profit_report_totals_and_series() {
        let (report_service, entry_service, _db) = create_test_service().await;

        save_day(
            &entry_service,
            "2024-01-15",
            Shop::Barber,
            vec![("Adult Haircuts", 10), ("Child Haircuts", 5), ("Free Haircuts", 1)],
        )
        .await;
        save_day(&entry_service, "2024-01-15", Shop::Shoe, vec![("Revenue", 500)]).await;
        save_day(
            &entry_service,
            "2024-01-16",
            Shop::Meatball,
            vec![("Sales", 600), ("Salad Cost", 50)],
        )
        .await;

        let report = report_service
            .profit_report(range("2024-01-15", "2024-01-16"))
            .await
            .unwrap();

        // Barber books the default child price: (10*120 + 5*80)/2 - 260
        assert_eq!(report.barber_profit, 540);
        assert_eq!(report.shoe_profit, 390);
        assert_eq!(report.meatball_profit, 50);
        assert_eq!(report.total_profit, 540 + 390 + 50);

        let series = report.series.unwrap();
        assert_eq!(series.len(), 3);
        assert!(series
            .iter()
            .any(|p| p.shop == Shop::Shoe && p.date == "2024-01-15" && p.profit == 390));
    }

    #[tokio::test]
    async fn test_single_day_profit_report_has_no_series() {
        let (report_service, entry_service, _db) = create_test_service().await;
        save_day(&entry_service, "2024-01-15", Shop::Shoe, vec![("Revenue", 500)]).await;

        let report = report_service
            .profit_report(range("2024-01-15", "2024-01-15"))
            .await
            .unwrap();

        assert!(report.series.is_none());
        assert_eq!(report.shoe_profit, 390);
        // Shops with no rows still report their fixed-cost baseline
        assert_eq!(report.barber_profit, -260);
        assert_eq!(report.meatball_profit, -200);
    }

    #[tokio::test]
    async fn test_profit_vs_inventory_outer_joins_weeks() {
        let (report_service, entry_service, db) = create_test_service().await;
        let inventory_service = crate::domain::InventoryService::new(db);

        // Week 3: entries only (Mon 2024-01-15)
        save_day(
            &entry_service,
            "2024-01-15",
            Shop::Meatball,
            vec![("Sales", 600), ("Salad Cost", 50)],
        )
        .await;

        // Week 4: start inventory only (Mon 2024-01-22)
        let item = inventory_service
            .upsert_item(shared::UpsertItemRequest {
                name: "Meatballs".to_string(),
                cost: 5,
            })
            .await
            .unwrap();
        inventory_service
            .save_snapshots(SaveSnapshotsRequest {
                snapshot_type: SnapshotType::Start,
                record_date: "2024-01-22".to_string(),
                quantities: vec![ItemQuantity {
                    item_id: item.id,
                    quantity: 10.0,
                }],
            })
            .await
            .unwrap();

        let report = report_service.profit_vs_inventory().await.unwrap();
        assert_eq!(report.rows.len(), 2);

        // Week 3 has entries but no inventory
        assert_eq!(report.rows[0].week_number, 3);
        assert_eq!(report.rows[0].profit, 50);
        assert_eq!(report.rows[0].revenue, 600);
        assert_eq!(report.rows[0].inventory_cost, 0);

        // Week 4 has inventory but no entries
        assert_eq!(report.rows[1].week_number, 4);
        assert_eq!(report.rows[1].inventory_cost, 50);
        assert_eq!(report.rows[1].profit, 0);
        assert_eq!(report.rows[1].revenue, 0);
    }
}
