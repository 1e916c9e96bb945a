use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:business_tracker.db";

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        // Connect to the database
        let pool = SqlitePool::connect(url).await?;

        // Setup database schema
        Self::ensure_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize the standard database
    pub async fn init() -> Result<Self> {
        Self::new(DATABASE_URL).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema. Safe to call more than once;
    /// every statement is `IF NOT EXISTS`.
    async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
        // Create daily_entries table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS daily_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                shop TEXT NOT NULL,
                metric TEXT NOT NULL,
                value INTEGER NOT NULL,
                UNIQUE(date, shop, metric)
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for date-range queries per shop
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_daily_entries_shop_date
            ON daily_entries(shop, date);
            "#,
        )
        .execute(pool)
        .await?;

        // Create inventory_items table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS inventory_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                cost INTEGER NOT NULL,
                UNIQUE(name)
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create weekly_inventory table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS weekly_inventory (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                item_id INTEGER NOT NULL,
                inventory_type TEXT NOT NULL CHECK (inventory_type IN ('start', 'end')),
                quantity REAL NOT NULL,
                record_date TEXT NOT NULL,
                week_number INTEGER NOT NULL,
                year INTEGER NOT NULL,
                FOREIGN KEY (item_id) REFERENCES inventory_items (id),
                UNIQUE(item_id, inventory_type, week_number, year)
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for per-week snapshot lookups
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_weekly_inventory_week
            ON weekly_inventory(inventory_type, year, week_number);
            "#,
        )
        .execute(pool)
        .await?;

        // Create weekly_tracking table (completeness flags per week)
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS weekly_tracking (
                week_number INTEGER NOT NULL,
                year INTEGER NOT NULL,
                start_inventory BOOLEAN NOT NULL DEFAULT 0,
                end_inventory BOOLEAN NOT NULL DEFAULT 0,
                UNIQUE(week_number, year)
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create accounts table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                balance INTEGER NOT NULL,
                goal INTEGER NOT NULL,
                UNIQUE(name)
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create tasks table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                deadline TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'Pending',
                parent_task INTEGER,
                FOREIGN KEY (parent_task) REFERENCES tasks (id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for child lookups during subtree deletes
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_tasks_parent_task
            ON tasks(parent_task);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
