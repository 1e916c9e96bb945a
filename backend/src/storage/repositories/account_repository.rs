use anyhow::Result;
use shared::Account;
use sqlx::Row;

use crate::storage::connection::DbConnection;

/// Repository for savings accounts
#[derive(Clone)]
pub struct AccountRepository {
    db: DbConnection,
}

impl AccountRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn insert_account(&self, name: &str, balance: i64, goal: i64) -> Result<Account> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (name, balance, goal)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(balance)
        .bind(goal)
        .execute(self.db.pool())
        .await?;

        Ok(Account {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            balance,
            goal,
        })
    }

    pub async fn get_account(&self, id: i64) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, balance, goal FROM accounts WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| Account {
            id: r.get("id"),
            name: r.get("name"),
            balance: r.get("balance"),
            goal: r.get("goal"),
        }))
    }

    pub async fn get_account_by_name(&self, name: &str) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, balance, goal FROM accounts WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| Account {
            id: r.get("id"),
            name: r.get("name"),
            balance: r.get("balance"),
            goal: r.get("goal"),
        }))
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, balance, goal FROM accounts ORDER BY id
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        let accounts = rows
            .iter()
            .map(|row| Account {
                id: row.get("id"),
                name: row.get("name"),
                balance: row.get("balance"),
                goal: row.get("goal"),
            })
            .collect();
        Ok(accounts)
    }

    /// Full-field update. Returns false when the id is unknown.
    pub async fn update_account(
        &self,
        id: i64,
        name: &str,
        balance: i64,
        goal: i64,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET name = ?, balance = ?, goal = ?
            WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(balance)
        .bind(goal)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update_balance(&self, id: i64, balance: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE accounts SET balance = ? WHERE id = ?
            "#,
        )
        .bind(balance)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_account(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM accounts WHERE id = ?
            "#,
        )
        .bind(id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
