use anyhow::Result;
use shared::{Task, TaskStatus};
use sqlx::Row;
use std::collections::HashSet;

use crate::storage::connection::DbConnection;

/// Repository for the task tree
#[derive(Clone)]
pub struct TaskRepository {
    db: DbConnection,
}

impl TaskRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn insert_task(
        &self,
        name: &str,
        description: &str,
        deadline: &str,
        parent_task: Option<i64>,
    ) -> Result<Task> {
        let result = sqlx::query(
            r#"
            INSERT INTO tasks (name, description, deadline, status, parent_task)
            VALUES (?, ?, ?, 'Pending', ?)
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(deadline)
        .bind(parent_task)
        .execute(self.db.pool())
        .await?;

        Ok(Task {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            description: description.to_string(),
            deadline: deadline.to_string(),
            status: TaskStatus::Pending,
            parent_task,
        })
    }

    pub async fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, deadline, status, parent_task
            FROM tasks WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(Self::task_from_row(&r)?)),
            None => Ok(None),
        }
    }

    /// All tasks in insertion order.
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, deadline, status, parent_task
            FROM tasks ORDER BY id
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        let mut tasks = Vec::with_capacity(rows.len());
        for row in &rows {
            tasks.push(Self::task_from_row(row)?);
        }
        Ok(tasks)
    }

    /// Update name, description and deadline. Status is changed only through
    /// `complete_task`. Returns false when the id is unknown.
    pub async fn update_task(
        &self,
        id: i64,
        name: &str,
        description: &str,
        deadline: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET name = ?, description = ?, deadline = ?
            WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(deadline)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn complete_task(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE tasks SET status = 'Completed' WHERE id = ?
            "#,
        )
        .bind(id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a task and every descendant.
    ///
    /// Walks the tree with an explicit worklist over parent references
    /// instead of recursing, so deeply nested chains cannot exhaust the
    /// stack. The whole subtree is removed in one transaction.
    pub async fn delete_subtree(&self, id: i64) -> Result<usize> {
        let mut tx = self.db.pool().begin().await?;

        let mut pending = vec![id];
        let mut seen: HashSet<i64> = HashSet::new();
        let mut subtree: Vec<i64> = Vec::new();

        while let Some(task_id) = pending.pop() {
            if !seen.insert(task_id) {
                continue;
            }
            subtree.push(task_id);

            let rows = sqlx::query(
                r#"
                SELECT id FROM tasks WHERE parent_task = ?
                "#,
            )
            .bind(task_id)
            .fetch_all(&mut *tx)
            .await?;

            for row in &rows {
                pending.push(row.get("id"));
            }
        }

        // Create placeholders for the IN clause
        let placeholders = subtree.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let query_str = format!("DELETE FROM tasks WHERE id IN ({})", placeholders);

        let mut query = sqlx::query(&query_str);
        for task_id in &subtree {
            query = query.bind(*task_id);
        }
        let result = query.execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(result.rows_affected() as usize)
    }

    fn task_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Task> {
        let status: String = row.get("status");
        let status = status
            .parse::<TaskStatus>()
            .map_err(|e| anyhow::anyhow!(e))?;

        Ok(Task {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            deadline: row.get("deadline"),
            status,
            parent_task: row.get("parent_task"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;

    async fn setup_test() -> TaskRepository {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        TaskRepository::new(db)
    }

    #[tokio::test]
    async fn test_insert_and_complete_task() {
        let repo = setup_test().await;

        let task = repo
            .insert_task("Renovate stand", "New counter", "2024-03-01", None)
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);

        assert!(repo.complete_task(task.id).await.unwrap());
        let fetched = repo.get_task(task.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_delete_subtree_removes_exactly_the_subtree() {
        let repo = setup_test().await;

        // root -> child -> grandchild, plus an unrelated sibling tree
        let root = repo
            .insert_task("Root", "r", "2024-03-01", None)
            .await
            .unwrap();
        let child = repo
            .insert_task("Child", "c", "2024-03-02", Some(root.id))
            .await
            .unwrap();
        let _grandchild = repo
            .insert_task("Grandchild", "g", "2024-03-03", Some(child.id))
            .await
            .unwrap();
        let other = repo
            .insert_task("Other", "o", "2024-03-04", None)
            .await
            .unwrap();
        let _other_child = repo
            .insert_task("Other child", "oc", "2024-03-05", Some(other.id))
            .await
            .unwrap();

        let deleted = repo.delete_subtree(root.id).await.unwrap();
        assert_eq!(deleted, 3);

        let remaining = repo.list_tasks().await.unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|t| t.name.starts_with("Other")));
    }

    #[tokio::test]
    async fn test_delete_subtree_handles_deep_chains() {
        let repo = setup_test().await;

        let mut parent: Option<i64> = None;
        for i in 0..200 {
            let task = repo
                .insert_task(&format!("Task {}", i), "chain", "2024-03-01", parent)
                .await
                .unwrap();
            parent = Some(task.id);
        }

        let first = repo.list_tasks().await.unwrap()[0].id;
        let deleted = repo.delete_subtree(first).await.unwrap();
        assert_eq!(deleted, 200);
        assert!(repo.list_tasks().await.unwrap().is_empty());
    }
}
