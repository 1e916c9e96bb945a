//! Task service: the "move forward" task tree.
//!
//! Tasks form a tree through `parent_task`; the current task is the first
//! pending root. Deleting a task removes its whole subtree.

use anyhow::Result;
use chrono::Local;
use log::info;

use crate::domain::entry_service::parse_date;
use crate::storage::{DbConnection, TaskRepository};
use shared::{
    CreateTaskRequest, CurrentTaskResponse, DeleteTasksResponse, Task, TaskListResponse,
    TaskResponse, TaskStatus, UpdateTaskRequest,
};

/// Service for managing the task tree
#[derive(Clone)]
pub struct TaskService {
    task_repository: TaskRepository,
}

impl TaskService {
    pub fn new(db: DbConnection) -> Self {
        let task_repository = TaskRepository::new(db);
        Self { task_repository }
    }

    pub async fn add_task(&self, request: CreateTaskRequest) -> Result<TaskResponse> {
        if request.name.trim().is_empty() || request.description.trim().is_empty() {
            return Err(anyhow::anyhow!("Task name and description cannot be empty"));
        }
        parse_date(&request.deadline)?;

        if let Some(parent_id) = request.parent_task {
            if self.task_repository.get_task(parent_id).await?.is_none() {
                return Err(anyhow::anyhow!("Parent task {} not found", parent_id));
            }
        }

        let task = self
            .task_repository
            .insert_task(
                request.name.trim(),
                request.description.trim(),
                &request.deadline,
                request.parent_task,
            )
            .await?;
        info!("Added task '{}' (id {})", task.name, task.id);

        Ok(TaskResponse {
            success_message: format!("Task '{}' added successfully", task.name),
            task,
        })
    }

    pub async fn list_tasks(&self) -> Result<TaskListResponse> {
        let tasks = self.task_repository.list_tasks().await?;
        Ok(TaskListResponse { tasks })
    }

    pub async fn update_task(&self, id: i64, request: UpdateTaskRequest) -> Result<TaskResponse> {
        if request.name.trim().is_empty() || request.description.trim().is_empty() {
            return Err(anyhow::anyhow!("Task name and description cannot be empty"));
        }
        parse_date(&request.deadline)?;

        let existing = self
            .task_repository
            .get_task(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Task {} not found", id))?;

        self.task_repository
            .update_task(id, request.name.trim(), request.description.trim(), &request.deadline)
            .await?;

        Ok(TaskResponse {
            task: Task {
                id,
                name: request.name.trim().to_string(),
                description: request.description.trim().to_string(),
                deadline: request.deadline,
                status: existing.status,
                parent_task: existing.parent_task,
            },
            success_message: format!("Task '{}' updated successfully", request.name.trim()),
        })
    }

    pub async fn complete_task(&self, id: i64) -> Result<TaskResponse> {
        let task = self
            .task_repository
            .get_task(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Task {} not found", id))?;

        self.task_repository.complete_task(id).await?;
        info!("Marked task '{}' as completed", task.name);

        Ok(TaskResponse {
            success_message: format!("Task '{}' marked as completed", task.name),
            task: Task {
                status: TaskStatus::Completed,
                ..task
            },
        })
    }

    /// Delete a task and all its subtasks.
    pub async fn delete_task(&self, id: i64) -> Result<DeleteTasksResponse> {
        let task = self
            .task_repository
            .get_task(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Task {} not found", id))?;

        let deleted_count = self.task_repository.delete_subtree(id).await?;
        info!(
            "Deleted task '{}' and its subtasks ({} rows)",
            task.name, deleted_count
        );

        Ok(DeleteTasksResponse {
            deleted_count,
            success_message: format!("Task '{}' and all its subtasks deleted", task.name),
        })
    }

    /// The current main task: the first pending root task, with days left
    /// until its deadline.
    pub async fn current_task(&self) -> Result<CurrentTaskResponse> {
        let today = Local::now().date_naive();
        self.current_task_relative_to(today).await
    }

    async fn current_task_relative_to(
        &self,
        today: chrono::NaiveDate,
    ) -> Result<CurrentTaskResponse> {
        let tasks = self.task_repository.list_tasks().await?;
        let current = tasks
            .into_iter()
            .find(|t| t.status == TaskStatus::Pending && t.parent_task.is_none());

        match current {
            Some(task) => {
                let deadline = parse_date(&task.deadline)?;
                let days_remaining = (deadline - today).num_days();
                Ok(CurrentTaskResponse {
                    task: Some(task),
                    days_remaining: Some(days_remaining),
                })
            }
            None => Ok(CurrentTaskResponse {
                task: None,
                days_remaining: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    async fn create_test_service() -> TaskService {
        let db = DbConnection::init_test().await.unwrap();
        TaskService::new(db)
    }

    fn create_request(name: &str, deadline: &str, parent: Option<i64>) -> CreateTaskRequest {
        CreateTaskRequest {
            name: name.to_string(),
            description: format!("{} description", name),
            deadline: deadline.to_string(),
            parent_task: parent,
        }
    }

    #[tokio::test]
    async fn test_current_task_is_first_pending_root() {
        let service = create_test_service().await;

        let first = service
            .add_task(create_request("First", "2024-03-01", None))
            .await
            .unwrap()
            .task;
        service
            .add_task(create_request("Sub", "2024-03-02", Some(first.id)))
            .await
            .unwrap();
        service
            .add_task(create_request("Second", "2024-03-03", None))
            .await
            .unwrap();

        let current = service.current_task().await.unwrap();
        assert_eq!(current.task.unwrap().name, "First");

        // Completing the first root promotes the next one
        service.complete_task(first.id).await.unwrap();
        let current = service.current_task().await.unwrap();
        assert_eq!(current.task.unwrap().name, "Second");
    }

    #[tokio::test]
    async fn test_days_remaining_counts_down_to_deadline() {
        let service = create_test_service().await;
        service
            .add_task(create_request("Deadline", "2024-03-10", None))
            .await
            .unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let current = service.current_task_relative_to(today).await.unwrap();
        assert_eq!(current.days_remaining, Some(7));

        // A passed deadline goes negative
        let later = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
        let current = service.current_task_relative_to(later).await.unwrap();
        assert_eq!(current.days_remaining, Some(-2));
    }

    #[tokio::test]
    async fn test_no_pending_root_means_no_current_task() {
        let service = create_test_service().await;
        let current = service.current_task().await.unwrap();
        assert!(current.task.is_none());
        assert!(current.days_remaining.is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_subtree_only() {
        let service = create_test_service().await;

        let root = service
            .add_task(create_request("Root", "2024-03-01", None))
            .await
            .unwrap()
            .task;
        let child = service
            .add_task(create_request("Child", "2024-03-02", Some(root.id)))
            .await
            .unwrap()
            .task;
        service
            .add_task(create_request("Grandchild", "2024-03-03", Some(child.id)))
            .await
            .unwrap();
        service
            .add_task(create_request("Keeper", "2024-03-04", None))
            .await
            .unwrap();

        let response = service.delete_task(root.id).await.unwrap();
        assert_eq!(response.deleted_count, 3);

        let remaining = service.list_tasks().await.unwrap().tasks;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Keeper");
    }

    #[tokio::test]
    async fn test_subtask_requires_existing_parent() {
        let service = create_test_service().await;
        let result = service.add_task(create_request("Orphan", "2024-03-01", Some(99))).await;
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
