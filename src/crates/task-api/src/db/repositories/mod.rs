//! Task persistence gateway
//!
//! [`TaskRepository`] is the narrow storage interface the task service is
//! built on. [`SqliteTaskRepository`] is the production implementation;
//! [`InMemoryTaskRepository`] keeps everything in a map and backs tests.

pub mod memory;
pub mod task_repo;

pub use memory::InMemoryTaskRepository;
pub use task_repo::SqliteTaskRepository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::error::DbResult;
use crate::model::{NewTask, Page, PageRequest, Priority, Task, TaskFilter, TaskStatus};

/// Storage operations over the task collection
///
/// Every predicate query returns tasks ordered by ascending id.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a task and return it with its assigned id
    async fn create(&self, task: NewTask) -> DbResult<Task>;

    /// Get a task by id
    async fn find_by_id(&self, id: i64) -> DbResult<Option<Task>>;

    /// One sorted page of the tasks matching `filter`
    async fn find_all(&self, request: &PageRequest, filter: &TaskFilter) -> DbResult<Page<Task>>;

    /// Insert or replace the task with `task.id`
    async fn save(&self, task: Task) -> DbResult<Task>;

    /// Overwrite an existing task in one conditional write
    ///
    /// Returns `None` when no task with `task.id` exists at write time.
    async fn update(&self, task: Task) -> DbResult<Option<Task>>;

    /// Remove a task; `true` when something was deleted
    async fn delete_by_id(&self, id: i64) -> DbResult<bool>;

    async fn exists_by_id(&self, id: i64) -> DbResult<bool>;

    async fn find_by_status(&self, status: TaskStatus) -> DbResult<Vec<Task>>;

    async fn find_by_priority(&self, priority: Priority) -> DbResult<Vec<Task>>;

    /// Exact match on the assignee email
    async fn find_by_assignee(&self, email: &str) -> DbResult<Vec<Task>>;

    /// Case-insensitive substring match on title or description
    async fn search(&self, keyword: &str) -> DbResult<Vec<Task>>;

    /// Tasks whose due date lies in `[from, to]`
    async fn find_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Vec<Task>>;

    async fn count(&self) -> DbResult<i64>;

    async fn count_by_status(&self, status: TaskStatus) -> DbResult<i64>;

    async fn count_by_assignee(&self, email: &str) -> DbResult<i64>;
}
