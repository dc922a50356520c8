//! Task lifecycle service
//!
//! Validates requests, applies defaults, stamps timestamps and drives the
//! [`TaskRepository`]. Holds no per-request state, so one instance is shared
//! by every handler.

use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::error::{ServiceResult, TaskServiceError};
use super::validation::{
    normalize_tags, parse_priority, parse_sort, parse_status, validate_description,
    validate_due_date, validate_email, validate_not_blank, validate_pagination,
    validate_timestamp, validate_title,
};
use super::dto::{
    CreateTaskRequest, TaskListQuery, TaskResponse, TaskStatsResponse, UpdateTaskRequest,
};
use crate::db::TaskRepository;
use crate::model::{
    timestamp_now, NewTask, Page, PageRequest, Priority, Sort, Task, TaskFilter, TaskStatus,
};

/// Page size limits applied to listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Size used when the request omits one
    pub default_size: u32,
    /// Largest size a request may ask for
    pub max_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_size: 20,
            max_size: 100,
        }
    }
}

/// Update request with every supplied field already validated
struct TaskPatch {
    title: Option<String>,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<Priority>,
    assignee_email: Option<String>,
    tags: Option<BTreeSet<String>>,
    due_date: Option<DateTime<Utc>>,
}

impl TaskPatch {
    fn parse(req: UpdateTaskRequest) -> ServiceResult<Self> {
        if let Some(title) = &req.title {
            validate_title(title)?;
        }
        if let Some(description) = &req.description {
            validate_description(description)?;
        }
        if let Some(email) = &req.assignee_email {
            validate_email(email)?;
        }
        if let Some(due_date) = &req.due_date {
            validate_due_date(due_date)?;
        }

        Ok(Self {
            status: req.status.as_deref().map(parse_status).transpose()?,
            priority: req.priority.as_deref().map(parse_priority).transpose()?,
            tags: req.tags.map(normalize_tags).transpose()?,
            title: req.title,
            description: req.description,
            assignee_email: req.assignee_email,
            due_date: req.due_date,
        })
    }

    /// Field-by-field copy onto the stored task
    fn apply(self, mut task: Task, updated_at: DateTime<Utc>) -> Task {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = Some(description);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(email) = self.assignee_email {
            task.assignee_email = Some(email);
        }
        if let Some(tags) = self.tags {
            task.tags = tags;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        task.updated_at = updated_at;
        task
    }
}

/// Next `updated_at` for a task: now, but always strictly after `previous`
fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = timestamp_now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

fn into_responses(tasks: Vec<Task>) -> Vec<TaskResponse> {
    tasks.into_iter().map(TaskResponse::from).collect()
}

/// Task lifecycle manager
#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
    pagination: PaginationConfig,
}

impl TaskService {
    /// Create a service over a task repository with default page limits
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self {
            repo,
            pagination: PaginationConfig::default(),
        }
    }

    /// Builder method to set the page size limits
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn pagination(&self) -> PaginationConfig {
        self.pagination
    }

    /// Create a task
    ///
    /// Status defaults to TODO and priority to MEDIUM. Nothing is stored when
    /// any field fails validation.
    pub async fn create(&self, req: CreateTaskRequest) -> ServiceResult<TaskResponse> {
        let title = req
            .title
            .ok_or_else(|| TaskServiceError::validation("title is required"))?;
        validate_title(&title)?;
        if let Some(description) = &req.description {
            validate_description(description)?;
        }
        if let Some(email) = &req.assignee_email {
            validate_email(email)?;
        }
        if let Some(due_date) = &req.due_date {
            validate_due_date(due_date)?;
        }
        let status = req
            .status
            .as_deref()
            .map(parse_status)
            .transpose()?
            .unwrap_or(TaskStatus::INITIAL);
        let priority = req
            .priority
            .as_deref()
            .map(parse_priority)
            .transpose()?
            .unwrap_or(Priority::DEFAULT);
        let tags = req.tags.map(normalize_tags).transpose()?.unwrap_or_default();

        let now = timestamp_now();
        let new_task = NewTask {
            title,
            description: req.description,
            status,
            priority,
            assignee_email: req.assignee_email,
            tags,
            due_date: req.due_date,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(new_task).await?;
        tracing::info!("Created task: {}", created.id);
        Ok(created.into())
    }

    /// Get a task by id
    pub async fn get_by_id(&self, id: i64) -> ServiceResult<TaskResponse> {
        let task = self.repo.find_by_id(id).await?.ok_or_else(|| {
            tracing::warn!("Task not found: {}", id);
            TaskServiceError::NotFound(id)
        })?;

        tracing::debug!("Retrieved task: {}", task.id);
        Ok(task.into())
    }

    /// One page of tasks, optionally filtered by status and priority
    pub async fn list(&self, query: TaskListQuery) -> ServiceResult<Page<TaskResponse>> {
        let size = query.size.unwrap_or(self.pagination.default_size);
        validate_pagination(size, self.pagination.max_size)?;

        let sort = match query.sort.as_deref() {
            Some(sort) if !sort.trim().is_empty() => parse_sort(sort)?,
            _ => Sort::default(),
        };
        let filter = TaskFilter {
            status: query.status.as_deref().map(parse_status).transpose()?,
            priority: query.priority.as_deref().map(parse_priority).transpose()?,
        };
        let request = PageRequest::new(query.page.unwrap_or(0), size).with_sort(sort);

        let page = self.repo.find_all(&request, &filter).await?;
        tracing::debug!(
            "Listed {} tasks (total: {})",
            page.items.len(),
            page.total_count
        );
        Ok(page.map(TaskResponse::from))
    }

    /// Apply the fields present in `req` to an existing task
    ///
    /// Validation runs before anything is read or written. The write is
    /// conditional on the task still existing, so a concurrent delete yields
    /// `NotFound` instead of bringing the task back.
    pub async fn update(&self, id: i64, req: UpdateTaskRequest) -> ServiceResult<TaskResponse> {
        if !req.has_updates() {
            tracing::debug!("Empty update for task {}; refreshing updatedAt only", id);
        }
        let patch = TaskPatch::parse(req)?;

        let current = self.repo.find_by_id(id).await?.ok_or_else(|| {
            tracing::warn!("Task not found for update: {}", id);
            TaskServiceError::NotFound(id)
        })?;
        let updated_at = next_updated_at(current.updated_at);
        let merged = patch.apply(current, updated_at);

        let updated = self.repo.update(merged).await?.ok_or_else(|| {
            tracing::warn!("Task {} was deleted before the update was written", id);
            TaskServiceError::NotFound(id)
        })?;

        tracing::info!("Updated task: {}", updated.id);
        Ok(updated.into())
    }

    /// Permanently remove a task
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.repo.delete_by_id(id).await? {
            tracing::warn!("Attempted to delete non-existent task: {}", id);
            return Err(TaskServiceError::NotFound(id));
        }

        tracing::info!("Deleted task: {}", id);
        Ok(())
    }

    pub async fn list_by_status(&self, status: &str) -> ServiceResult<Vec<TaskResponse>> {
        let status = parse_status(status)?;
        Ok(into_responses(self.repo.find_by_status(status).await?))
    }

    pub async fn list_by_priority(&self, priority: &str) -> ServiceResult<Vec<TaskResponse>> {
        let priority = parse_priority(priority)?;
        Ok(into_responses(self.repo.find_by_priority(priority).await?))
    }

    pub async fn list_by_assignee(&self, email: &str) -> ServiceResult<Vec<TaskResponse>> {
        Ok(into_responses(self.repo.find_by_assignee(email).await?))
    }

    /// Case-insensitive substring search over title and description
    pub async fn search_by_keyword(&self, keyword: &str) -> ServiceResult<Vec<TaskResponse>> {
        validate_not_blank(keyword, "keyword")?;
        Ok(into_responses(self.repo.search(keyword).await?))
    }

    /// Tasks due within `[from, to]`
    pub async fn list_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ServiceResult<Vec<TaskResponse>> {
        validate_timestamp(&from, "from")?;
        validate_timestamp(&to, "to")?;
        if from > to {
            return Err(TaskServiceError::validation(
                "from must not be later than to",
            ));
        }
        Ok(into_responses(self.repo.find_due_between(from, to).await?))
    }

    /// Total count plus a count for every status
    pub async fn stats(&self) -> ServiceResult<TaskStatsResponse> {
        let mut by_status = BTreeMap::new();
        for status in TaskStatus::ALL {
            by_status.insert(status, self.repo.count_by_status(status).await?);
        }

        Ok(TaskStatsResponse {
            total: self.repo.count().await?,
            by_status,
        })
    }

    pub async fn count_by_assignee(&self, email: &str) -> ServiceResult<i64> {
        Ok(self.repo.count_by_assignee(email).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryTaskRepository;

    fn service() -> TaskService {
        TaskService::new(Arc::new(InMemoryTaskRepository::new()))
    }

    #[test]
    fn test_next_updated_at_is_strictly_later() {
        let future = timestamp_now() + Duration::hours(1);
        assert_eq!(next_updated_at(future), future + Duration::microseconds(1));

        let past = timestamp_now() - Duration::hours(1);
        assert!(next_updated_at(past) > past);
    }

    #[test]
    fn test_patch_rejects_blank_title() {
        let req = UpdateTaskRequest {
            title: Some("  ".to_string()),
            ..UpdateTaskRequest::default()
        };
        assert!(TaskPatch::parse(req).is_err());
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let created = service()
            .create(CreateTaskRequest::titled("Write spec"))
            .await
            .unwrap();

        assert_eq!(created.status, TaskStatus::Todo);
        assert_eq!(created.priority, Priority::Medium);
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_create_missing_title() {
        let err = service()
            .create(CreateTaskRequest::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_list_rejects_oversized_page() {
        let service = service().with_pagination(PaginationConfig {
            default_size: 5,
            max_size: 10,
        });
        let query = TaskListQuery {
            size: Some(11),
            ..TaskListQuery::default()
        };
        assert!(service.list(query).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_list_uses_default_size() {
        let service = service().with_pagination(PaginationConfig {
            default_size: 5,
            max_size: 10,
        });
        let page = service.list(TaskListQuery::default()).await.unwrap();
        assert_eq!(page.size, 5);
        assert_eq!(page.page, 0);
    }
}
