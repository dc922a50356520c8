//! In-memory task repository
//!
//! Mirrors the SQLite repository's semantics (id assignment, ordering,
//! filtering) over a `BTreeMap`. Used as a fake store in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::TaskRepository;
use crate::db::error::DbResult;
use crate::db::models::search_key;
use crate::model::{
    NewTask, Page, PageRequest, Priority, Sort, SortDirection, SortField, Task, TaskFilter,
    TaskStatus,
};

#[derive(Debug, Default)]
struct Store {
    /// Highest id ever handed out; ids are never reused
    last_id: i64,
    tasks: BTreeMap<i64, Task>,
}

/// Task repository held entirely in process memory
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    store: RwLock<Store>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_where(&self, predicate: impl Fn(&Task) -> bool) -> Vec<Task> {
        self.store
            .read()
            .tasks
            .values()
            .filter(|task| predicate(task))
            .cloned()
            .collect()
    }
}

fn compare(sort: &Sort, a: &Task, b: &Task) -> Ordering {
    let ordering = match sort.field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Title => a.title.cmp(&b.title),
        SortField::Status => a.status.cmp(&b.status),
        SortField::Priority => a.priority.cmp(&b.priority),
        SortField::DueDate => a.due_date.cmp(&b.due_date),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    };
    let ordering = match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    };
    ordering.then_with(|| a.id.cmp(&b.id))
}

fn contains_ignore_case(haystack: &str, needle_key: &str) -> bool {
    search_key(haystack).contains(needle_key)
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: NewTask) -> DbResult<Task> {
        let mut store = self.store.write();
        store.last_id += 1;
        let task = task.into_task(store.last_id);
        store.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<Task>> {
        Ok(self.store.read().tasks.get(&id).cloned())
    }

    async fn find_all(&self, request: &PageRequest, filter: &TaskFilter) -> DbResult<Page<Task>> {
        let mut matching = self.collect_where(|task| filter.matches(task.status, task.priority));
        matching.sort_by(|a, b| compare(&request.sort, a, b));

        let total = matching.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(request.size as usize)
            .collect();

        Ok(Page::new(items, total, request))
    }

    async fn save(&self, task: Task) -> DbResult<Task> {
        let mut store = self.store.write();
        store.last_id = store.last_id.max(task.id);
        store.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(&self, task: Task) -> DbResult<Option<Task>> {
        let mut store = self.store.write();
        match store.tasks.get_mut(&task.id) {
            Some(stored) => {
                let created_at = stored.created_at;
                *stored = Task { created_at, ..task };
                Ok(Some(stored.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: i64) -> DbResult<bool> {
        Ok(self.store.write().tasks.remove(&id).is_some())
    }

    async fn exists_by_id(&self, id: i64) -> DbResult<bool> {
        Ok(self.store.read().tasks.contains_key(&id))
    }

    async fn find_by_status(&self, status: TaskStatus) -> DbResult<Vec<Task>> {
        Ok(self.collect_where(|task| task.status == status))
    }

    async fn find_by_priority(&self, priority: Priority) -> DbResult<Vec<Task>> {
        Ok(self.collect_where(|task| task.priority == priority))
    }

    async fn find_by_assignee(&self, email: &str) -> DbResult<Vec<Task>> {
        Ok(self.collect_where(|task| task.assignee_email.as_deref() == Some(email)))
    }

    async fn search(&self, keyword: &str) -> DbResult<Vec<Task>> {
        let needle = search_key(keyword);
        Ok(self.collect_where(|task| {
            contains_ignore_case(&task.title, &needle)
                || task
                    .description
                    .as_deref()
                    .is_some_and(|d| contains_ignore_case(d, &needle))
        }))
    }

    async fn find_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Vec<Task>> {
        Ok(self.collect_where(|task| task.due_date.is_some_and(|due| from <= due && due <= to)))
    }

    async fn count(&self) -> DbResult<i64> {
        Ok(self.store.read().tasks.len() as i64)
    }

    async fn count_by_status(&self, status: TaskStatus) -> DbResult<i64> {
        Ok(self.find_by_status(status).await?.len() as i64)
    }

    async fn count_by_assignee(&self, email: &str) -> DbResult<i64> {
        Ok(self.find_by_assignee(email).await?.len() as i64)
    }
}
