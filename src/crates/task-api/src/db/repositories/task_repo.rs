//! SQLite-backed task repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::TaskRepository;
use crate::db::connection::{DatabaseConnection, DatabasePool};
use crate::db::error::DbResult;
use crate::db::models::{encode_tags, format_timestamp, search_key, TaskRow};
use crate::model::{
    NewTask, Page, PageRequest, Priority, Sort, SortDirection, SortField, Task, TaskFilter,
    TaskStatus,
};

const FILTER_CLAUSE: &str = "(?1 IS NULL OR status = ?1) AND (?2 IS NULL OR priority = ?2)";

const STATUS_RANK: &str = "CASE status \
     WHEN 'TODO' THEN 0 WHEN 'IN_PROGRESS' THEN 1 WHEN 'REVIEW' THEN 2 \
     WHEN 'DONE' THEN 3 WHEN 'BLOCKED' THEN 4 END";

const PRIORITY_RANK: &str = "CASE priority \
     WHEN 'LOW' THEN 0 WHEN 'MEDIUM' THEN 1 WHEN 'HIGH' THEN 2 WHEN 'URGENT' THEN 3 END";

/// Build the ORDER BY clause for a sort. Columns come from a fixed set, never
/// from client text.
fn order_by(sort: &Sort) -> String {
    let expr = match sort.field {
        SortField::Id => "id",
        SortField::Title => "title",
        SortField::Status => STATUS_RANK,
        SortField::Priority => PRIORITY_RANK,
        SortField::DueDate => "due_date",
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
    };
    let direction = match sort.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };

    if sort.field == SortField::Id {
        format!("id {}", direction)
    } else {
        format!("{} {}, id ASC", expr, direction)
    }
}

fn into_tasks(rows: Vec<TaskRow>) -> DbResult<Vec<Task>> {
    rows.into_iter().map(Task::try_from).collect()
}

/// Task repository over a SQLite pool
#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: DatabasePool,
}

impl SqliteTaskRepository {
    /// Create a repository over an existing pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Create a repository sharing the pool of a connection
    pub fn from_connection(db: &DatabaseConnection) -> Self {
        Self::new(db.pool().clone())
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn create(&self, task: NewTask) -> DbResult<Task> {
        let row = sqlx::query_as::<_, TaskRow>(
            "INSERT INTO tasks (title, description, status, priority, assignee_email, tags,
                                due_date, created_at, updated_at, title_search,
                                description_search)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(&task.assignee_email)
        .bind(encode_tags(&task.tags)?)
        .bind(task.due_date.as_ref().map(format_timestamp))
        .bind(format_timestamp(&task.created_at))
        .bind(format_timestamp(&task.updated_at))
        .bind(search_key(&task.title))
        .bind(task.description.as_deref().map(search_key))
        .fetch_one(&self.pool)
        .await?;

        Task::try_from(row)
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<Task>> {
        sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Task::try_from)
            .transpose()
    }

    async fn find_all(&self, request: &PageRequest, filter: &TaskFilter) -> DbResult<Page<Task>> {
        let status = filter.status.map(|s| s.as_str());
        let priority = filter.priority.map(|p| p.as_str());

        let sql = format!(
            "SELECT * FROM tasks WHERE {} ORDER BY {} LIMIT ?3 OFFSET ?4",
            FILTER_CLAUSE,
            order_by(&request.sort)
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(status)
            .bind(priority)
            .bind(i64::from(request.size))
            .bind(i64::try_from(request.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM tasks WHERE {}", FILTER_CLAUSE);
        let (total,): (i64,) = sqlx::query_as(&count_sql)
            .bind(status)
            .bind(priority)
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(
            into_tasks(rows)?,
            u64::try_from(total).unwrap_or_default(),
            request,
        ))
    }

    async fn save(&self, task: Task) -> DbResult<Task> {
        let row = sqlx::query_as::<_, TaskRow>(
            "INSERT INTO tasks (id, title, description, status, priority, assignee_email, tags,
                                due_date, created_at, updated_at, title_search,
                                description_search)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 title = excluded.title,
                 description = excluded.description,
                 status = excluded.status,
                 priority = excluded.priority,
                 assignee_email = excluded.assignee_email,
                 tags = excluded.tags,
                 due_date = excluded.due_date,
                 created_at = excluded.created_at,
                 updated_at = excluded.updated_at,
                 title_search = excluded.title_search,
                 description_search = excluded.description_search
             RETURNING *",
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(&task.assignee_email)
        .bind(encode_tags(&task.tags)?)
        .bind(task.due_date.as_ref().map(format_timestamp))
        .bind(format_timestamp(&task.created_at))
        .bind(format_timestamp(&task.updated_at))
        .bind(search_key(&task.title))
        .bind(task.description.as_deref().map(search_key))
        .fetch_one(&self.pool)
        .await?;

        Task::try_from(row)
    }

    async fn update(&self, task: Task) -> DbResult<Option<Task>> {
        sqlx::query_as::<_, TaskRow>(
            "UPDATE tasks
             SET title = ?, description = ?, status = ?, priority = ?, assignee_email = ?,
                 tags = ?, due_date = ?, updated_at = ?, title_search = ?,
                 description_search = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(&task.assignee_email)
        .bind(encode_tags(&task.tags)?)
        .bind(task.due_date.as_ref().map(format_timestamp))
        .bind(format_timestamp(&task.updated_at))
        .bind(search_key(&task.title))
        .bind(task.description.as_deref().map(search_key))
        .bind(task.id)
        .fetch_optional(&self.pool)
        .await?
        .map(Task::try_from)
        .transpose()
    }

    async fn delete_by_id(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_id(&self, id: i64) -> DbResult<bool> {
        let (exists,): (i64,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists != 0)
    }

    async fn find_by_status(&self, status: TaskStatus) -> DbResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE status = ? ORDER BY id")
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await?;

        into_tasks(rows)
    }

    async fn find_by_priority(&self, priority: Priority) -> DbResult<Vec<Task>> {
        let rows =
            sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE priority = ? ORDER BY id")
                .bind(priority.as_str())
                .fetch_all(&self.pool)
                .await?;

        into_tasks(rows)
    }

    async fn find_by_assignee(&self, email: &str) -> DbResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT * FROM tasks WHERE assignee_email = ? ORDER BY id",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        into_tasks(rows)
    }

    async fn search(&self, keyword: &str) -> DbResult<Vec<Task>> {
        // Case folding happens in Rust; instr() instead of LIKE so '%' and '_'
        // in the keyword match literally
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT * FROM tasks
             WHERE instr(title_search, ?1) > 0
                OR instr(COALESCE(description_search, ''), ?1) > 0
             ORDER BY id",
        )
        .bind(search_key(keyword))
        .fetch_all(&self.pool)
        .await?;

        into_tasks(rows)
    }

    async fn find_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT * FROM tasks WHERE due_date BETWEEN ? AND ? ORDER BY id",
        )
        .bind(format_timestamp(&from))
        .bind(format_timestamp(&to))
        .fetch_all(&self.pool)
        .await?;

        into_tasks(rows)
    }

    async fn count(&self) -> DbResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_by_status(&self, status: TaskStatus) -> DbResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_by_assignee(&self, email: &str) -> DbResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE assignee_email = ?")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
