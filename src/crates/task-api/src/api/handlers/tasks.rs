//! Task endpoint handlers
//!
//! Thin adapters: extract, call the task service, map the outcome to a
//! response. Extraction failures come back as 400 through `ApiError`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    Json,
};

use crate::api::{
    error::ApiResult,
    models::{CreateTaskRequest, DueRangeQuery, KeywordQuery, TaskListQuery, UpdateTaskRequest},
    response,
    routes::AppState,
};

/// Create a new task
///
/// POST /api/tasks
pub async fn create_task(
    State(app_state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let created = app_state.tasks.create(req).await?;
    Ok(response::created(created))
}

/// List tasks with pagination, sorting and optional filters
///
/// GET /api/tasks?page=0&size=20&sort=createdAt,desc&status=TODO&priority=HIGH
pub async fn list_tasks(
    State(app_state): State<AppState>,
    query: Result<Query<TaskListQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let page = app_state.tasks.list(query).await?;
    Ok(response::paginated(page))
}

/// Get a single task by ID
///
/// GET /api/tasks/:id
pub async fn get_task(
    State(app_state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id?;
    let task = app_state.tasks.get_by_id(id).await?;
    Ok(response::ok(task))
}

/// Update an existing task; absent fields are left unchanged
///
/// PUT /api/tasks/:id
pub async fn update_task(
    State(app_state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id?;
    let Json(req) = payload?;
    let task = app_state.tasks.update(id, req).await?;
    Ok(response::ok(task))
}

/// Delete a task
///
/// DELETE /api/tasks/:id
pub async fn delete_task(
    State(app_state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id?;
    app_state.tasks.delete(id).await?;
    Ok(response::no_content())
}

/// GET /api/tasks/status/:status
pub async fn list_tasks_by_status(
    State(app_state): State<AppState>,
    Path(status): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let tasks = app_state.tasks.list_by_status(&status).await?;
    Ok(response::ok(tasks))
}

/// GET /api/tasks/priority/:priority
pub async fn list_tasks_by_priority(
    State(app_state): State<AppState>,
    Path(priority): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let tasks = app_state.tasks.list_by_priority(&priority).await?;
    Ok(response::ok(tasks))
}

/// GET /api/tasks/assignee/:email
pub async fn list_tasks_by_assignee(
    State(app_state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let tasks = app_state.tasks.list_by_assignee(&email).await?;
    Ok(response::ok(tasks))
}

/// Keyword search over title and description
///
/// GET /api/tasks/search?keyword=login
pub async fn search_tasks(
    State(app_state): State<AppState>,
    query: Result<Query<KeywordQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let keyword = query.keyword.unwrap_or_default();
    let tasks = app_state.tasks.search_by_keyword(&keyword).await?;
    Ok(response::ok(tasks))
}

/// Tasks due within an inclusive range
///
/// GET /api/tasks/due?from=2025-01-01T00:00:00Z&to=2025-01-31T23:59:59Z
pub async fn list_tasks_due(
    State(app_state): State<AppState>,
    query: Result<Query<DueRangeQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(range) = query?;
    let tasks = app_state.tasks.list_due_between(range.from, range.to).await?;
    Ok(response::ok(tasks))
}

/// Task counts by status
///
/// GET /api/tasks/stats
pub async fn task_stats(State(app_state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let stats = app_state.tasks.stats().await?;
    Ok(response::ok(stats))
}
