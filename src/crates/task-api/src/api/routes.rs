//! API route definitions
//!
//! Defines all API routes and their associated handler functions.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{handlers, middleware::logging_layer};
use crate::db::{DatabaseConnection, SqliteTaskRepository};
use crate::service::{PaginationConfig, TaskService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub tasks: TaskService,
}

impl AppState {
    /// State backed by the SQLite task repository on `db`
    pub fn new(db: DatabaseConnection, pagination: PaginationConfig) -> Self {
        let repo = SqliteTaskRepository::from_connection(&db);
        let tasks = TaskService::new(Arc::new(repo)).with_pagination(pagination);
        Self { db, tasks }
    }
}

/// Build the complete API router
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/tasks",
            post(handlers::create_task).get(handlers::list_tasks),
        )
        .route("/api/tasks/search", get(handlers::search_tasks))
        .route("/api/tasks/due", get(handlers::list_tasks_due))
        .route("/api/tasks/stats", get(handlers::task_stats))
        .route(
            "/api/tasks/status/:status",
            get(handlers::list_tasks_by_status),
        )
        .route(
            "/api/tasks/priority/:priority",
            get(handlers::list_tasks_by_priority),
        )
        .route(
            "/api/tasks/assignee/:email",
            get(handlers::list_tasks_by_assignee),
        )
        .route(
            "/api/tasks/:id",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .with_state(app_state)
        .layer(logging_layer())
}
