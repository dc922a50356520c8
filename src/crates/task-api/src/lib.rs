//! Task tracking service
//!
//! A CRUD service for tasks (title, description, status, priority, assignee,
//! tags, due date) exposed over HTTP and stored in SQLite.
//!
//! Requests flow through three layers:
//! - [`api`]: axum router, handlers, DTOs and HTTP error mapping
//! - [`service`]: the task lifecycle manager ([`service::TaskService`])
//! - [`db`]: the task repository gateway and its SQLite/in-memory stores

pub mod api;
pub mod config;
pub mod db;
pub mod model;
pub mod service;
pub mod version;

pub use api::{create_router, AppState};
pub use model::{Priority, Task, TaskStatus};
pub use service::{TaskService, TaskServiceError};

/// Get version information
pub fn version() -> &'static str {
    version::VERSION
}
