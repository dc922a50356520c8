//! REST API layer
//!
//! Provides HTTP/REST endpoints for task operations:
//! - Task CRUD
//! - Lookups by status, priority, assignee, keyword and due date
//! - Task statistics and service health

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use middleware::{cors_for, cors_layer};
pub use routes::{create_router, AppState};

