//! API data transfer objects (DTOs) and response models
//!
//! Provides request/response structures for API endpoints.

pub mod task;

pub use task::{
    CreateTaskRequest, DueRangeQuery, KeywordQuery, PageResponse, TaskListQuery, TaskResponse,
    TaskStatsResponse, UpdateTaskRequest,
};

/// System health response
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,

    /// Database connection status
    pub database: String,

    /// API version
    pub version: String,

    /// Current timestamp
    pub timestamp: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn new(status: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            database: database.into(),
            version: crate::version::VERSION.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
