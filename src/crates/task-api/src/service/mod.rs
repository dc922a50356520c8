//! Task lifecycle management
//!
//! [`TaskService`] sits between the HTTP handlers and the task repository.
//! It owns validation, defaulting, timestamping, and the mapping between
//! request/response shapes and the stored entity.

pub mod dto;
pub mod error;
pub mod task;
pub mod validation;

pub use dto::{
    CreateTaskRequest, TaskListQuery, TaskResponse, TaskStatsResponse, UpdateTaskRequest,
};
pub use error::{ServiceResult, TaskServiceError};
pub use task::{PaginationConfig, TaskService};
