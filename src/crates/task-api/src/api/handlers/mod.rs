//! API request handlers
//!
//! Provides handler functions for all API endpoints organized by resource.

pub mod health;
pub mod tasks;

pub use health::health;
pub use tasks::{
    create_task, delete_task, get_task, list_tasks, list_tasks_by_assignee,
    list_tasks_by_priority, list_tasks_by_status, list_tasks_due, search_tasks, task_stats,
    update_task,
};
