//! Task API models and DTOs
//!
//! HTTP-only query and listing shapes. The task request/response bodies are
//! the task service's own types, re-exported here for the handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Page;

pub use crate::service::dto::{
    CreateTaskRequest, TaskListQuery, TaskResponse, TaskStatsResponse, UpdateTaskRequest,
};

/// Query parameters for keyword search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordQuery {
    pub keyword: Option<String>,
}

/// Query parameters for the due-date range lookup (inclusive)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueRangeQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Paginated task listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Number of items across all pages
    pub total_count: u64,
    /// Current page number (0-indexed)
    pub page: u32,
    /// Requested page size
    pub size: u32,
    /// Total number of pages
    pub total_pages: u64,
}

impl<T> From<Page<T>> for PageResponse<T> {
    fn from(page: Page<T>) -> Self {
        let total_pages = page.total_pages();
        Self {
            items: page.items,
            total_count: page.total_count,
            page: page.page,
            size: page.size,
            total_pages,
        }
    }
}
