//! Pagination, sorting and filtering inputs plus the page envelope

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use super::task::{Priority, TaskStatus};

/// Sort parameter that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortParseError {
    #[error("Unknown sort field: {0}")]
    UnknownField(String),
    #[error("Unknown sort direction: {0}")]
    UnknownDirection(String),
}

/// Fields a task listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    Title,
    Status,
    Priority,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Name used in the `sort` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Status => "status",
            SortField::Priority => "priority",
            SortField::DueDate => "dueDate",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }
}

impl FromStr for SortField {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortField::Id),
            "title" => Ok(SortField::Title),
            "status" => Ok(SortField::Status),
            "priority" => Ok(SortField::Priority),
            "dueDate" | "due_date" => Ok(SortField::DueDate),
            "createdAt" | "created_at" => Ok(SortField::CreatedAt),
            "updatedAt" | "updated_at" => Ok(SortField::UpdatedAt),
            other => Err(SortParseError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(SortParseError::UnknownDirection(s.to_string()))
        }
    }
}

/// Ordering for a listing. Ties are always broken by ascending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

impl FromStr for Sort {
    type Err = SortParseError;

    /// Parses `field` or `field,asc|desc`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ',');
        let field = parts.next().unwrap_or_default().trim().parse()?;
        let direction = match parts.next() {
            Some(dir) => dir.trim().parse()?,
            None => SortDirection::Asc,
        };
        Ok(Self { field, direction })
    }
}

/// A validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page number
    pub page: u32,
    /// Items per page, never zero
    pub size: u32,
    pub sort: Sort,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: Sort::default(),
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Number of items to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// Optional predicates narrowing a paginated listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
}

impl TaskFilter {
    pub fn matches(&self, status: TaskStatus, priority: Priority) -> bool {
        self.status.map_or(true, |s| s == status) && self.priority.map_or(true, |p| p == priority)
    }
}

/// One page of results plus the size of the whole result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64, request: &PageRequest) -> Self {
        Self {
            items,
            total_count,
            page: request.page,
            size: request.size,
        }
    }

    /// Convert every item, keeping the paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            size: self.size,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(self.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parse_field_only() {
        let sort: Sort = "title".parse().unwrap();
        assert_eq!(sort, Sort::new(SortField::Title, SortDirection::Asc));
    }

    #[test]
    fn test_sort_parse_with_direction() {
        let sort: Sort = "createdAt,DESC".parse().unwrap();
        assert_eq!(sort, Sort::new(SortField::CreatedAt, SortDirection::Desc));

        let sort: Sort = "due_date, asc".parse().unwrap();
        assert_eq!(sort.field, SortField::DueDate);
    }

    #[test]
    fn test_sort_parse_errors() {
        assert_eq!(
            "owner".parse::<Sort>(),
            Err(SortParseError::UnknownField("owner".to_string()))
        );
        assert_eq!(
            "id,sideways".parse::<Sort>(),
            Err(SortParseError::UnknownDirection("sideways".to_string()))
        );
    }

    #[test]
    fn test_page_request_offset() {
        assert_eq!(PageRequest::new(0, 20).offset(), 0);
        assert_eq!(PageRequest::new(3, 25).offset(), 75);
    }

    #[test]
    fn test_total_pages() {
        let request = PageRequest::new(0, 10);
        assert_eq!(Page::<i32>::new(vec![], 25, &request).total_pages(), 3);
        assert_eq!(Page::<i32>::new(vec![], 20, &request).total_pages(), 2);
        assert_eq!(Page::<i32>::new(vec![], 0, &request).total_pages(), 0);
    }

    #[test]
    fn test_page_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], 12, &PageRequest::new(1, 2)).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total_count, 12);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn test_filter_matches() {
        let filter = TaskFilter {
            status: Some(TaskStatus::Done),
            priority: None,
        };
        assert!(filter.matches(TaskStatus::Done, Priority::Low));
        assert!(!filter.matches(TaskStatus::Todo, Priority::Low));
        assert!(TaskFilter::default().matches(TaskStatus::Blocked, Priority::Urgent));
    }
}
