//! Domain model
//!
//! The task entity, its enumerations, and the paging types shared by the
//! service and persistence layers.

pub mod page;
pub mod task;

pub use page::{Page, PageRequest, Sort, SortDirection, SortField, SortParseError, TaskFilter};
pub use task::{timestamp_now, NewTask, Priority, Task, TaskStatus, UnknownVariant};
