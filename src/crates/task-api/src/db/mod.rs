//! Database module
//!
//! Provides database connectivity, row models, the task repository gateway,
//! and error handling for persistent storage of tasks.

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;

pub use connection::{DatabaseConnection, DatabasePool};
pub use error::{DatabaseError, DbResult};
pub use repositories::{InMemoryTaskRepository, SqliteTaskRepository, TaskRepository};
