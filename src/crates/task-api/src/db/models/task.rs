//! Task row model for database persistence

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::FromRow;
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::db::error::{DatabaseError, DbResult};
use crate::model::{Task, UnknownVariant};

/// Raw `tasks` row
///
/// # Timestamps
/// All timestamp columns are RFC 3339 strings written with microsecond
/// precision and a `Z` suffix, so text comparison orders them chronologically.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub assignee_email: Option<String>,
    /// JSON array of tag strings
    pub tags: String,
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Format a timestamp the way the `tasks` table stores it
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp column
pub fn parse_timestamp(value: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DatabaseError::type_error(format!("Invalid timestamp '{}': {}", value, e)))
}

/// Case-folded form stored in the `*_search` columns and used for keyword
/// lookups
pub fn search_key(text: &str) -> String {
    text.to_lowercase()
}

/// Serialize a tag set into its JSON column value
pub fn encode_tags(tags: &BTreeSet<String>) -> DbResult<String> {
    Ok(serde_json::to_string(tags)?)
}

/// Enum columns are constrained by CHECK, so a failure here means the row was
/// written outside this crate
fn parse_enum<T: FromStr<Err = UnknownVariant>>(value: &str) -> DbResult<T> {
    value
        .parse()
        .map_err(|e| DatabaseError::type_error(format!("Stored {}", e)))
}

impl TryFrom<TaskRow> for Task {
    type Error = DatabaseError;

    fn try_from(row: TaskRow) -> DbResult<Self> {
        Ok(Task {
            id: row.id,
            title: row.title,
            description: row.description,
            status: parse_enum(&row.status)?,
            priority: parse_enum(&row.priority)?,
            assignee_email: row.assignee_email,
            tags: serde_json::from_str(&row.tags)?,
            due_date: row.due_date.as_deref().map(parse_timestamp).transpose()?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}
