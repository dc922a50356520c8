//! Input validation for task operations
//!
//! Every check returns [`TaskServiceError::Validation`] with a message naming
//! the offending field.

use chrono::{DateTime, Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use super::error::{ServiceResult, TaskServiceError};
use crate::model::{Priority, Sort, TaskStatus};

pub const TITLE_MAX_LEN: usize = 255;
pub const DESCRIPTION_MAX_LEN: usize = 2000;
pub const EMAIL_MAX_LEN: usize = 254;
pub const TAG_MAX_LEN: usize = 50;
/// Timestamps are stored as fixed-width RFC 3339 text, which only has room
/// for four-digit, unsigned years
pub const MIN_YEAR: i32 = 0;
pub const MAX_YEAR: i32 = 9999;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Validate that a required string field is present and not blank
pub fn validate_not_blank(value: &str, field_name: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(TaskServiceError::validation(format!(
            "{} cannot be empty",
            field_name
        )));
    }
    Ok(())
}

/// Validate an upper bound on length, counted in characters
pub fn validate_max_length(value: &str, field_name: &str, max: usize) -> ServiceResult<()> {
    if value.chars().count() > max {
        return Err(TaskServiceError::validation(format!(
            "{} must be at most {} characters",
            field_name, max
        )));
    }
    Ok(())
}

/// Validate a title: present, not blank, bounded
pub fn validate_title(title: &str) -> ServiceResult<()> {
    validate_not_blank(title, "title")?;
    validate_max_length(title, "title", TITLE_MAX_LEN)
}

pub fn validate_description(description: &str) -> ServiceResult<()> {
    validate_max_length(description, "description", DESCRIPTION_MAX_LEN)
}

/// Validate an assignee as an email-shaped string
pub fn validate_email(value: &str) -> ServiceResult<()> {
    validate_max_length(value, "assigneeEmail", EMAIL_MAX_LEN)?;
    if !EMAIL_RE.is_match(value) {
        return Err(TaskServiceError::validation(format!(
            "assigneeEmail must be a valid email address: {}",
            value
        )));
    }
    Ok(())
}

/// Validate that a timestamp fits the stored four-digit year range
pub fn validate_timestamp(value: &DateTime<Utc>, field_name: &str) -> ServiceResult<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&value.year()) {
        return Err(TaskServiceError::validation(format!(
            "{} year must be between {} and {}",
            field_name, MIN_YEAR, MAX_YEAR
        )));
    }
    Ok(())
}

pub fn validate_due_date(due_date: &DateTime<Utc>) -> ServiceResult<()> {
    validate_timestamp(due_date, "dueDate")
}

pub fn parse_status(value: &str) -> ServiceResult<TaskStatus> {
    value
        .parse()
        .map_err(|e: crate::model::UnknownVariant| TaskServiceError::validation(e.to_string()))
}

pub fn parse_priority(value: &str) -> ServiceResult<Priority> {
    value
        .parse()
        .map_err(|e: crate::model::UnknownVariant| TaskServiceError::validation(e.to_string()))
}

/// Trim tags and collapse duplicates; blank or oversized tags are rejected
pub fn normalize_tags(tags: Vec<String>) -> ServiceResult<BTreeSet<String>> {
    tags.into_iter()
        .map(|tag| {
            let tag = tag.trim();
            validate_not_blank(tag, "tag")?;
            validate_max_length(tag, "tag", TAG_MAX_LEN)?;
            Ok(tag.to_string())
        })
        .collect()
}

/// Validate pagination parameters
pub fn validate_pagination(size: u32, max_size: u32) -> ServiceResult<()> {
    if size == 0 {
        return Err(TaskServiceError::validation("size must be greater than 0"));
    }
    if size > max_size {
        return Err(TaskServiceError::validation(format!(
            "size cannot exceed {}",
            max_size
        )));
    }
    Ok(())
}

pub fn parse_sort(value: &str) -> ServiceResult<Sort> {
    value
        .parse()
        .map_err(|e: crate::model::SortParseError| TaskServiceError::validation(e.to_string()))
}
