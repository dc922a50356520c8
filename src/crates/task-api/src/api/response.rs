//! API response helpers
//!
//! Provides convenient helper functions for creating consistent API responses
//! with proper HTTP status codes and JSON serialization.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::api::models::PageResponse;
use crate::model::Page;

/// Create a 200 OK JSON response
pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, Json(data))
}

/// Create a 201 Created JSON response
pub fn created<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::CREATED, Json(data))
}

/// Create a 204 No Content response
pub fn no_content() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

/// Create a 200 OK paginated response
pub fn paginated<T: Serialize>(page: Page<T>) -> impl IntoResponse {
    (StatusCode::OK, Json(PageResponse::from(page)))
}
