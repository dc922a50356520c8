//! CORS middleware configuration
//!
//! Any origin is allowed unless the server is configured with an explicit
//! origin list.

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Create a CORS layer that allows every origin
pub fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Create a CORS layer limited to `allowed_origins`
///
/// Origins that are not valid header values are skipped with a warning.
pub fn cors_layer_restricted(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Pick the CORS layer for a configured origin list; empty means any origin
pub fn cors_for(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        cors_layer()
    } else {
        cors_layer_restricted(allowed_origins)
    }
}
