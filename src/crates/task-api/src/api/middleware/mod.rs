//! API middleware layer
//!
//! Provides middleware for request processing: CORS and request logging.

pub mod cors;
pub mod logging;

pub use cors::{cors_for, cors_layer, cors_layer_restricted};
pub use logging::logging_layer;
