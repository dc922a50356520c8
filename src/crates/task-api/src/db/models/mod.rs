//! Database row models

pub mod task;

pub use task::{encode_tags, format_timestamp, parse_timestamp, search_key, TaskRow};
