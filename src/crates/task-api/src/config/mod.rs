//! Configuration module
//!
//! Server configuration (listener, database, pagination limits) loaded from
//! TOML with environment overrides.

pub mod server;

pub use server::{
    DatabaseConfig, PaginationSettings, ServerConfig, ServerConfigError, ServerInfoConfig,
};
