//! Server configuration for task-api-server
//!
//! Loads and parses the task-api.toml configuration file. Every field has a
//! default, so an absent file or a partial one is fine.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::service::PaginationConfig;

/// Database path that selects a private in-memory database
pub const IN_MEMORY_PATH: &str = ":memory:";

#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// HTTP listener and identification settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerInfoConfig {
    /// Server name for identification in logs
    pub name: String,
    /// Listen address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerInfoConfig {
    fn default() -> Self {
        Self {
            name: "task-api".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file path, or ":memory:"
    pub path: String,
    /// Connection pool size
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "tasks.db".to_string(),
            max_connections: crate::db::connection::DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_PATH
    }
}

/// Page size limits for task listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    pub default_size: u32,
    pub max_size: u32,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        let defaults = PaginationConfig::default();
        Self {
            default_size: defaults.default_size,
            max_size: defaults.max_size,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener settings
    pub server: ServerInfoConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Listing limits
    pub pagination: PaginationSettings,
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ServerConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServerConfigError::ReadError(path.to_path_buf(), e))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ServerConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path or the default locations
    ///
    /// Without an explicit path, searches:
    /// 1. ./config/task-api.toml
    /// 2. ./task-api.toml
    ///
    /// and falls back to built-in defaults when neither exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ServerConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let paths = [
            PathBuf::from("config/task-api.toml"),
            PathBuf::from("task-api.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading configuration from {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Apply `HOST`, `PORT` and `DATABASE_PATH` overrides
    ///
    /// `lookup` is normally `|key| std::env::var(key).ok()`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ServerConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.parse().map_err(|_| {
                ServerConfigError::InvalidConfig(format!("PORT must be a valid u16: {}", port))
            })?;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            self.database.path = path;
        }
        self.validate()
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ServerConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ServerConfigError::InvalidConfig(
                "database.path cannot be empty".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ServerConfigError::InvalidConfig(
                "database.max_connections must be greater than 0".to_string(),
            ));
        }
        let pagination = &self.pagination;
        if pagination.max_size == 0
            || pagination.default_size == 0
            || pagination.default_size > pagination.max_size
        {
            return Err(ServerConfigError::InvalidConfig(format!(
                "pagination requires 0 < default_size ({}) <= max_size ({})",
                pagination.default_size, pagination.max_size
            )));
        }
        Ok(())
    }

    /// Get database URL from configuration
    pub fn database_url(&self) -> String {
        if self.database.is_in_memory() {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite://{}", self.database.path)
        }
    }

    /// Listen address
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| {
                ServerConfigError::InvalidConfig(format!(
                    "Invalid listen address {}:{}: {}",
                    self.server.host, self.server.port, e
                ))
            })
    }

    /// Listing limits for the task service
    pub fn pagination(&self) -> PaginationConfig {
        PaginationConfig {
            default_size: self.pagination.default_size,
            max_size: self.pagination.max_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_parsing() {
        let toml_content = r#"
[server]
name = "tasks-prod"
host = "0.0.0.0"
port = 9000
cors_origins = ["https://tasks.example.com"]

[database]
path = "/var/lib/tasks/tasks.db"
max_connections = 8

[pagination]
default_size = 25
max_size = 200
"#;

        let config = ServerConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.server.name, "tasks-prod");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.cors_origins.len(), 1);
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.database_url(), "sqlite:///var/lib/tasks/tasks.db");
        assert_eq!(config.pagination().default_size, 25);
        assert_eq!(config.socket_addr().unwrap().port(), 9000);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database_url(), "sqlite://tasks.db");
        assert_eq!(config.pagination(), PaginationConfig::default());
    }

    #[test]
    fn test_bundled_config_matches_defaults() {
        let config = ServerConfig::from_toml_str(include_str!("../../config/task-api.toml")).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = ServerConfig::from_toml_str("[server]\nport = 3000\n").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_pagination_rejected() {
        let result = ServerConfig::from_toml_str("[pagination]\ndefault_size = 50\nmax_size = 10\n");
        assert!(matches!(result, Err(ServerConfigError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = ServerConfig::from_toml_str("[server\nport = ");
        assert!(matches!(result, Err(ServerConfigError::ParseError(_))));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [("PORT", "7070"), ("DATABASE_PATH", ":memory:")]
            .into_iter()
            .collect();
        let mut config = ServerConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 7070);
        assert!(config.database.is_in_memory());
        assert_eq!(config.database_url(), "sqlite::memory:");
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = ServerConfig::default();
        let result = config.apply_overrides(|key| (key == "PORT").then(|| "eighty".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("task-api.toml");
        std::fs::write(&path, "[database]\npath = \"other.db\"\n").unwrap();

        let config = ServerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.database.path, "other.db");

        let missing = ServerConfig::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(missing, Err(ServerConfigError::ReadError(_, _))));
    }
}
