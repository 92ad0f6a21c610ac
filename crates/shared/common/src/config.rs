//! Shared configuration structures.

use serde::{Deserialize, Serialize};

/// Base service configuration shared by all services.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Service name for logging and tracing
    pub service_name: String,
    /// Host address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Log level
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "cliente-service".to_string(),
            host: "0.0.0.0".to_string(),
            port: 5000,
            log_level: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Socket address string (`host:port`).
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://cliente.db?mode=rwc".to_string(),
            max_connections: 10,
            min_connections: 1,
        }
    }
}

impl DatabaseConfig {
    /// In-memory SQLite databases vanish with their connection, so the pool
    /// is pinned to a single one.
    pub fn for_url(url: impl Into<String>) -> Self {
        let url = url.into();
        if url.contains(":memory:") {
            Self {
                url,
                max_connections: 1,
                min_connections: 1,
            }
        } else {
            Self {
                url,
                ..Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_sqlite_uses_single_connection() {
        let config = DatabaseConfig::for_url("sqlite::memory:");
        assert_eq!(config.max_connections, 1);

        let config = DatabaseConfig::for_url("postgres://localhost/cliente");
        assert_eq!(config.max_connections, 10);
    }
}
