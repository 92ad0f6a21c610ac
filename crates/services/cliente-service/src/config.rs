//! Cliente service configuration.

use std::env;

use common::ServiceConfig;

/// Cliente service configuration.
#[derive(Debug, Clone)]
pub struct ClienteServiceConfig {
    /// Bind address and log level
    pub service: ServiceConfig,
    /// Database connection URL
    pub database_url: String,
    /// Enforce the at-least-one-payment-method rule on users
    pub require_payment_method: bool,
}

impl ClienteServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: env::var("CLIENTE_SERVICE_DATABASE_URL")
                .or_else(|_| env::var("DATABASE_URL"))
                .unwrap_or(defaults.database_url),
            service: ServiceConfig {
                host: env::var("CLIENTE_SERVICE_HOST").unwrap_or(defaults.service.host),
                port: env::var("CLIENTE_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.service.port),
                log_level: env::var("CLIENTE_SERVICE_LOG_LEVEL")
                    .unwrap_or(defaults.service.log_level),
                ..defaults.service
            },
            require_payment_method: env::var("CLIENTE_REQUIRE_PAYMENT_METHOD")
                .ok()
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.require_payment_method),
        }
    }
}

impl Default for ClienteServiceConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            database_url: "sqlite://cliente.db?mode=rwc".to_string(),
            require_payment_method: false,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_parsing() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" ON "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn defaults_match_local_sqlite() {
        let config = ClienteServiceConfig::default();
        assert_eq!(config.service.addr(), "0.0.0.0:5000");
        assert_eq!(config.service.log_level, "info");
        assert!(config.database_url.starts_with("sqlite://"));
        assert!(!config.require_payment_method);
    }
}
