//! Database configuration module

use serde::{Deserialize, Serialize};

use super::parse_var;

/// Database configuration for the MySQL connection pool
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout: u64,

    /// Maximum lifetime of a connection in seconds
    pub max_lifetime: u64,

    /// Enable SQL statement logging
    #[serde(default)]
    pub enable_logging: bool,

    /// Slow query threshold in milliseconds
    #[serde(default = "default_slow_query_threshold")]
    pub slow_query_threshold: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::from("mysql://localhost:3306/hr_auth"),
            max_connections: 10,
            connect_timeout: 30,
            idle_timeout: 600,
            max_lifetime: 1800,
            enable_logging: false,
            slow_query_threshold: default_slow_query_threshold(),
        }
    }
}

impl DatabaseConfig {
    /// Apply `DATABASE_*` variables that are set on top of this configuration
    pub fn with_overrides(mut self, var: &dyn Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = var("DATABASE_URL") {
            self.url = url;
        }
        self.max_connections = parse_var(var, "DATABASE_MAX_CONNECTIONS", self.max_connections);
        self.connect_timeout = parse_var(var, "DATABASE_CONNECT_TIMEOUT", self.connect_timeout);
        self.slow_query_threshold =
            parse_var(var, "DATABASE_SLOW_QUERY_MS", self.slow_query_threshold);
        if let Some(flag) = var("DATABASE_LOG_STATEMENTS") {
            self.enable_logging = flag == "true" || flag == "1";
        }
        self
    }

    /// Create a new database configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the maximum number of connections
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Enable SQL statement logging
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }
}

fn default_slow_query_threshold() -> u64 {
    1000 // 1 second
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = DatabaseConfig::new("mysql://db:3306/hr")
            .with_max_connections(25)
            .with_logging(true);

        assert_eq!(config.max_connections, 25);
        assert!(config.enable_logging);
    }

    #[test]
    fn test_overrides_only_touch_set_variables() {
        let config = DatabaseConfig::new("mysql://db:3306/hr")
            .with_max_connections(50)
            .with_overrides(&|key: &str| match key {
                "DATABASE_LOG_STATEMENTS" => Some("1".to_string()),
                "DATABASE_SLOW_QUERY_MS" => Some("250".to_string()),
                _ => None,
            });

        assert_eq!(config.url, "mysql://db:3306/hr");
        assert_eq!(config.max_connections, 50);
        assert_eq!(config.slow_query_threshold, 250);
        assert!(config.enable_logging);
    }
}
