//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::net::SocketAddr;

use club_bracket::{DatabaseConfig, WinCreditPolicy};

/// Default bind address when neither `--bind` nor `SERVER_BIND` is given
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Minimum length of the club edit code
pub const MIN_EDIT_CODE_LEN: usize = 4;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Serve from process memory instead of PostgreSQL
    pub in_memory: bool,
    /// Shared code for participant and tournament edits. `None` leaves them open.
    pub edit_code: Option<String>,
    /// How final-round results move participant win counts
    pub win_credit_policy: WinCreditPolicy,
    /// Prometheus listener address
    pub metrics_bind: Option<SocketAddr>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `database_url_override` - Optional database URL override (from CLI args)
    /// * `in_memory` - Whether `--in-memory` was passed
    ///
    /// # Errors
    ///
    /// Returns error if a set variable cannot be parsed
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
        in_memory: bool,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_env_addr("SERVER_BIND")?.unwrap_or(default_bind()?),
        };

        let mut database = DatabaseConfig::from_env();
        if let Some(url) = database_url_override {
            database = database.with_url(url);
        }

        let edit_code = std::env::var("CLUB_EDIT_CODE")
            .ok()
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty());

        let win_credit_policy = match std::env::var("WIN_CREDIT_POLICY") {
            Ok(value) => value.parse::<WinCreditPolicy>().map_err(|reason| ConfigError::Invalid {
                var: "WIN_CREDIT_POLICY".to_string(),
                reason,
            })?,
            Err(_) => WinCreditPolicy::default(),
        };

        let metrics_bind = parse_env_addr("METRICS_BIND")?;

        Ok(ServerConfig {
            bind,
            database,
            in_memory,
            edit_code,
            win_credit_policy,
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(code) = &self.edit_code
            && code.chars().count() < MIN_EDIT_CODE_LEN
        {
            return Err(ConfigError::Invalid {
                var: "CLUB_EDIT_CODE".to_string(),
                reason: format!("Must be at least {MIN_EDIT_CODE_LEN} characters"),
            });
        }

        if !self.in_memory {
            if self.database.database_url.is_empty() {
                return Err(ConfigError::MissingRequired {
                    var: "DATABASE_URL".to_string(),
                    hint: "Or start with --in-memory".to_string(),
                });
            }

            if self.database.max_connections == 0 {
                return Err(ConfigError::Invalid {
                    var: "DB_MAX_CONNECTIONS".to_string(),
                    reason: "Must be greater than 0".to_string(),
                });
            }

            if self.database.min_connections > self.database.max_connections {
                return Err(ConfigError::Invalid {
                    var: "DB_MIN_CONNECTIONS".to_string(),
                    reason: format!(
                        "Cannot exceed max connections ({})",
                        self.database.max_connections
                    ),
                });
            }
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from the server bind address ({})", self.bind),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn default_bind() -> Result<SocketAddr, ConfigError> {
    DEFAULT_BIND.parse().map_err(|_| ConfigError::Invalid {
        var: "SERVER_BIND".to_string(),
        reason: format!("Default address {DEFAULT_BIND} is not a socket address"),
    })
}

/// Unset is `None`; set but unparsable is an error
fn parse_env_addr(key: &str) -> Result<Option<SocketAddr>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                var: key.to_string(),
                reason: format!("'{value}' is not a socket address"),
            }),
        Err(_) => Ok(None),
    }
}
