use sea_orm::ConnectOptions;
use std::time::Duration;
use tracing::log::LevelFilter;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse, env_required};

const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_MIN_CONNECTIONS: u32 = 2;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 8;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 8;
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;
const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;

/// Connection pool settings for PostgreSQL.
///
/// Built by hand with [`PostgresConfig::new`] or, with the `config` feature, from the
/// environment:
///
/// | Variable | Default |
/// |---|---|
/// | `DATABASE_URL` | required |
/// | `DB_MAX_CONNECTIONS` | 20 |
/// | `DB_MIN_CONNECTIONS` | 2 |
/// | `DB_CONNECT_TIMEOUT_SECS` | 8 |
/// | `DB_ACQUIRE_TIMEOUT_SECS` | 8 |
/// | `DB_IDLE_TIMEOUT_SECS` | 600 |
/// | `DB_MAX_LIFETIME_SECS` | 1800 |
/// | `DB_SQLX_LOGGING` | false |
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    /// Log every statement through sqlx
    pub sqlx_logging: bool,
    pub sqlx_logging_level: LevelFilter,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_pool_size(url: impl Into<String>, max_connections: u32, min_connections: u32) -> Self {
        Self {
            max_connections,
            min_connections,
            ..Self::new(url)
        }
    }

    pub fn into_connect_options(self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(&self.url);
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(self.max_lifetime_secs))
            .sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(self.sqlx_logging_level);
        opt
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            max_lifetime_secs: DEFAULT_MAX_LIFETIME_SECS,
            sqlx_logging: false,
            sqlx_logging_level: LevelFilter::Debug,
        }
    }
}

#[cfg(feature = "config")]
impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_required("DATABASE_URL")?;
        let max_connections: u32 =
            env_parse("DB_MAX_CONNECTIONS", &DEFAULT_MAX_CONNECTIONS.to_string())?;
        let min_connections: u32 =
            env_parse("DB_MIN_CONNECTIONS", &DEFAULT_MIN_CONNECTIONS.to_string())?;

        if min_connections > max_connections {
            return Err(ConfigError::ParseError {
                key: "DB_MIN_CONNECTIONS".to_string(),
                details: format!(
                    "{} exceeds DB_MAX_CONNECTIONS ({})",
                    min_connections, max_connections
                ),
            });
        }

        Ok(Self {
            url,
            max_connections,
            min_connections,
            connect_timeout_secs: env_parse(
                "DB_CONNECT_TIMEOUT_SECS",
                &DEFAULT_CONNECT_TIMEOUT_SECS.to_string(),
            )?,
            acquire_timeout_secs: env_parse(
                "DB_ACQUIRE_TIMEOUT_SECS",
                &DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string(),
            )?,
            idle_timeout_secs: env_parse(
                "DB_IDLE_TIMEOUT_SECS",
                &DEFAULT_IDLE_TIMEOUT_SECS.to_string(),
            )?,
            max_lifetime_secs: env_parse(
                "DB_MAX_LIFETIME_SECS",
                &DEFAULT_MAX_LIFETIME_SECS.to_string(),
            )?,
            sqlx_logging: env_parse("DB_SQLX_LOGGING", "false")?,
            ..Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_config_new_uses_defaults() {
        let config = PostgresConfig::new("postgresql://localhost/forum");
        assert_eq!(config.url(), "postgresql://localhost/forum");
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.min_connections, DEFAULT_MIN_CONNECTIONS);
        assert!(!config.sqlx_logging);
    }

    #[test]
    fn test_postgres_config_with_pool_size() {
        let config = PostgresConfig::with_pool_size("postgresql://localhost/forum", 50, 10);
        assert_eq!(config.max_connections, 50);
        assert_eq!(config.min_connections, 10);
        assert_eq!(config.idle_timeout_secs, DEFAULT_IDLE_TIMEOUT_SECS);
    }

    #[test]
    fn test_into_connect_options_keeps_url() {
        let options = PostgresConfig::new("postgresql://localhost/forum").into_connect_options();
        assert_eq!(options.get_url(), "postgresql://localhost/forum");
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_minimal() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/forum")),
                ("DB_MAX_CONNECTIONS", None),
                ("DB_MIN_CONNECTIONS", None),
            ],
            || {
                let config = PostgresConfig::from_env().unwrap();
                assert_eq!(config.url, "postgresql://localhost/forum");
                assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_custom() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/forum")),
                ("DB_MAX_CONNECTIONS", Some("50")),
                ("DB_MIN_CONNECTIONS", Some("10")),
                ("DB_CONNECT_TIMEOUT_SECS", Some("15")),
                ("DB_SQLX_LOGGING", Some("true")),
            ],
            || {
                let config = PostgresConfig::from_env().unwrap();
                assert_eq!(config.max_connections, 50);
                assert_eq!(config.min_connections, 10);
                assert_eq!(config.connect_timeout_secs, 15);
                assert!(config.sqlx_logging);
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_missing_url() {
        temp_env::with_var_unset("DATABASE_URL", || {
            let err = PostgresConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("DATABASE_URL"));
        });
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_rejects_inverted_pool_bounds() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/forum")),
                ("DB_MAX_CONNECTIONS", Some("2")),
                ("DB_MIN_CONNECTIONS", Some("5")),
            ],
            || {
                let err = PostgresConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("DB_MIN_CONNECTIONS"));
            },
        );
    }
}
