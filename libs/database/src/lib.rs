//! PostgreSQL connection management for the forum services.
//!
//! - `postgres` (default): pool configuration, connect with retry, migrations, health
//! - `config`: `core_config::FromEnv` for [`postgres::PostgresConfig`]
//!
//! ```ignore
//! use database::postgres::{connect_from_config_with_retry, run_migrations, PostgresConfig};
//! use core_config::FromEnv;
//!
//! let db = connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! run_migrations::<migration::Migrator>(&db, "forum_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
