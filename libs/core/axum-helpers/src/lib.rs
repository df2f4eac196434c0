//! # Axum Helpers
//!
//! Shared HTTP plumbing for the forum services.
//!
//! - **[`errors`]**: `AppError`, `ErrorCode`, `ErrorResponse` and OpenAPI response types
//! - **[`extractors`]**: `UuidPath`, `UuidPathPair`, `ValidatedJson`
//! - **[`identity`]**: forwarded caller identity (`CurrentUser`)
//! - **[`server`]**: router composition, health checks, graceful shutdown

pub mod errors;
pub mod extractors;
pub mod identity;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{UuidPath, UuidPathPair, ValidatedJson};
pub use identity::{CurrentUser, forwarded_identity};
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal, with_common_layers,
};
