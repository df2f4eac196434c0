//! Shared application state.

use domain_embeddings::EmbeddingProvider;
use std::sync::Arc;

/// Cloned into each router; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Embedding client shared by post creation and feed search
    pub embedder: Arc<dyn EmbeddingProvider>,
}
