//! Text embeddings for similarity search.
//!
//! [`EmbeddingProvider`] is the seam the forum depends on; [`OpenAIProvider`] is the
//! production implementation. Every embedding is [`EMBEDDING_DIMENSION`] long.

pub mod config;
pub mod error;
pub mod models;
pub mod openai;
pub mod provider;

pub use config::EmbeddingConfig;
pub use error::{EmbeddingError, EmbeddingResult};
pub use models::{EMBEDDING_DIMENSION, Embedding, EmbeddingModel};
pub use openai::OpenAIProvider;
pub use provider::EmbeddingProvider;

#[cfg(any(test, feature = "mock"))]
pub use provider::MockEmbeddingProvider;
