use async_trait::async_trait;

use crate::error::EmbeddingResult;
use crate::models::{Embedding, EmbeddingModel};

/// Turns text into a fixed-length vector.
///
/// Implementations make a single attempt per call: no retry and no caching. Callers
/// decide what a failure means for their operation.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn model(&self) -> EmbeddingModel;

    async fn embed(&self, text: &str) -> EmbeddingResult<Embedding>;
}
