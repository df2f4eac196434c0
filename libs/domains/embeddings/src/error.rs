use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding configuration error: {0}")]
    Config(String),

    #[error("Embedding input rejected: {0}")]
    InvalidInput(String),

    #[error("Embedding request failed: {0}")]
    Http(String),

    #[error("Embedding request timed out")]
    Timeout,

    #[error("Embedding API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("Expected a {expected}-dimensional embedding, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EmbeddingError::Timeout
        } else if err.is_decode() {
            EmbeddingError::InvalidResponse(err.to_string())
        } else {
            EmbeddingError::Http(err.to_string())
        }
    }
}
