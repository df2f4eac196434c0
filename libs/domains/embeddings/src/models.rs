use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{EmbeddingError, EmbeddingResult};

/// Length of every vector this crate produces and the `posts.embedding` column stores.
pub const EMBEDDING_DIMENSION: usize = 1536;

/// Supported OpenAI embedding models; both produce [`EMBEDDING_DIMENSION`] values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum EmbeddingModel {
    #[default]
    #[strum(serialize = "text-embedding-ada-002")]
    #[serde(rename = "text-embedding-ada-002")]
    TextEmbeddingAda002,
    #[strum(serialize = "text-embedding-3-small")]
    #[serde(rename = "text-embedding-3-small")]
    TextEmbedding3Small,
}

impl EmbeddingModel {
    pub fn model_name(&self) -> &'static str {
        match self {
            Self::TextEmbeddingAda002 => "text-embedding-ada-002",
            Self::TextEmbedding3Small => "text-embedding-3-small",
        }
    }

    pub fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}

/// A validated embedding vector: exactly [`EMBEDDING_DIMENSION`] finite values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>) -> EmbeddingResult<Self> {
        if values.len() != EMBEDDING_DIMENSION {
            return Err(EmbeddingError::DimensionMismatch {
                expected: EMBEDDING_DIMENSION,
                actual: values.len(),
            });
        }

        if let Some(position) = values.iter().position(|v| !v.is_finite()) {
            return Err(EmbeddingError::InvalidResponse(format!(
                "non-finite value at position {}",
                position
            )));
        }

        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    /// pgvector text form, e.g. `[0.1,0.2,...]`, for binding as `$n::vector`.
    pub fn to_vector_literal(&self) -> String {
        let mut literal = String::with_capacity(self.0.len() * 12 + 2);
        literal.push('[');
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                literal.push(',');
            }
            literal.push_str(&value.to_string());
        }
        literal.push(']');
        literal
    }

    /// Parses the pgvector text form produced by `embedding::text`.
    pub fn from_vector_literal(literal: &str) -> EmbeddingResult<Self> {
        let inner = literal
            .trim()
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| EmbeddingError::InvalidResponse("vector literal not bracketed".into()))?;

        let values = inner
            .split(',')
            .map(|v| v.trim().parse::<f32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        Self::new(values)
    }
}

impl TryFrom<Vec<f32>> for Embedding {
    type Error = EmbeddingError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl AsRef<[f32]> for Embedding {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn unit(axis: usize) -> Vec<f32> {
        let mut v = vec![0.0; EMBEDDING_DIMENSION];
        v[axis] = 1.0;
        v
    }

    #[test]
    fn test_model_names_round_trip_through_strum() {
        assert_eq!(EmbeddingModel::default().model_name(), "text-embedding-ada-002");
        assert_eq!(
            EmbeddingModel::from_str("text-embedding-3-small").unwrap(),
            EmbeddingModel::TextEmbedding3Small
        );
        assert!(EmbeddingModel::from_str("text-embedding-3-large").is_err());
    }

    #[test]
    fn test_embedding_rejects_wrong_dimension() {
        let err = Embedding::new(vec![0.5; 3]).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch { expected: EMBEDDING_DIMENSION, actual: 3 }
        ));
    }

    #[test]
    fn test_embedding_rejects_nan() {
        let mut values = unit(0);
        values[7] = f32::NAN;
        assert!(matches!(
            Embedding::new(values),
            Err(EmbeddingError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_vector_literal_shape() {
        let embedding = Embedding::new(unit(1)).unwrap();
        let literal = embedding.to_vector_literal();

        assert!(literal.starts_with("[0,1,0"));
        assert!(literal.ends_with("0]"));
        assert_eq!(literal.matches(',').count(), EMBEDDING_DIMENSION - 1);
        assert_eq!(Embedding::from_vector_literal(&literal).unwrap(), embedding);
    }

    #[test]
    fn test_from_vector_literal_rejects_garbage() {
        assert!(Embedding::from_vector_literal("1,2,3").is_err());
        assert!(Embedding::from_vector_literal("[a,b]").is_err());
    }
}
