use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EmbeddingConfig;
use crate::error::{EmbeddingError, EmbeddingResult};
use crate::models::{Embedding, EmbeddingModel};
use crate::provider::EmbeddingProvider;

/// Calls `POST {base_url}/embeddings` once per text.
pub struct OpenAIProvider {
    client: Client,
    config: EmbeddingConfig,
}

impl OpenAIProvider {
    pub fn new(config: EmbeddingConfig) -> EmbeddingResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(EmbeddingError::Config("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmbeddingError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.config.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn model(&self) -> EmbeddingModel {
        self.config.model
    }

    async fn embed(&self, text: &str) -> EmbeddingResult<Embedding> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput("text is empty".to_string()));
        }

        let request = EmbeddingRequest {
            model: self.config.model.model_name(),
            input: vec![text],
        };

        debug!(model = request.model, chars = text.len(), "Requesting embedding");

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Embedding API returned an error");
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let mut payload: EmbeddingResponse = response.json().await?;
        payload.data.sort_by_key(|d| d.index);

        let values = payload
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::InvalidResponse("no embedding returned".to_string()))?;

        Embedding::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EMBEDDING_DIMENSION;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path},
    };

    fn provider_for(server: &MockServer) -> OpenAIProvider {
        let config = EmbeddingConfig::new("sk-test").with_base_url(server.uri());
        OpenAIProvider::new(config).unwrap()
    }

    fn response_with(values: Vec<f32>) -> serde_json::Value {
        json!({
            "object": "list",
            "data": [{ "object": "embedding", "index": 0, "embedding": values }],
            "model": "text-embedding-ada-002",
            "usage": { "prompt_tokens": 4, "total_tokens": 4 }
        })
    }

    #[tokio::test]
    async fn test_embed_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "text-embedding-ada-002",
                "input": ["How do I learn Rust?"]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(response_with(vec![0.25; EMBEDDING_DIMENSION])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let embedding = provider_for(&server)
            .embed("How do I learn Rust?")
            .await
            .unwrap();

        assert_eq!(embedding.as_slice().len(), EMBEDDING_DIMENSION);
        assert_eq!(embedding.as_slice()[0], 0.25);
    }

    #[tokio::test]
    async fn test_embed_api_error_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = provider_for(&server).embed("hello").await.unwrap_err();

        match err {
            EmbeddingError::Api { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_embed_wrong_dimension() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_with(vec![0.1; 8])))
            .mount(&server)
            .await;

        let err = provider_for(&server).embed("hello").await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch { actual: 8, .. }
        ));
    }

    #[tokio::test]
    async fn test_embed_empty_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        let err = provider_for(&server).embed("hello").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_embed_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = provider_for(&server).embed("hello").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_embed_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(response_with(vec![0.0; EMBEDDING_DIMENSION]))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let config = EmbeddingConfig::new("sk-test")
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(100));
        let provider = OpenAIProvider::new(config).unwrap();

        let err = provider.embed("hello").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Timeout));
    }

    #[tokio::test]
    async fn test_embed_rejects_blank_text_without_calling_api() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = provider_for(&server).embed("   ").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidInput(_)));
    }

    #[test]
    fn test_new_rejects_empty_key() {
        assert!(matches!(
            OpenAIProvider::new(EmbeddingConfig::new("")),
            Err(EmbeddingError::Config(_))
        ));
    }
}
