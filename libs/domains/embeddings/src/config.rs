use core_config::{ConfigError, FromEnv, env_or_default, env_parse, env_required};
use std::str::FromStr;
use std::time::Duration;

use crate::models::EmbeddingModel;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings for the OpenAI embeddings endpoint.
///
/// | Variable | Default |
/// |---|---|
/// | `OPENAI_API_KEY` | required |
/// | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
/// | `EMBEDDING_MODEL` | `text-embedding-ada-002` |
/// | `EMBEDDING_TIMEOUT_SECS` | 10 |
#[derive(Clone)]
pub struct EmbeddingConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: EmbeddingModel,
    /// Upper bound for one embedding call, connect included
    pub timeout: Duration,
}

impl EmbeddingConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: EmbeddingModel::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: EmbeddingModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// Keeps the API key out of logs
impl std::fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl FromEnv for EmbeddingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = env_required("OPENAI_API_KEY")?;
        let base_url = env_or_default("OPENAI_BASE_URL", DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let model_name = env_or_default("EMBEDDING_MODEL", EmbeddingModel::default().model_name());
        let model = EmbeddingModel::from_str(&model_name).map_err(|e| ConfigError::ParseError {
            key: "EMBEDDING_MODEL".to_string(),
            details: format!("{}: {}", model_name, e),
        })?;

        let timeout_secs: u64 =
            env_parse("EMBEDDING_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string())?;

        Ok(Self {
            api_key,
            base_url,
            model,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars(
            [
                ("OPENAI_API_KEY", Some("sk-test")),
                ("OPENAI_BASE_URL", None),
                ("EMBEDDING_MODEL", None),
                ("EMBEDDING_TIMEOUT_SECS", None),
            ],
            || {
                let config = EmbeddingConfig::from_env().unwrap();
                assert_eq!(config.api_key, "sk-test");
                assert_eq!(config.base_url, DEFAULT_BASE_URL);
                assert_eq!(config.model, EmbeddingModel::TextEmbeddingAda002);
                assert_eq!(config.timeout, Duration::from_secs(10));
            },
        );
    }

    #[test]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                ("OPENAI_API_KEY", Some("sk-test")),
                ("OPENAI_BASE_URL", Some("http://localhost:9999/v1/")),
                ("EMBEDDING_MODEL", Some("text-embedding-3-small")),
                ("EMBEDDING_TIMEOUT_SECS", Some("3")),
            ],
            || {
                let config = EmbeddingConfig::from_env().unwrap();
                assert_eq!(config.base_url, "http://localhost:9999/v1");
                assert_eq!(config.model, EmbeddingModel::TextEmbedding3Small);
                assert_eq!(config.timeout, Duration::from_secs(3));
            },
        );
    }

    #[test]
    fn test_from_env_requires_api_key() {
        temp_env::with_var_unset("OPENAI_API_KEY", || {
            let err = EmbeddingConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("OPENAI_API_KEY"));
        });
    }

    #[test]
    fn test_from_env_rejects_unknown_model() {
        temp_env::with_vars(
            [
                ("OPENAI_API_KEY", Some("sk-test")),
                ("EMBEDDING_MODEL", Some("word2vec")),
            ],
            || {
                let err = EmbeddingConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("EMBEDDING_MODEL"));
            },
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", EmbeddingConfig::new("sk-secret"));
        assert!(!rendered.contains("sk-secret"));
    }
}
