use chrono::{DateTime, Utc};
use domain_embeddings::Embedding;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::topics::TopicRef;
use crate::users::Author;

/// A post with its author and topic resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author: Author,
    pub topic: TopicRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePost {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1, max = 40000))]
    pub body: String,
    /// Defaults to the `general` topic
    pub topic_id: Option<Uuid>,
}

/// Partial update. The stored embedding is not recomputed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdatePost {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 40000))]
    pub body: Option<String>,
}

impl UpdatePost {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none()
    }
}

/// Insert payload: the embedding is computed before the row is written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub user_id: Uuid,
    pub topic_id: Option<Uuid>,
    pub embedding: Embedding,
}

/// Text sent to the embedding service for a post
pub fn embedding_text(title: &str, body: &str) -> String {
    format!("{}\n{}", title, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_text() {
        assert_eq!(
            embedding_text("Borrowing", "How do lifetimes work?"),
            "Borrowing\nHow do lifetimes work?"
        );
    }

    #[test]
    fn test_create_post_validation() {
        let valid = CreatePost {
            title: "Hello".into(),
            body: "World".into(),
            topic_id: None,
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreatePost {
            title: String::new(),
            ..valid
        };
        assert!(empty_title.validate().is_err());
    }
}
