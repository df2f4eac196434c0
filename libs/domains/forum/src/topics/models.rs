use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Slug of the topic posts land in when created without one.
pub const DEFAULT_TOPIC_SLUG: &str = "general";

/// Lowercase letters, digits and underscores
static SLUG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9_]+$").unwrap());

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if !SLUG_PATTERN.is_match(slug) {
        return Err(ValidationError::new("invalid_slug"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Topic {
    pub id: Uuid,
    /// Unique, lowercase `[a-z0-9_]`
    pub slug: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The topic fields embedded in a post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct TopicRef {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
}

impl From<&Topic> for TopicRef {
    fn from(topic: &Topic) -> Self {
        Self {
            id: topic.id,
            slug: topic.slug.clone(),
            title: topic.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTopic {
    #[validate(length(min = 1, max = 64), custom(function = "validate_slug"))]
    pub slug: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTopic {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl UpdateTopic {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

impl Topic {
    pub fn new(input: CreateTopic) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            slug: input.slug,
            title: input.title,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateTopic) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(slug: &str) -> CreateTopic {
        CreateTopic {
            slug: slug.to_string(),
            title: "Tech".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_slug_validation() {
        assert!(create("personal_finance").validate().is_ok());
        assert!(create("Tech").validate().is_err());
        assert!(create("tech news").validate().is_err());
        assert!(create("").validate().is_err());
    }

    #[test]
    fn test_apply_update_keeps_unset_fields() {
        let mut topic = Topic::new(CreateTopic {
            slug: "tech".into(),
            title: "Technology".into(),
            description: "Tech News & Programming".into(),
        });

        topic.apply_update(UpdateTopic {
            title: Some("Tech".into()),
            description: None,
        });

        assert_eq!(topic.title, "Tech");
        assert_eq!(topic.description, "Tech News & Programming");
    }
}
