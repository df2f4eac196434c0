use async_trait::async_trait;
use uuid::Uuid;

use super::models::{Topic, UpdateTopic};
use crate::error::ForumResult;
use crate::lifecycle::Lifecycle;
use crate::users::Author;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// Insert a topic; a duplicate slug is a `ConstraintViolation`
    async fn create_topic(&self, topic: Topic) -> ForumResult<Topic>;

    async fn get_topic(&self, id: Uuid) -> ForumResult<Option<Lifecycle<Topic>>>;

    /// Live topics ordered by slug
    async fn list_topics(&self) -> ForumResult<Vec<Topic>>;

    /// Returns None when no live topic has this id
    async fn update_topic(&self, id: Uuid, input: UpdateTopic) -> ForumResult<Option<Topic>>;

    async fn soft_delete_topic(&self, id: Uuid) -> ForumResult<bool>;

    async fn is_moderator(&self, topic_id: Uuid, user_id: Uuid) -> ForumResult<bool>;

    /// Idempotent; `NotFound` when the user is missing or deleted
    async fn add_moderator(&self, topic_id: Uuid, user_id: Uuid) -> ForumResult<()>;

    async fn remove_moderator(&self, topic_id: Uuid, user_id: Uuid) -> ForumResult<bool>;

    /// Live moderators ordered by username
    async fn list_moderators(&self, topic_id: Uuid) -> ForumResult<Vec<Author>>;
}
