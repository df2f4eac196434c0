use async_trait::async_trait;
use uuid::Uuid;

use super::models::{NewPost, Post, UpdatePost};
use crate::error::ForumResult;
use crate::lifecycle::Lifecycle;
use crate::ranking::FeedOrder;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Single insert, embedding included. A missing or deleted topic is `NotFound`.
    async fn create_post(&self, input: NewPost) -> ForumResult<Post>;

    async fn get_post(&self, id: Uuid) -> ForumResult<Option<Lifecycle<Post>>>;

    /// Returns None when no live post has this id
    async fn update_post(&self, id: Uuid, input: UpdatePost) -> ForumResult<Option<Post>>;

    async fn soft_delete_post(&self, id: Uuid) -> ForumResult<bool>;

    /// Live posts in feed order, optionally limited to one topic
    async fn list_posts(&self, order: FeedOrder, topic_id: Option<Uuid>) -> ForumResult<Vec<Post>>;
}
