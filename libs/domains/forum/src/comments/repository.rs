use async_trait::async_trait;
use uuid::Uuid;

use super::models::{Comment, NewComment};
use crate::error::ForumResult;
use crate::lifecycle::Lifecycle;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// The post must be live (`NotFound`); a parent must be a live comment on the
    /// same post (`BadRequest`).
    async fn create_comment(&self, input: NewComment) -> ForumResult<Comment>;

    async fn get_comment(&self, id: Uuid) -> ForumResult<Option<Lifecycle<Comment>>>;

    /// Returns None when no live comment has this id
    async fn update_comment(&self, id: Uuid, body: String) -> ForumResult<Option<Comment>>;

    async fn soft_delete_comment(&self, id: Uuid) -> ForumResult<bool>;

    /// Live comments of a live post in creation order. `NotFound` for a missing post.
    async fn list_comments(&self, post_id: Uuid) -> ForumResult<Vec<Comment>>;
}
