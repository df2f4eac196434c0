use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::models::{Comment, CreateComment, NewComment, UpdateComment};
use super::repository::CommentRepository;
use super::tree::{CommentNode, assemble};
use crate::caller::Caller;
use crate::error::{ForumError, ForumResult};
use crate::lifecycle::LiveOrNotFound;

#[derive(Clone)]
pub struct CommentService<R: CommentRepository> {
    repository: Arc<R>,
}

impl<R: CommentRepository> CommentService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub fn from_shared(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create_comment(
        &self,
        caller: &Caller,
        post_id: Uuid,
        input: CreateComment,
    ) -> ForumResult<Comment> {
        input
            .validate()
            .map_err(|e| ForumError::BadRequest(e.to_string()))?;

        self.repository
            .create_comment(NewComment {
                id: Uuid::now_v7(),
                post_id,
                parent_id: input.parent_id,
                user_id: caller.id,
                body: input.body,
            })
            .await
    }

    pub async fn get_comment(&self, id: Uuid) -> ForumResult<Comment> {
        self.repository
            .get_comment(id)
            .await?
            .live_or_not_found("Comment", id)
    }

    /// The post's live comments as a forest. Replies to a deleted comment surface as roots.
    pub async fn comment_tree(&self, post_id: Uuid) -> ForumResult<Vec<CommentNode>> {
        let comments = self.repository.list_comments(post_id).await?;
        Ok(assemble(comments))
    }

    pub async fn update_comment(
        &self,
        caller: &Caller,
        id: Uuid,
        input: UpdateComment,
    ) -> ForumResult<Comment> {
        input
            .validate()
            .map_err(|e| ForumError::BadRequest(e.to_string()))?;

        let comment = self.get_comment(id).await?;
        ensure_owner(caller, &comment)?;

        self.repository
            .update_comment(id, input.body)
            .await?
            .ok_or_else(|| ForumError::not_found("Comment", id))
    }

    pub async fn delete_comment(&self, caller: &Caller, id: Uuid) -> ForumResult<()> {
        let comment = self.get_comment(id).await?;
        ensure_owner(caller, &comment)?;

        if !self.repository.soft_delete_comment(id).await? {
            return Err(ForumError::not_found("Comment", id));
        }
        Ok(())
    }
}

fn ensure_owner(caller: &Caller, comment: &Comment) -> ForumResult<()> {
    if comment.author.id != caller.id {
        return Err(ForumError::Unauthorized(
            "Only the author can change this comment".to_string(),
        ));
    }
    Ok(())
}
