use domain_embeddings::EmbeddingProvider;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use super::models::{CreatePost, NewPost, Post, UpdatePost, embedding_text};
use super::repository::PostRepository;
use crate::caller::Caller;
use crate::error::{ForumError, ForumResult};
use crate::lifecycle::LiveOrNotFound;
use crate::ranking::{FeedOrder, FeedQuery};

/// Post lifecycle plus the feed.
///
/// The embedding provider is called when a post is created (its title and body) and
/// when the feed is searched (the search text). A failed call fails the request.
#[derive(Clone)]
pub struct PostService<R: PostRepository> {
    repository: Arc<R>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl<R: PostRepository> PostService<R> {
    pub fn new(repository: R, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self::from_shared(Arc::new(repository), embedder)
    }

    pub fn from_shared(repository: Arc<R>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            repository,
            embedder,
        }
    }

    /// Embeds the post, then stores it. Nothing is written if embedding fails.
    pub async fn create_post(&self, caller: &Caller, input: CreatePost) -> ForumResult<Post> {
        input
            .validate()
            .map_err(|e| ForumError::BadRequest(e.to_string()))?;

        let embedding = self
            .embedder
            .embed(&embedding_text(&input.title, &input.body))
            .await
            .map_err(|e| {
                warn!(error = %e, user_id = %caller.id, "Embedding failed, post not created");
                ForumError::EmbeddingFailed
            })?;

        self.repository
            .create_post(NewPost {
                id: Uuid::now_v7(),
                title: input.title,
                body: input.body,
                user_id: caller.id,
                topic_id: input.topic_id,
                embedding,
            })
            .await
    }

    pub async fn get_post(&self, id: Uuid) -> ForumResult<Post> {
        self.repository
            .get_post(id)
            .await?
            .live_or_not_found("Post", id)
    }

    /// Chronological without a search term; otherwise the closest posts to the search text.
    pub async fn list_posts(&self, query: FeedQuery) -> ForumResult<Vec<Post>> {
        let order = match query.search_term() {
            None => FeedOrder::Chronological,
            Some(term) => {
                let embedding = self.embedder.embed(term).await.map_err(|e| {
                    warn!(error = %e, "Embedding failed, search unavailable");
                    ForumError::SearchUnavailable
                })?;
                FeedOrder::Similarity(embedding)
            }
        };

        self.repository.list_posts(order, query.topic_id).await
    }

    /// Owner only. Title/body changes do not refresh the embedding.
    pub async fn update_post(
        &self,
        caller: &Caller,
        id: Uuid,
        input: UpdatePost,
    ) -> ForumResult<Post> {
        input
            .validate()
            .map_err(|e| ForumError::BadRequest(e.to_string()))?;

        let post = self.get_post(id).await?;
        ensure_owner(caller, &post)?;

        if input.is_empty() {
            return Ok(post);
        }

        self.repository
            .update_post(id, input)
            .await?
            .ok_or_else(|| ForumError::not_found("Post", id))
    }

    /// Owner only; the row stays stored
    pub async fn delete_post(&self, caller: &Caller, id: Uuid) -> ForumResult<()> {
        let post = self.get_post(id).await?;
        ensure_owner(caller, &post)?;

        if !self.repository.soft_delete_post(id).await? {
            return Err(ForumError::not_found("Post", id));
        }
        Ok(())
    }
}

fn ensure_owner(caller: &Caller, post: &Post) -> ForumResult<()> {
    if post.author.id != caller.id {
        return Err(ForumError::Unauthorized(
            "Only the author can change this post".to_string(),
        ));
    }
    Ok(())
}
