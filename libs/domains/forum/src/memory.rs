//! In-process store implementing every repository trait.
//!
//! All aggregates share one set of tables behind a single lock, so cross-aggregate
//! checks (a comment's post, a vote's target) see a consistent view. Unique and
//! foreign-key rules of the Postgres schema are mirrored here and reported the same way.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain_embeddings::Embedding;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::comments::{Comment, CommentRepository, NewComment};
use crate::error::{ForumError, ForumResult};
use crate::lifecycle::Lifecycle;
use crate::posts::{NewPost, Post, PostRepository, UpdatePost};
use crate::ranking::{FeedOrder, Scored, cosine_distance, rank_by_distance};
use crate::topics::{CreateTopic, DEFAULT_TOPIC_SLUG, Topic, TopicRef, TopicRepository, UpdateTopic};
use crate::users::{Author, NewUser, User, UserRepository};
use crate::votes::{NewVote, Vote, VoteRepository, VoteTally, VoteTarget};

const MISSING_REFERENCE: &str = "Referenced record does not exist";

#[derive(Debug, Clone)]
struct Row<T> {
    record: T,
    deleted_at: Option<DateTime<Utc>>,
}

impl<T: Clone> Row<T> {
    fn new(record: T) -> Self {
        Self {
            record,
            deleted_at: None,
        }
    }

    fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    fn lifecycle(&self) -> Lifecycle<T> {
        Lifecycle::from_parts(self.record.clone(), self.deleted_at)
    }

    /// Returns false when the row was already deleted
    fn soft_delete(&mut self) -> bool {
        if self.deleted_at.is_some() {
            return false;
        }
        self.deleted_at = Some(Utc::now());
        true
    }
}

#[derive(Debug, Clone)]
struct StoredPost {
    id: Uuid,
    title: String,
    body: String,
    user_id: Uuid,
    topic_id: Uuid,
    embedding: Option<Embedding>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredComment {
    id: Uuid,
    post_id: Uuid,
    parent_id: Option<Uuid>,
    user_id: Uuid,
    body: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, Row<User>>,
    topics: HashMap<Uuid, Row<Topic>>,
    moderators: BTreeSet<(Uuid, Uuid)>,
    posts: HashMap<Uuid, Row<StoredPost>>,
    comments: HashMap<Uuid, Row<StoredComment>>,
    votes: HashMap<Uuid, Vote>,
}

impl Tables {
    fn user_exists(&self, id: Uuid) -> bool {
        self.users.contains_key(&id)
    }

    fn user_live(&self, id: Uuid) -> bool {
        self.users.get(&id).is_some_and(Row::is_live)
    }

    fn post_live(&self, id: Uuid) -> bool {
        self.posts.get(&id).is_some_and(Row::is_live)
    }

    fn comment_live(&self, id: Uuid) -> bool {
        self.comments.get(&id).is_some_and(Row::is_live)
    }

    fn author(&self, user_id: Uuid) -> ForumResult<Author> {
        self.users
            .get(&user_id)
            .map(|row| Author::from(&row.record))
            .ok_or_else(|| ForumError::Internal(format!("Author {} missing", user_id)))
    }

    fn post_view(&self, post: &StoredPost) -> ForumResult<Post> {
        let topic = self
            .topics
            .get(&post.topic_id)
            .map(|row| TopicRef::from(&row.record))
            .ok_or_else(|| ForumError::Internal(format!("Topic {} missing", post.topic_id)))?;

        Ok(Post {
            id: post.id,
            title: post.title.clone(),
            body: post.body.clone(),
            author: self.author(post.user_id)?,
            topic,
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
    }

    fn comment_view(&self, comment: &StoredComment) -> ForumResult<Comment> {
        Ok(Comment {
            id: comment.id,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            body: comment.body.clone(),
            author: self.author(comment.user_id)?,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        })
    }

    fn resolve_topic(&self, topic_id: Option<Uuid>) -> ForumResult<Uuid> {
        match topic_id {
            Some(id) => self
                .topics
                .get(&id)
                .filter(|row| row.is_live())
                .map(|row| row.record.id)
                .ok_or_else(|| ForumError::not_found("Topic", id)),
            None => self
                .topics
                .values()
                .find(|row| row.is_live() && row.record.slug == DEFAULT_TOPIC_SLUG)
                .map(|row| row.record.id)
                .ok_or_else(|| {
                    ForumError::Internal(format!(
                        "Default topic '{}' is missing",
                        DEFAULT_TOPIC_SLUG
                    ))
                }),
        }
    }

    fn target_live(&self, target: VoteTarget) -> ForumResult<()> {
        match target {
            VoteTarget::Post(id) if !self.post_live(id) => Err(ForumError::not_found("Post", id)),
            VoteTarget::Comment(id) if !self.comment_live(id) => {
                Err(ForumError::not_found("Comment", id))
            }
            _ => Ok(()),
        }
    }
}

/// Shared in-memory tables. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding only the `general` topic, enough to create posts without a topic.
    pub fn seeded() -> Self {
        let general = Topic::new(CreateTopic {
            slug: DEFAULT_TOPIC_SLUG.to_string(),
            title: "General".to_string(),
            description: "General Discussion".to_string(),
        });

        let mut tables = Tables::default();
        tables.topics.insert(general.id, Row::new(general));
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }
}

/// Test-only access to rows the repository traits hide.
#[cfg(test)]
impl InMemoryStore {
    /// Stores a post without an embedding, as rows written before indexing existed.
    async fn insert_unembedded_post(
        &self,
        user_id: Uuid,
        topic_id: Uuid,
        title: &str,
        body: &str,
    ) -> ForumResult<Post> {
        let mut tables = self.tables.write().await;
        if !tables.user_exists(user_id) || !tables.topics.contains_key(&topic_id) {
            return Err(ForumError::ConstraintViolation(MISSING_REFERENCE.to_string()));
        }

        let now = Utc::now();
        let post = StoredPost {
            id: Uuid::now_v7(),
            title: title.to_string(),
            body: body.to_string(),
            user_id,
            topic_id,
            embedding: None,
            created_at: now,
            updated_at: now,
        };
        let view = tables.post_view(&post)?;
        tables.posts.insert(post.id, Row::new(post));
        Ok(view)
    }

    /// Number of stored comment rows for a post, deleted ones included.
    async fn stored_comment_count(&self, post_id: Uuid) -> usize {
        let tables = self.tables.read().await;
        tables
            .comments
            .values()
            .filter(|row| row.record.post_id == post_id)
            .count()
    }

    /// Number of stored post rows, deleted ones included.
    async fn stored_post_count(&self) -> usize {
        self.tables.read().await.posts.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, input: NewUser) -> ForumResult<User> {
        let mut tables = self.tables.write().await;

        let taken = tables.users.values().any(|row| {
            row.record.username == input.username || row.record.email == input.email
        });
        if taken || tables.users.contains_key(&input.id) {
            return Err(ForumError::ConstraintViolation(
                "Username or email already registered".to_string(),
            ));
        }

        let user = User::new(input);
        tables.users.insert(user.id, Row::new(user.clone()));

        tracing::info!(user_id = %user.id, username = %user.username, "Created user");
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> ForumResult<Option<Lifecycle<User>>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).map(Row::lifecycle))
    }

    async fn find_user_by_username(&self, username: &str) -> ForumResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|row| row.is_live() && row.record.username == username)
            .map(|row| row.record.clone()))
    }

    async fn soft_delete_user(&self, id: Uuid) -> ForumResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).is_some_and(Row::soft_delete))
    }
}

#[async_trait]
impl TopicRepository for InMemoryStore {
    async fn create_topic(&self, topic: Topic) -> ForumResult<Topic> {
        let mut tables = self.tables.write().await;

        if tables.topics.values().any(|row| row.record.slug == topic.slug) {
            return Err(ForumError::ConstraintViolation(
                "A topic with this slug already exists".to_string(),
            ));
        }

        tables.topics.insert(topic.id, Row::new(topic.clone()));
        tracing::info!(topic_id = %topic.id, slug = %topic.slug, "Created topic");
        Ok(topic)
    }

    async fn get_topic(&self, id: Uuid) -> ForumResult<Option<Lifecycle<Topic>>> {
        let tables = self.tables.read().await;
        Ok(tables.topics.get(&id).map(Row::lifecycle))
    }

    async fn list_topics(&self) -> ForumResult<Vec<Topic>> {
        let tables = self.tables.read().await;
        let mut topics: Vec<Topic> = tables
            .topics
            .values()
            .filter(|row| row.is_live())
            .map(|row| row.record.clone())
            .collect();
        topics.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(topics)
    }

    async fn update_topic(&self, id: Uuid, input: UpdateTopic) -> ForumResult<Option<Topic>> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.topics.get_mut(&id).filter(|row| row.is_live()) else {
            return Ok(None);
        };

        row.record.apply_update(input);
        Ok(Some(row.record.clone()))
    }

    async fn soft_delete_topic(&self, id: Uuid) -> ForumResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.topics.get_mut(&id).is_some_and(Row::soft_delete))
    }

    async fn is_moderator(&self, topic_id: Uuid, user_id: Uuid) -> ForumResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.moderators.contains(&(topic_id, user_id)))
    }

    async fn add_moderator(&self, topic_id: Uuid, user_id: Uuid) -> ForumResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.user_live(user_id) {
            return Err(ForumError::not_found("User", user_id));
        }
        if !tables.topics.contains_key(&topic_id) {
            return Err(ForumError::ConstraintViolation(MISSING_REFERENCE.to_string()));
        }

        tables.moderators.insert((topic_id, user_id));
        Ok(())
    }

    async fn remove_moderator(&self, topic_id: Uuid, user_id: Uuid) -> ForumResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.moderators.remove(&(topic_id, user_id)))
    }

    async fn list_moderators(&self, topic_id: Uuid) -> ForumResult<Vec<Author>> {
        let tables = self.tables.read().await;
        let mut moderators: Vec<Author> = tables
            .moderators
            .iter()
            .filter(|(topic, _)| *topic == topic_id)
            .filter_map(|(_, user_id)| tables.users.get(user_id))
            .filter(|row| row.is_live())
            .map(|row| Author::from(&row.record))
            .collect();
        moderators.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(moderators)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create_post(&self, input: NewPost) -> ForumResult<Post> {
        let mut tables = self.tables.write().await;

        let topic_id = tables.resolve_topic(input.topic_id)?;
        if !tables.user_exists(input.user_id) || tables.posts.contains_key(&input.id) {
            return Err(ForumError::ConstraintViolation(MISSING_REFERENCE.to_string()));
        }

        let now = Utc::now();
        let post = StoredPost {
            id: input.id,
            title: input.title,
            body: input.body,
            user_id: input.user_id,
            topic_id,
            embedding: Some(input.embedding),
            created_at: now,
            updated_at: now,
        };
        let view = tables.post_view(&post)?;
        tables.posts.insert(post.id, Row::new(post));

        tracing::info!(post_id = %view.id, "Created post");
        Ok(view)
    }

    async fn get_post(&self, id: Uuid) -> ForumResult<Option<Lifecycle<Post>>> {
        let tables = self.tables.read().await;
        let Some(row) = tables.posts.get(&id) else {
            return Ok(None);
        };

        let post = tables.post_view(&row.record)?;
        Ok(Some(Lifecycle::from_parts(post, row.deleted_at)))
    }

    async fn update_post(&self, id: Uuid, input: UpdatePost) -> ForumResult<Option<Post>> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.posts.get_mut(&id).filter(|row| row.is_live()) else {
            return Ok(None);
        };

        if let Some(title) = input.title {
            row.record.title = title;
        }
        if let Some(body) = input.body {
            row.record.body = body;
        }
        row.record.updated_at = Utc::now();

        let stored = row.record.clone();
        tables.post_view(&stored).map(Some)
    }

    async fn soft_delete_post(&self, id: Uuid) -> ForumResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.posts.get_mut(&id).is_some_and(Row::soft_delete))
    }

    async fn list_posts(&self, order: FeedOrder, topic_id: Option<Uuid>) -> ForumResult<Vec<Post>> {
        let tables = self.tables.read().await;
        let live = tables
            .posts
            .values()
            .filter(|row| row.is_live())
            .map(|row| &row.record)
            .filter(|post| topic_id.is_none_or(|topic| post.topic_id == topic));

        let ranked: Vec<&StoredPost> = match &order {
            FeedOrder::Chronological => {
                let mut posts: Vec<&StoredPost> = live.collect();
                posts.sort_by(|a, b| {
                    b.created_at
                        .cmp(&a.created_at)
                        .then_with(|| b.id.cmp(&a.id))
                });
                posts
            }
            FeedOrder::Similarity(query) => {
                let candidates: Vec<Scored<&StoredPost>> = live
                    .map(|post| Scored {
                        distance: post
                            .embedding
                            .as_ref()
                            .map(|e| cosine_distance(query.as_slice(), e.as_slice())),
                        created_at: post.created_at,
                        item: post,
                    })
                    .collect();
                rank_by_distance(candidates, order.limit().unwrap_or(usize::MAX))
            }
        };

        ranked.into_iter().map(|post| tables.post_view(post)).collect()
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create_comment(&self, input: NewComment) -> ForumResult<Comment> {
        let mut tables = self.tables.write().await;

        if !tables.post_live(input.post_id) {
            return Err(ForumError::not_found("Post", input.post_id));
        }
        if let Some(parent_id) = input.parent_id {
            let on_post = tables
                .comments
                .get(&parent_id)
                .is_some_and(|row| row.is_live() && row.record.post_id == input.post_id);
            if !on_post {
                return Err(ForumError::BadRequest(format!(
                    "Parent comment {} is not a live comment on this post",
                    parent_id
                )));
            }
        }
        if !tables.user_exists(input.user_id) || tables.comments.contains_key(&input.id) {
            return Err(ForumError::ConstraintViolation(MISSING_REFERENCE.to_string()));
        }

        let now = Utc::now();
        let comment = StoredComment {
            id: input.id,
            post_id: input.post_id,
            parent_id: input.parent_id,
            user_id: input.user_id,
            body: input.body,
            created_at: now,
            updated_at: now,
        };
        let view = tables.comment_view(&comment)?;
        tables.comments.insert(comment.id, Row::new(comment));

        tracing::info!(comment_id = %view.id, post_id = %view.post_id, "Created comment");
        Ok(view)
    }

    async fn get_comment(&self, id: Uuid) -> ForumResult<Option<Lifecycle<Comment>>> {
        let tables = self.tables.read().await;
        let Some(row) = tables.comments.get(&id) else {
            return Ok(None);
        };

        let comment = tables.comment_view(&row.record)?;
        Ok(Some(Lifecycle::from_parts(comment, row.deleted_at)))
    }

    async fn update_comment(&self, id: Uuid, body: String) -> ForumResult<Option<Comment>> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.comments.get_mut(&id).filter(|row| row.is_live()) else {
            return Ok(None);
        };

        row.record.body = body;
        row.record.updated_at = Utc::now();

        let stored = row.record.clone();
        tables.comment_view(&stored).map(Some)
    }

    async fn soft_delete_comment(&self, id: Uuid) -> ForumResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.comments.get_mut(&id).is_some_and(Row::soft_delete))
    }

    async fn list_comments(&self, post_id: Uuid) -> ForumResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        if !tables.post_live(post_id) {
            return Err(ForumError::not_found("Post", post_id));
        }

        let mut rows: Vec<&StoredComment> = tables
            .comments
            .values()
            .filter(|row| row.is_live() && row.record.post_id == post_id)
            .map(|row| &row.record)
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        rows.into_iter()
            .map(|comment| tables.comment_view(comment))
            .collect()
    }
}

#[async_trait]
impl VoteRepository for InMemoryStore {
    async fn create_vote(&self, input: NewVote) -> ForumResult<Vote> {
        let mut tables = self.tables.write().await;

        tables.target_live(input.target)?;
        if !tables.user_exists(input.user_id) {
            return Err(ForumError::ConstraintViolation(MISSING_REFERENCE.to_string()));
        }

        let duplicate = tables
            .votes
            .values()
            .any(|vote| vote.user_id == input.user_id && vote.target() == input.target);
        if duplicate || tables.votes.contains_key(&input.id) {
            return Err(ForumError::ConstraintViolation(
                "Already voted on this target".to_string(),
            ));
        }

        let vote = Vote {
            id: input.id,
            user_id: input.user_id,
            target_type: input.target.target_type(),
            target_id: input.target.id(),
            value: input.value,
            created_at: Utc::now(),
        };
        tables.votes.insert(vote.id, vote.clone());
        Ok(vote)
    }

    async fn tally(&self, target: VoteTarget) -> ForumResult<VoteTally> {
        let tables = self.tables.read().await;
        tables.target_live(target)?;

        Ok(tables
            .votes
            .values()
            .filter(|vote| vote.target() == target)
            .fold(VoteTally::empty(target), |tally, vote| tally.count(vote.value)))
    }
}
