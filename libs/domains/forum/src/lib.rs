//! Forum Domain
//!
//! Users, topics, posts, threaded comments and votes, plus the post feed with
//! semantic search.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← axum routers, one per aggregate
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← validation, ownership, embedding calls
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← trait per aggregate; Postgres and in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← read models, DTOs, sea-orm entities
//! └─────────────┘
//! ```
//!
//! Soft-deleted rows stay stored. Single-row lookups return a [`Lifecycle`] so the
//! service decides what a deleted row means; list queries never return them.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_forum::{InMemoryStore, posts, topics};
//! use domain_embeddings::{EmbeddingConfig, OpenAIProvider};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryStore::seeded();
//! let embedder = Arc::new(OpenAIProvider::new(EmbeddingConfig::new("sk-...".to_string()))?);
//!
//! let router = axum::Router::new()
//!     .nest("/topics", topics::handlers::router(topics::TopicService::new(store.clone())))
//!     .nest("/posts", posts::handlers::router(posts::PostService::new(store, embedder)));
//! # Ok(())
//! # }
//! ```

pub mod caller;
pub mod comments;
pub mod error;
pub mod lifecycle;
pub mod memory;
mod pg;
pub mod posts;
pub mod ranking;
pub mod topics;
pub mod users;
pub mod votes;

pub use caller::Caller;
pub use comments::{
    Comment, CommentNode, CommentRepository, CommentService, PgCommentRepository,
};
pub use error::{ForumError, ForumResult};
pub use lifecycle::Lifecycle;
pub use memory::InMemoryStore;
pub use posts::{PgPostRepository, Post, PostRepository, PostService};
pub use ranking::{FeedOrder, FeedQuery, SIMILARITY_PAGE_SIZE};
pub use topics::{PgTopicRepository, Topic, TopicRepository, TopicService};
pub use users::{PgUserRepository, Role, UserProfile, UserRepository, UserService};
pub use votes::{PgVoteRepository, VoteRepository, VoteService, VoteTally, VoteTarget};
