//! Votes on posts and comments, one per user per target.

pub mod entity;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use models::{CreateVote, NewVote, TallyQuery, Vote, VoteTally, VoteTarget, VoteTargetType};
pub use postgres::PgVoteRepository;
pub use repository::VoteRepository;
pub use service::VoteService;
