//! Topics and the per-topic moderator set.

pub mod entity;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use models::{CreateTopic, DEFAULT_TOPIC_SLUG, Topic, TopicRef, UpdateTopic};
pub use postgres::PgTopicRepository;
pub use repository::TopicRepository;
pub use service::TopicService;
