//! Posts and the feed (chronological or similarity-ranked).

pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use models::{CreatePost, NewPost, Post, UpdatePost};
pub use postgres::PgPostRepository;
pub use repository::PostRepository;
pub use service::PostService;
