//! Threaded comments: flat parent-linked rows, assembled into a tree on read.

pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod tree;

pub use models::{Comment, CreateComment, NewComment, UpdateComment};
pub use postgres::PgCommentRepository;
pub use repository::CommentRepository;
pub use service::CommentService;
pub use tree::{CommentNode, assemble};
