//! Users: registration, login, profiles, soft delete.

pub mod entity;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use models::{Author, LoginUser, NewUser, RegisterUser, Role, User, UserProfile};
pub use postgres::PgUserRepository;
pub use repository::UserRepository;
pub use service::UserService;
