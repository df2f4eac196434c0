use async_trait::async_trait;
use uuid::Uuid;

use super::models::{NewUser, User};
use crate::error::ForumResult;
use crate::lifecycle::Lifecycle;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; duplicate username or email is a `ConstraintViolation`
    async fn create_user(&self, input: NewUser) -> ForumResult<User>;

    async fn get_user(&self, id: Uuid) -> ForumResult<Option<Lifecycle<User>>>;

    /// Live users only
    async fn find_user_by_username(&self, username: &str) -> ForumResult<Option<User>>;

    /// Returns false when no live row was found
    async fn soft_delete_user(&self, id: Uuid) -> ForumResult<bool>;
}
