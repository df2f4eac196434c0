use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::models::{LoginUser, NewUser, RegisterUser, Role, UserProfile};
use super::repository::UserRepository;
use crate::caller::Caller;
use crate::error::{ForumError, ForumResult};
use crate::lifecycle::LiveOrNotFound;

#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self::from_shared(Arc::new(repository))
    }

    pub fn from_shared(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Register a user with the default role; the password is stored as an Argon2 hash.
    pub async fn register(&self, input: RegisterUser) -> ForumResult<UserProfile> {
        input
            .validate()
            .map_err(|e| ForumError::BadRequest(e.to_string()))?;

        let password_hash = hash_password(&input.password)?;

        let user = self
            .repository
            .create_user(NewUser {
                id: Uuid::now_v7(),
                username: input.username,
                email: input.email.to_lowercase(),
                password_hash,
                role: Role::User,
            })
            .await?;

        Ok(user.into())
    }

    /// Check a username and password against the stored hash.
    ///
    /// An unknown username and a wrong password both yield `InvalidCredentials`.
    pub async fn authenticate(&self, input: LoginUser) -> ForumResult<UserProfile> {
        input
            .validate()
            .map_err(|e| ForumError::BadRequest(e.to_string()))?;

        let Some(user) = self
            .repository
            .find_user_by_username(&input.username)
            .await?
        else {
            // Spend the same hashing work as a real check
            let _ = hash_password(&input.password);
            return Err(ForumError::InvalidCredentials);
        };

        verify_password(&input.password, &user.password_hash)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(user.into())
    }

    /// Profile of the calling user
    pub async fn current_profile(&self, caller: &Caller) -> ForumResult<UserProfile> {
        self.get_user(caller.id).await
    }

    pub async fn get_user(&self, id: Uuid) -> ForumResult<UserProfile> {
        let user = self
            .repository
            .get_user(id)
            .await?
            .live_or_not_found("User", id)?;

        Ok(user.into())
    }

    /// Soft-delete a user: allowed for the user themself or a sys_admin
    pub async fn delete_user(&self, caller: &Caller, id: Uuid) -> ForumResult<()> {
        if caller.id != id && !caller.is_sys_admin() {
            return Err(ForumError::Unauthorized(
                "Only the account owner or an administrator can delete a user".to_string(),
            ));
        }

        if !self.repository.soft_delete_user(id).await? {
            return Err(ForumError::not_found("User", id));
        }

        Ok(())
    }
}

fn hash_password(password: &str) -> ForumResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ForumError::Internal(format!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, stored: &str) -> ForumResult<()> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| ForumError::Internal(format!("Stored password hash is malformed: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| ForumError::InvalidCredentials)
}
