use chrono::{DateTime, Utc};
use regex::Regex;
use sea_orm::sea_query::StringLen;
use sea_orm::{DeriveActiveEnum, EnumIter, FromQueryResult};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const USERNAME_MIN: u64 = 3;
pub const USERNAME_MAX: u64 = 32;
pub const PASSWORD_MIN: u64 = 8;

/// Letters, digits and underscores
static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !USERNAME_PATTERN.is_match(username) {
        return Err(ValidationError::new("invalid_username"));
    }
    Ok(())
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    #[default]
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "sys_admin")]
    SysAdmin,
}

/// Stored user, including the password hash. Never serialized outward.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// A resolved user reference: post and comment authors, topic moderators
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, FromQueryResult)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
}

impl From<&User> for Author {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// DTO for registering a user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[validate(
        length(min = USERNAME_MIN, max = USERNAME_MAX),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = PASSWORD_MIN))]
    pub password: String,
}

/// DTO for logging in with a username and password
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginUser {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Insert payload handed to the repository, password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl User {
    pub fn new(input: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: input.id,
            username: input.username,
            email: input.email,
            password_hash: input.password_hash,
            role: input.role,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str) -> RegisterUser {
        RegisterUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register("alice_01", "alice@example.com", "hunter22").validate().is_ok());

        assert!(register("al", "alice@example.com", "hunter22").validate().is_err());
        assert!(register(&"a".repeat(33), "alice@example.com", "hunter22").validate().is_err());
        assert!(register("alice-01", "alice@example.com", "hunter22").validate().is_err());
        assert!(register("alice", "not-an-email", "hunter22").validate().is_err());
        assert!(register("alice", "alice@example.com", "short").validate().is_err());
    }

    #[test]
    fn test_role_column_values() {
        use sea_orm::ActiveEnum;

        assert_eq!(Role::SysAdmin.to_value(), "sys_admin");
        assert_eq!(Role::try_from_value(&"user".to_string()).unwrap(), Role::User);
    }

    #[test]
    fn test_role_strings() {
        assert_eq!(Role::SysAdmin.to_string(), "sys_admin");
        assert_eq!(
            serde_json::to_value(Role::User).unwrap(),
            serde_json::json!("user")
        );
    }

    #[test]
    fn test_profile_drops_password_hash() {
        let user = User::new(NewUser {
            id: Uuid::now_v7(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$...".into(),
            role: Role::User,
        });

        let json = serde_json::to_string(&UserProfile::from(user)).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("alice@example.com"));
    }
}
