use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::users::Author;

pub const COMMENT_BODY_MAX: u64 = 10_000;

/// A live comment with its author resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    /// `None` for a top-level comment
    pub parent_id: Option<Uuid>,
    pub body: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateComment {
    #[validate(length(min = 1, max = COMMENT_BODY_MAX))]
    pub body: String,
    /// Reply target; must be a live comment on the same post
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdateComment {
    #[validate(length(min = 1, max = COMMENT_BODY_MAX))]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub user_id: Uuid,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_body_bounds() {
        let empty = CreateComment {
            body: String::new(),
            parent_id: None,
        };
        assert!(empty.validate().is_err());

        let too_long = UpdateComment {
            body: "x".repeat(COMMENT_BODY_MAX as usize + 1),
        };
        assert!(too_long.validate().is_err());

        let ok = UpdateComment { body: "Agreed".into() };
        assert!(ok.validate().is_ok());
    }
}
