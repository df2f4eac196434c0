use chrono::{DateTime, Utc};
use sea_orm::sea_query::StringLen;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

fn validate_vote_value(value: i32) -> Result<(), ValidationError> {
    if matches!(value, 1 | -1) {
        Ok(())
    } else {
        Err(ValidationError::new("vote_value").with_message("value must be 1 or -1".into()))
    }
}

/// Stored discriminator of a vote target
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
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
pub enum VoteTargetType {
    #[sea_orm(string_value = "post")]
    Post,
    #[sea_orm(string_value = "comment")]
    Comment,
}

/// What a vote is cast on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteTarget {
    Post(Uuid),
    Comment(Uuid),
}

impl VoteTarget {
    pub fn new(target_type: VoteTargetType, id: Uuid) -> Self {
        match target_type {
            VoteTargetType::Post => Self::Post(id),
            VoteTargetType::Comment => Self::Comment(id),
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Post(id) | Self::Comment(id) => *id,
        }
    }

    pub fn target_type(&self) -> VoteTargetType {
        match self {
            Self::Post(_) => VoteTargetType::Post,
            Self::Comment(_) => VoteTargetType::Comment,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Vote {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target_type: VoteTargetType,
    pub target_id: Uuid,
    /// `1` for an upvote, `-1` for a downvote
    pub value: i32,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    pub fn target(&self) -> VoteTarget {
        VoteTarget::new(self.target_type, self.target_id)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateVote {
    pub target_type: VoteTargetType,
    pub target_id: Uuid,
    #[validate(custom(function = "validate_vote_value"))]
    pub value: i32,
}

impl CreateVote {
    pub fn target(&self) -> VoteTarget {
        VoteTarget::new(self.target_type, self.target_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVote {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target: VoteTarget,
    pub value: i32,
}

/// Query string of the tally endpoint
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TallyQuery {
    pub target_type: VoteTargetType,
    pub target_id: Uuid,
}

impl TallyQuery {
    pub fn target(&self) -> VoteTarget {
        VoteTarget::new(self.target_type, self.target_id)
    }
}

/// Aggregate of every vote on one target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct VoteTally {
    pub target_type: VoteTargetType,
    pub target_id: Uuid,
    /// Sum of all values
    pub score: i64,
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VoteTally {
    pub fn empty(target: VoteTarget) -> Self {
        Self {
            target_type: target.target_type(),
            target_id: target.id(),
            score: 0,
            upvotes: 0,
            downvotes: 0,
        }
    }

    pub fn count(mut self, value: i32) -> Self {
        self.score += i64::from(value);
        if value > 0 {
            self.upvotes += 1;
        } else if value < 0 {
            self.downvotes += 1;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_value_must_be_unit() {
        let vote = |value| CreateVote {
            target_type: VoteTargetType::Post,
            target_id: Uuid::nil(),
            value,
        };

        assert!(vote(1).validate().is_ok());
        assert!(vote(-1).validate().is_ok());
        assert!(vote(0).validate().is_err());
        assert!(vote(2).validate().is_err());
    }

    #[test]
    fn test_target_round_trips_through_columns() {
        let id = Uuid::now_v7();
        let target = VoteTarget::Comment(id);

        assert_eq!(target.target_type(), VoteTargetType::Comment);
        assert_eq!(VoteTarget::new(target.target_type(), target.id()), target);
    }

    #[test]
    fn test_target_type_column_values() {
        use sea_orm::ActiveEnum;

        assert_eq!(VoteTargetType::Post.to_value(), "post");
        assert_eq!(
            VoteTargetType::try_from_value(&"comment".to_string()).unwrap(),
            VoteTargetType::Comment
        );
    }

    #[test]
    fn test_target_type_wire_names() {
        assert_eq!(VoteTargetType::Post.to_string(), "post");
        assert_eq!(
            serde_json::to_string(&VoteTargetType::Comment).unwrap(),
            "\"comment\""
        );
    }

    #[test]
    fn test_tally_counts() {
        let tally = [1, 1, -1]
            .into_iter()
            .fold(VoteTally::empty(VoteTarget::Post(Uuid::nil())), VoteTally::count);

        assert_eq!(tally.score, 1);
        assert_eq!(tally.upvotes, 2);
        assert_eq!(tally.downvotes, 1);
    }
}
