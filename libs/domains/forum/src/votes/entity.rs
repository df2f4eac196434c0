use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use super::models::{NewVote, Vote, VoteTargetType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "votes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub target_id: Uuid,
    pub target_type: VoteTargetType,
    pub value: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Vote {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            target_type: model.target_type,
            target_id: model.target_id,
            value: model.value,
            created_at: model.created_at.into(),
        }
    }
}

impl From<NewVote> for ActiveModel {
    fn from(input: NewVote) -> Self {
        ActiveModel {
            id: Set(input.id),
            user_id: Set(input.user_id),
            target_id: Set(input.target.id()),
            target_type: Set(input.target.target_type()),
            value: Set(input.value),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
