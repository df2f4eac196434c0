use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use super::models::Topic;

pub mod topic {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "topics")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub slug: String,
        pub title: String,
        #[sea_orm(column_type = "Text")]
        pub description: String,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
        pub deleted_at: Option<DateTimeWithTimeZone>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for Topic {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                slug: model.slug,
                title: model.title,
                description: model.description,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl From<Topic> for ActiveModel {
        fn from(topic: Topic) -> Self {
            ActiveModel {
                id: Set(topic.id),
                slug: Set(topic.slug),
                title: Set(topic.title),
                description: Set(topic.description),
                created_at: Set(topic.created_at.into()),
                updated_at: Set(topic.updated_at.into()),
                deleted_at: Set(None),
            }
        }
    }
}

pub mod moderator {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "topic_moderators")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub topic_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub user_id: Uuid,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl ActiveModel {
        pub fn pair(topic_id: Uuid, user_id: Uuid) -> Self {
            ActiveModel {
                topic_id: Set(topic_id),
                user_id: Set(user_id),
                created_at: Set(chrono::Utc::now().into()),
            }
        }
    }
}
