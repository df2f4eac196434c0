use async_trait::async_trait;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, QueryTrait, Statement,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use super::entity::{moderator, topic};
use super::models::{Topic, UpdateTopic};
use super::repository::TopicRepository;
use crate::error::{ForumError, ForumResult, db_err, internal};
use crate::lifecycle::Lifecycle;
use crate::pg::{SoftDeleteTable, is_live};
use crate::users::Author;

#[derive(Clone)]
pub struct PgTopicRepository {
    db: DatabaseConnection,
}

impl PgTopicRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TopicRepository for PgTopicRepository {
    async fn create_topic(&self, input: Topic) -> ForumResult<Topic> {
        let active_model: topic::ActiveModel = input.into();

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| db_err(e, "A topic with this slug already exists"))?;

        tracing::info!(topic_id = %model.id, slug = %model.slug, "Created topic");
        Ok(model.into())
    }

    async fn get_topic(&self, id: Uuid) -> ForumResult<Option<Lifecycle<Topic>>> {
        let model = topic::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(internal)?;

        Ok(model.map(|m| {
            let deleted_at = m.deleted_at.map(Into::into);
            Lifecycle::from_parts(Topic::from(m), deleted_at)
        }))
    }

    async fn list_topics(&self) -> ForumResult<Vec<Topic>> {
        let models = topic::Entity::find()
            .filter(topic::Column::DeletedAt.is_null())
            .order_by_asc(topic::Column::Slug)
            .all(&self.db)
            .await
            .map_err(internal)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_topic(&self, id: Uuid, input: UpdateTopic) -> ForumResult<Option<Topic>> {
        let Some(model) = topic::Entity::find_by_id(id)
            .filter(topic::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(internal)?
        else {
            return Ok(None);
        };

        let mut current: Topic = model.into();
        current.apply_update(input);

        let mut active_model: topic::ActiveModel = current.into();
        active_model.created_at = NotSet;
        active_model.deleted_at = NotSet;

        let updated = active_model.update(&self.db).await.map_err(internal)?;

        tracing::info!(topic_id = %id, "Updated topic");
        Ok(Some(updated.into()))
    }

    async fn soft_delete_topic(&self, id: Uuid) -> ForumResult<bool> {
        let result = topic::Entity::update_many()
            .col_expr(topic::Column::DeletedAt, Expr::value(chrono::Utc::now()))
            .filter(topic::Column::Id.eq(id))
            .filter(topic::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(internal)?;

        if result.rows_affected > 0 {
            tracing::info!(topic_id = %id, "Soft-deleted topic");
        }
        Ok(result.rows_affected > 0)
    }

    async fn is_moderator(&self, topic_id: Uuid, user_id: Uuid) -> ForumResult<bool> {
        let found = moderator::Entity::find_by_id((topic_id, user_id))
            .one(&self.db)
            .await
            .map_err(internal)?;

        Ok(found.is_some())
    }

    async fn add_moderator(&self, topic_id: Uuid, user_id: Uuid) -> ForumResult<()> {
        if !is_live(&self.db, SoftDeleteTable::Users, user_id).await? {
            return Err(ForumError::not_found("User", user_id));
        }

        // Already-present pairs are left as they are
        let stmt = moderator::Entity::insert(moderator::ActiveModel::pair(topic_id, user_id))
            .on_conflict(
                OnConflict::columns([moderator::Column::TopicId, moderator::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .build(DbBackend::Postgres);

        self.db
            .execute_raw(stmt)
            .await
            .map_err(|e| db_err(e, "Topic moderator could not be added"))?;

        tracing::info!(topic_id = %topic_id, user_id = %user_id, "Added topic moderator");
        Ok(())
    }

    async fn remove_moderator(&self, topic_id: Uuid, user_id: Uuid) -> ForumResult<bool> {
        let result = moderator::Entity::delete_by_id((topic_id, user_id))
            .exec(&self.db)
            .await
            .map_err(internal)?;

        Ok(result.rows_affected > 0)
    }

    async fn list_moderators(&self, topic_id: Uuid) -> ForumResult<Vec<Author>> {
        let sql = r#"
            SELECT u.id, u.username
            FROM topic_moderators m
            JOIN users u ON u.id = m.user_id
            WHERE m.topic_id = $1 AND u.deleted_at IS NULL
            ORDER BY u.username
        "#;

        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [topic_id.into()]);

        Author::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(internal)
    }
}
