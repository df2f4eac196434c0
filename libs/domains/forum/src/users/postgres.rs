use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    sea_query::Expr,
};
use uuid::Uuid;

use super::entity;
use super::models::{NewUser, User};
use super::repository::UserRepository;
use crate::error::{ForumResult, db_err, internal};
use crate::lifecycle::Lifecycle;

#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, input: NewUser) -> ForumResult<User> {
        let active_model: entity::ActiveModel = input.into();

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| db_err(e, "Username or email already registered"))?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(model.into())
    }

    async fn get_user(&self, id: Uuid) -> ForumResult<Option<Lifecycle<User>>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(internal)?;

        Ok(model.map(|m| {
            let deleted_at = m.deleted_at.map(Into::into);
            Lifecycle::from_parts(User::from(m), deleted_at)
        }))
    }

    async fn find_user_by_username(&self, username: &str) -> ForumResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Username.eq(username))
            .filter(entity::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(internal)?;

        Ok(model.map(Into::into))
    }

    async fn soft_delete_user(&self, id: Uuid) -> ForumResult<bool> {
        let now = chrono::Utc::now();

        let result = entity::Entity::update_many()
            .col_expr(entity::Column::DeletedAt, Expr::value(now))
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(internal)?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = %id, "Soft-deleted user");
        }
        Ok(result.rows_affected > 0)
    }
}

