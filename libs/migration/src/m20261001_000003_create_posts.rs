use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261001_000001_create_users::Users;
use crate::m20261001_000002_create_topics::Topics;

/// Dimension of the `text-embedding-ada-002` / `text-embedding-3-small` vectors.
const EMBEDDING_DIMENSION: usize = 1536;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(pk_uuid(Posts::Id))
                    .col(string(Posts::Title))
                    .col(text(Posts::Body))
                    .col(uuid(Posts::UserId))
                    .col(uuid(Posts::TopicId))
                    .col(
                        timestamp_with_time_zone(Posts::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Posts::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Posts::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_user")
                            .from(Posts::Table, Posts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_topic")
                            .from(Posts::Table, Posts::TopicId)
                            .to(Topics::Table, Topics::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // sea-query has no vector column type
        manager
            .get_connection()
            .execute_unprepared(&format!(
                "ALTER TABLE posts ADD COLUMN IF NOT EXISTS embedding vector({})",
                EMBEDDING_DIMENSION
            ))
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_created_at")
                    .table(Posts::Table)
                    .col(Posts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_topic_id")
                    .table(Posts::Table)
                    .col(Posts::TopicId)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX IF NOT EXISTS idx_posts_embedding_cosine
                    ON posts USING hnsw (embedding vector_cosine_ops)
                "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER posts_touch_updated_at
                    BEFORE UPDATE ON posts
                    FOR EACH ROW
                    EXECUTE FUNCTION util.touch_updated_at()
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TRIGGER IF EXISTS posts_touch_updated_at ON posts")
            .await?;

        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Posts {
    Table,
    Id,
    Title,
    Body,
    UserId,
    TopicId,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
