use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261001_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Topics::Table)
                    .if_not_exists()
                    .col(pk_uuid(Topics::Id))
                    .col(string(Topics::Slug).unique_key())
                    .col(string(Topics::Title))
                    .col(text(Topics::Description).default(""))
                    .col(
                        timestamp_with_time_zone(Topics::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Topics::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Topics::DeletedAt))
                    .to_owned(),
            )
            .await?;

        // Moderator set: one row per (topic, user)
        manager
            .create_table(
                Table::create()
                    .table(TopicModerators::Table)
                    .if_not_exists()
                    .col(uuid(TopicModerators::TopicId))
                    .col(uuid(TopicModerators::UserId))
                    .col(
                        timestamp_with_time_zone(TopicModerators::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(TopicModerators::TopicId)
                            .col(TopicModerators::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_topic_moderators_topic")
                            .from(TopicModerators::Table, TopicModerators::TopicId)
                            .to(Topics::Table, Topics::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_topic_moderators_user")
                            .from(TopicModerators::Table, TopicModerators::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER topics_touch_updated_at
                    BEFORE UPDATE ON topics
                    FOR EACH ROW
                    EXECUTE FUNCTION util.touch_updated_at()
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TopicModerators::Table).to_owned())
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TRIGGER IF EXISTS topics_touch_updated_at ON topics")
            .await?;

        manager
            .drop_table(Table::drop().table(Topics::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Topics {
    Table,
    Id,
    Slug,
    Title,
    Description,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum TopicModerators {
    Table,
    TopicId,
    UserId,
    CreatedAt,
}
