use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261001_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // target_id is polymorphic (post or comment), so it has no foreign key
        manager
            .create_table(
                Table::create()
                    .table(Votes::Table)
                    .if_not_exists()
                    .col(pk_uuid(Votes::Id))
                    .col(uuid(Votes::UserId))
                    .col(uuid(Votes::TargetId))
                    .col(string(Votes::TargetType))
                    .col(integer(Votes::Value))
                    .col(
                        timestamp_with_time_zone(Votes::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_user")
                            .from(Votes::Table, Votes::UserId)
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
                ALTER TABLE votes
                    ADD CONSTRAINT votes_target_type_check CHECK (target_type IN ('post', 'comment')),
                    ADD CONSTRAINT votes_value_check CHECK (value IN (-1, 1))
                "#,
            )
            .await?;

        // One vote per user per target
        manager
            .create_index(
                Index::create()
                    .name("uq_votes_user_target")
                    .table(Votes::Table)
                    .col(Votes::UserId)
                    .col(Votes::TargetId)
                    .col(Votes::TargetType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_votes_target")
                    .table(Votes::Table)
                    .col(Votes::TargetType)
                    .col(Votes::TargetId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Votes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Votes {
    Table,
    Id,
    UserId,
    TargetId,
    TargetType,
    Value,
    CreatedAt,
}
