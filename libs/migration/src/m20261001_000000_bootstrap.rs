use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // pgvector provides the `vector` column type and the `<=>` cosine distance operator
        db.execute_unprepared("CREATE EXTENSION IF NOT EXISTS vector")
            .await?;

        db.execute_unprepared("CREATE SCHEMA IF NOT EXISTS util")
            .await?;

        db.execute_unprepared(
            r#"
            CREATE OR REPLACE FUNCTION util.touch_updated_at()
            RETURNS TRIGGER AS $$
            BEGIN
                NEW.updated_at = NOW();
                RETURN NEW;
            END;
            $$ LANGUAGE plpgsql
            "#,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("DROP FUNCTION IF EXISTS util.touch_updated_at()")
            .await?;
        db.execute_unprepared("DROP SCHEMA IF EXISTS util").await?;
        db.execute_unprepared("DROP EXTENSION IF EXISTS vector")
            .await?;

        Ok(())
    }
}
