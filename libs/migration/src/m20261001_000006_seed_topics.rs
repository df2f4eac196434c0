use sea_orm::ConnectionTrait;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Default topics; `general` is where posts without a topic land.
pub const SEED_TOPICS: [(&str, &str, &str, &str); 5] = [
    (
        "01927d3a-0000-7000-8000-000000000001",
        "general",
        "General",
        "General Discussion",
    ),
    (
        "01927d3a-0000-7000-8000-000000000002",
        "tech",
        "Technology",
        "Tech News & Programming",
    ),
    (
        "01927d3a-0000-7000-8000-000000000003",
        "career",
        "Career",
        "Career Advice",
    ),
    (
        "01927d3a-0000-7000-8000-000000000004",
        "personal_finance",
        "Personal Finance",
        "Personal Finance",
    ),
    (
        "01927d3a-0000-7000-8000-000000000005",
        "random",
        "Random",
        "Off-topic chatter",
    ),
];

/// Insert any missing default topics; existing slugs are left untouched.
///
/// Runs as a migration and again at every startup, so a deleted `general` row comes back.
/// Returns the number of topics inserted.
pub async fn seed_topics<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    let values = SEED_TOPICS
        .iter()
        .map(|(id, slug, title, description)| {
            format!(
                "('{}', '{}', '{}', '{}', NOW(), NOW())",
                id, slug, title, description
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");

    let result = db
        .execute_unprepared(&format!(
            r#"
            INSERT INTO topics (id, slug, title, description, created_at, updated_at)
            VALUES
            {}
            ON CONFLICT (slug) DO NOTHING
            "#,
            values
        ))
        .await?;

    Ok(result.rows_affected())
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        seed_topics(manager.get_connection()).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let ids = SEED_TOPICS
            .iter()
            .map(|(id, ..)| format!("'{}'", id))
            .collect::<Vec<_>>()
            .join(", ");

        manager
            .get_connection()
            .execute_unprepared(&format!("DELETE FROM topics WHERE id IN ({})", ids))
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_seed_topics_skips_existing_slugs() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        assert_eq!(seed_topics(&db).await.unwrap(), 1);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("ON CONFLICT (slug) DO NOTHING"));
        for (id, slug, ..) in SEED_TOPICS {
            assert!(log.contains(id), "missing {slug}");
        }
    }
}
