use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement};

use super::entity;
use super::models::{NewVote, Vote, VoteTally, VoteTarget};
use super::repository::VoteRepository;
use crate::error::{ForumError, ForumResult, db_err, internal};
use crate::pg::{SoftDeleteTable, is_live};

#[derive(Clone)]
pub struct PgVoteRepository {
    db: DatabaseConnection,
}

impl PgVoteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn ensure_target_live(&self, target: VoteTarget) -> ForumResult<()> {
        let (table, entity) = match target {
            VoteTarget::Post(_) => (SoftDeleteTable::Posts, "Post"),
            VoteTarget::Comment(_) => (SoftDeleteTable::Comments, "Comment"),
        };

        if !is_live(&self.db, table, target.id()).await? {
            return Err(ForumError::not_found(entity, target.id()));
        }
        Ok(())
    }
}

#[derive(FromQueryResult)]
struct TallyRow {
    score: i64,
    upvotes: i64,
    downvotes: i64,
}

#[async_trait]
impl VoteRepository for PgVoteRepository {
    async fn create_vote(&self, input: NewVote) -> ForumResult<Vote> {
        self.ensure_target_live(input.target).await?;

        let active: entity::ActiveModel = input.into();
        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| db_err(e, "Already voted on this target"))?;

        tracing::info!(
            vote_id = %model.id,
            target_id = %model.target_id,
            target_type = %model.target_type,
            "Recorded vote"
        );
        Ok(model.into())
    }

    async fn tally(&self, target: VoteTarget) -> ForumResult<VoteTally> {
        self.ensure_target_live(target).await?;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT COALESCE(SUM(value), 0)::bigint AS score,
                   COUNT(*) FILTER (WHERE value > 0) AS upvotes,
                   COUNT(*) FILTER (WHERE value < 0) AS downvotes
            FROM votes
            WHERE target_id = $1 AND target_type = $2
            "#,
            [target.id().into(), target.target_type().to_string().into()],
        );

        let row = TallyRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(internal)?;

        Ok(match row {
            Some(row) => VoteTally {
                score: row.score,
                upvotes: row.upvotes,
                downvotes: row.downvotes,
                ..VoteTally::empty(target)
            },
            None => VoteTally::empty(target),
        })
    }
}
