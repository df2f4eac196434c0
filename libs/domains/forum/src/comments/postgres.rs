use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement};
use uuid::Uuid;

use super::models::{Comment, NewComment};
use super::repository::CommentRepository;
use crate::error::{ForumError, ForumResult, db_err, internal};
use crate::lifecycle::Lifecycle;
use crate::pg::{SoftDeleteTable, is_live};
use crate::users::Author;

const SELECT_COMMENT: &str = r#"
    SELECT c.id, c.post_id, c.parent_id, c.body, c.created_at, c.updated_at, c.deleted_at,
           u.id AS author_id, u.username AS author_username
    FROM comments c
    JOIN users u ON u.id = c.user_id
"#;

#[derive(Clone)]
pub struct PgCommentRepository {
    db: DatabaseConnection,
}

impl PgCommentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn parent_on_post(&self, parent_id: Uuid, post_id: Uuid) -> ForumResult<bool> {
        #[derive(FromQueryResult)]
        struct Found {
            found: bool,
        }

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"SELECT EXISTS(
                   SELECT 1 FROM comments
                   WHERE id = $1 AND post_id = $2 AND deleted_at IS NULL
               ) AS found"#,
            [parent_id.into(), post_id.into()],
        );

        let row = Found::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(internal)?;
        Ok(row.is_some_and(|r| r.found))
    }
}

#[derive(Debug, FromQueryResult)]
struct CommentRow {
    id: Uuid,
    post_id: Uuid,
    parent_id: Option<Uuid>,
    body: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    author_id: Uuid,
    author_username: String,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            parent_id: row.parent_id,
            body: row.body,
            author: Author {
                id: row.author_id,
                username: row.author_username,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create_comment(&self, input: NewComment) -> ForumResult<Comment> {
        if !is_live(&self.db, SoftDeleteTable::Posts, input.post_id).await? {
            return Err(ForumError::not_found("Post", input.post_id));
        }
        if let Some(parent_id) = input.parent_id {
            if !self.parent_on_post(parent_id, input.post_id).await? {
                return Err(ForumError::BadRequest(format!(
                    "Parent comment {} is not a live comment on this post",
                    parent_id
                )));
            }
        }

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            INSERT INTO comments (id, body, user_id, post_id, parent_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, now(), now())
            "#,
            [
                input.id.into(),
                input.body.into(),
                input.user_id.into(),
                input.post_id.into(),
                input.parent_id.into(),
            ],
        );
        self.db
            .execute_raw(stmt)
            .await
            .map_err(|e| db_err(e, "Comment could not be created"))?;

        tracing::info!(comment_id = %input.id, post_id = %input.post_id, "Created comment");

        self.get_comment(input.id)
            .await?
            .and_then(Lifecycle::live)
            .ok_or_else(|| {
                ForumError::Internal(format!("Comment {} vanished after insert", input.id))
            })
    }

    async fn get_comment(&self, id: Uuid) -> ForumResult<Option<Lifecycle<Comment>>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!("{} WHERE c.id = $1", SELECT_COMMENT),
            [id.into()],
        );

        let row = CommentRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(internal)?;

        Ok(row.map(|row| {
            let deleted_at = row.deleted_at;
            Lifecycle::from_parts(row.into(), deleted_at)
        }))
    }

    async fn update_comment(&self, id: Uuid, body: String) -> ForumResult<Option<Comment>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "UPDATE comments SET body = $2, updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
            [id.into(), body.into()],
        );

        let result = self.db.execute_raw(stmt).await.map_err(internal)?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        tracing::info!(comment_id = %id, "Updated comment");
        Ok(self.get_comment(id).await?.and_then(Lifecycle::live))
    }

    async fn soft_delete_comment(&self, id: Uuid) -> ForumResult<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "UPDATE comments SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
            [id.into()],
        );

        let result = self.db.execute_raw(stmt).await.map_err(internal)?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(comment_id = %id, "Soft-deleted comment");
        }
        Ok(deleted)
    }

    async fn list_comments(&self, post_id: Uuid) -> ForumResult<Vec<Comment>> {
        if !is_live(&self.db, SoftDeleteTable::Posts, post_id).await? {
            return Err(ForumError::not_found("Post", post_id));
        }

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!(
                "{} WHERE c.post_id = $1 AND c.deleted_at IS NULL ORDER BY c.created_at ASC, c.id ASC",
                SELECT_COMMENT
            ),
            [post_id.into()],
        );

        let rows = CommentRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(internal)?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }
}
