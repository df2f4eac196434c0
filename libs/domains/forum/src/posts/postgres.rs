use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement};
use uuid::Uuid;

use super::models::{NewPost, Post, UpdatePost};
use super::repository::PostRepository;
use crate::error::{ForumError, ForumResult, db_err, internal};
use crate::lifecycle::Lifecycle;
use crate::pg::IdRow;
use crate::ranking::{FeedOrder, SIMILARITY_PAGE_SIZE};
use crate::topics::{DEFAULT_TOPIC_SLUG, TopicRef};
use crate::users::Author;

const SELECT_POST: &str = r#"
    SELECT p.id, p.title, p.body, p.created_at, p.updated_at, p.deleted_at,
           u.id AS author_id, u.username AS author_username,
           t.id AS topic_id, t.slug AS topic_slug, t.title AS topic_title
    FROM posts p
    JOIN users u ON u.id = p.user_id
    JOIN topics t ON t.id = p.topic_id
"#;

#[derive(Clone)]
pub struct PgPostRepository {
    db: DatabaseConnection,
}

impl PgPostRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch(&self, stmt: Statement) -> ForumResult<Vec<PostRow>> {
        PostRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(internal)
    }
}

#[derive(Debug, FromQueryResult)]
struct PostRow {
    id: Uuid,
    title: String,
    body: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    author_id: Uuid,
    author_username: String,
    topic_id: Uuid,
    topic_slug: String,
    topic_title: String,
}

impl PostRow {
    fn into_lifecycle(self) -> Lifecycle<Post> {
        let deleted_at = self.deleted_at;
        Lifecycle::from_parts(self.into(), deleted_at)
    }
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            body: row.body,
            author: Author {
                id: row.author_id,
                username: row.author_username,
            },
            topic: TopicRef {
                id: row.topic_id,
                slug: row.topic_slug,
                title: row.topic_title,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create_post(&self, input: NewPost) -> ForumResult<Post> {
        // Topic resolution and the embedding write happen in the one statement
        let sql = r#"
            INSERT INTO posts (id, title, body, user_id, topic_id, embedding, created_at, updated_at)
            SELECT $1, $2, $3, $4, t.id, $5::vector, now(), now()
            FROM topics t
            WHERE t.deleted_at IS NULL
              AND (($6::uuid IS NOT NULL AND t.id = $6::uuid)
                   OR ($6::uuid IS NULL AND t.slug = $7))
            RETURNING id
        "#;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                input.id.into(),
                input.title.into(),
                input.body.into(),
                input.user_id.into(),
                input.embedding.to_vector_literal().into(),
                input.topic_id.into(),
                DEFAULT_TOPIC_SLUG.into(),
            ],
        );

        let inserted = IdRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| db_err(e, "Post could not be created"))?;

        let Some(IdRow { id }) = inserted else {
            return Err(match input.topic_id {
                Some(topic_id) => ForumError::not_found("Topic", topic_id),
                None => ForumError::Internal(format!(
                    "Default topic '{}' is missing",
                    DEFAULT_TOPIC_SLUG
                )),
            });
        };

        tracing::info!(post_id = %id, "Created post");

        self.get_post(id)
            .await?
            .and_then(Lifecycle::live)
            .ok_or_else(|| ForumError::Internal(format!("Post {} vanished after insert", id)))
    }

    async fn get_post(&self, id: Uuid) -> ForumResult<Option<Lifecycle<Post>>> {
        let sql = format!("{} WHERE p.id = $1", SELECT_POST);
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [id.into()]);

        let row = PostRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(internal)?;

        Ok(row.map(PostRow::into_lifecycle))
    }

    async fn update_post(&self, id: Uuid, input: UpdatePost) -> ForumResult<Option<Post>> {
        let sql = r#"
            UPDATE posts
            SET title = COALESCE($2, title), body = COALESCE($3, body), updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
        "#;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [id.into(), input.title.into(), input.body.into()],
        );

        let result = self.db.execute_raw(stmt).await.map_err(internal)?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        tracing::info!(post_id = %id, "Updated post");
        Ok(self.get_post(id).await?.and_then(Lifecycle::live))
    }

    async fn soft_delete_post(&self, id: Uuid) -> ForumResult<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "UPDATE posts SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
            [id.into()],
        );

        let result = self.db.execute_raw(stmt).await.map_err(internal)?;
        let deleted = result.rows_affected() > 0;

        if deleted {
            tracing::info!(post_id = %id, "Soft-deleted post");
        }
        Ok(deleted)
    }

    async fn list_posts(&self, order: FeedOrder, topic_id: Option<Uuid>) -> ForumResult<Vec<Post>> {
        let stmt = match order {
            FeedOrder::Chronological => Statement::from_sql_and_values(
                DbBackend::Postgres,
                format!(
                    "{} WHERE p.deleted_at IS NULL AND ($1::uuid IS NULL OR p.topic_id = $1::uuid) \
                     ORDER BY p.created_at DESC, p.id DESC",
                    SELECT_POST
                ),
                [topic_id.into()],
            ),
            // pgvector cosine distance; rows without an embedding sort last
            FeedOrder::Similarity(query) => Statement::from_sql_and_values(
                DbBackend::Postgres,
                format!(
                    "{} WHERE p.deleted_at IS NULL AND ($2::uuid IS NULL OR p.topic_id = $2::uuid) \
                     ORDER BY p.embedding <=> $1::vector ASC NULLS LAST, p.created_at DESC \
                     LIMIT {}",
                    SELECT_POST, SIMILARITY_PAGE_SIZE
                ),
                [query.to_vector_literal().into(), topic_id.into()],
            ),
        };

        let rows = self.fetch(stmt).await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }
}
