//! Raw-SQL helpers shared by the Postgres repositories.

use sea_orm::{DatabaseConnection, DbBackend, FromQueryResult, Statement};
use uuid::Uuid;

use crate::error::{ForumResult, internal};

/// Tables with an `id` primary key and a `deleted_at` column.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SoftDeleteTable {
    Users,
    Posts,
    Comments,
}

impl SoftDeleteTable {
    fn live_sql(self) -> &'static str {
        match self {
            Self::Users => {
                "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND deleted_at IS NULL) AS exists"
            }
            Self::Posts => {
                "SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1 AND deleted_at IS NULL) AS exists"
            }
            Self::Comments => {
                "SELECT EXISTS(SELECT 1 FROM comments WHERE id = $1 AND deleted_at IS NULL) AS exists"
            }
        }
    }
}

#[derive(FromQueryResult)]
struct ExistsResult {
    exists: bool,
}

/// True when a row with `id` exists and is not soft-deleted.
pub(crate) async fn is_live(
    db: &DatabaseConnection,
    table: SoftDeleteTable,
    id: Uuid,
) -> ForumResult<bool> {
    let stmt = Statement::from_sql_and_values(DbBackend::Postgres, table.live_sql(), [id.into()]);

    let result = ExistsResult::find_by_statement(stmt)
        .one(db)
        .await
        .map_err(internal)?;

    Ok(result.is_some_and(|r| r.exists))
}

#[derive(FromQueryResult)]
pub(crate) struct IdRow {
    pub id: Uuid,
}
