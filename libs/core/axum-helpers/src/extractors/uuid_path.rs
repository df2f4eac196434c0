//! UUID path parameter extractor.

use crate::errors::{ErrorCode, ErrorResponse};
use axum::{
    Json,
    extract::{FromRequestParts, Path},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Single `{id}` path segment parsed as a UUID.
///
/// A malformed id is rejected with 400 `INVALID_UUID` before the handler runs.
///
/// ```ignore
/// async fn get_post(UuidPath(id): UuidPath) -> String {
///     format!("post {}", id)
/// }
/// ```
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        Uuid::parse_str(&id).map(UuidPath).map_err(|_| {
            let body = ErrorResponse::new(ErrorCode::InvalidUuid, format!("Invalid UUID: {}", id));
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        })
    }
}

/// Two UUID path segments, e.g. `/topics/{id}/moderators/{user_id}`.
pub struct UuidPathPair(pub Uuid, pub Uuid);

impl<S> FromRequestParts<S> for UuidPathPair
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((first, second)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        let parse = |raw: &str| {
            Uuid::parse_str(raw).map_err(|_| {
                let body =
                    ErrorResponse::new(ErrorCode::InvalidUuid, format!("Invalid UUID: {}", raw));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            })
        };

        Ok(UuidPathPair(parse(&first)?, parse(&second)?))
    }
}
