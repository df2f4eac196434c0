//! Caller identity forwarded by the authenticating gateway.
//!
//! Token validation happens upstream. The gateway strips any client-supplied
//! `x-user-id` / `x-user-role` headers and sets them from the verified token, so this
//! service only has to trust and parse them.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Role assumed when the gateway forwards an id without a role.
pub const DEFAULT_ROLE: &str = "user";

/// Authenticated caller, available as a request extension and as an extractor.
///
/// Handlers that take `CurrentUser` reject anonymous requests with 401.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: String,
}

impl CurrentUser {
    pub fn new(id: Uuid, role: impl Into<String>) -> Self {
        Self {
            id,
            role: role.into(),
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

fn identity_from_headers(headers: &HeaderMap) -> Result<Option<CurrentUser>, AppError> {
    let Some(raw_id) = headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };

    let id = raw_id
        .to_str()
        .ok()
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .ok_or_else(|| AppError::Unauthorized("Malformed identity header".to_string()))?;

    let role = headers
        .get(USER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_ROLE);

    Ok(Some(CurrentUser::new(id, role)))
}

/// Middleware that turns forwarded identity headers into a [`CurrentUser`] extension.
///
/// Requests without the headers pass through anonymously. A present but malformed
/// user id is rejected with 401.
///
/// ```ignore
/// let app = Router::new()
///     .merge(forum_routes)
///     .layer(axum::middleware::from_fn(forwarded_identity));
/// ```
pub async fn forwarded_identity(mut request: Request, next: Next) -> Response {
    match identity_from_headers(request.headers()) {
        Ok(Some(user)) => {
            tracing::debug!(user_id = %user.id, role = %user.role, "Forwarded identity accepted");
            request.extensions_mut().insert(user);
        }
        Ok(None) => {}
        Err(e) => return e.into_response(),
    }

    next.run(request).await
}
