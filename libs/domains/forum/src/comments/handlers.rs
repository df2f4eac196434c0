use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{
    CurrentUser, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::models::{Comment, CreateComment, UpdateComment};
use super::repository::CommentRepository;
use super::service::CommentService;
use super::tree::CommentNode;
use crate::error::ForumResult;
use crate::users::Author;

pub const TAG: &str = "comments";

#[derive(OpenApi)]
#[openapi(
    paths(comment_tree, create_comment, update_comment, delete_comment),
    components(
        schemas(Comment, CommentNode, CreateComment, UpdateComment, Author),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = TAG, description = "Threaded comments on posts"))
)]
pub struct ApiDoc;

/// Routes carry their full paths (`/posts/{id}/comments`, `/comments/{id}`), so this
/// router is merged rather than nested.
pub fn router<R: CommentRepository + 'static>(service: CommentService<R>) -> Router {
    Router::new()
        .route("/posts/{id}/comments", get(comment_tree).post(create_comment))
        .route("/comments/{id}", put(update_comment).delete(delete_comment))
        .with_state(Arc::new(service))
}

/// The post's comments as a tree
#[utoipa::path(
    get,
    path = "/posts/{id}/comments",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Top-level comments with nested replies", body = Vec<CommentNode>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn comment_tree<R: CommentRepository>(
    State(service): State<Arc<CommentService<R>>>,
    UuidPath(post_id): UuidPath,
) -> ForumResult<Json<Vec<CommentNode>>> {
    Ok(Json(service.comment_tree(post_id).await?))
}

/// Comment on a post, or reply to a comment
#[utoipa::path(
    post,
    path = "/posts/{id}/comments",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = CreateComment,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_comment<R: CommentRepository>(
    State(service): State<Arc<CommentService<R>>>,
    user: CurrentUser,
    UuidPath(post_id): UuidPath,
    ValidatedJson(input): ValidatedJson<CreateComment>,
) -> ForumResult<impl IntoResponse> {
    let comment = service.create_comment(&user.into(), post_id, input).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Edit a comment (author only)
#[utoipa::path(
    put,
    path = "/comments/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Comment ID")),
    request_body = UpdateComment,
    responses(
        (status = 200, description = "Comment updated", body = Comment),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_comment<R: CommentRepository>(
    State(service): State<Arc<CommentService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateComment>,
) -> ForumResult<Json<Comment>> {
    Ok(Json(service.update_comment(&user.into(), id, input).await?))
}

/// Soft-delete a comment (author only)
#[utoipa::path(
    delete,
    path = "/comments/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_comment<R: CommentRepository>(
    State(service): State<Arc<CommentService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> ForumResult<StatusCode> {
    service.delete_comment(&user.into(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
