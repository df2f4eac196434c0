use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    CurrentUser, UuidPath, ValidatedJson,
    errors::responses::{
        BadGatewayResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse,
        ServiceUnavailableResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::models::{CreatePost, Post, UpdatePost};
use super::repository::PostRepository;
use super::service::PostService;
use crate::error::ForumResult;
use crate::ranking::FeedQuery;
use crate::topics::TopicRef;
use crate::users::Author;

pub const TAG: &str = "posts";

#[derive(OpenApi)]
#[openapi(
    paths(list_posts, create_post, get_post, update_post, delete_post),
    components(
        schemas(Post, CreatePost, UpdatePost, Author, TopicRef),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            BadGatewayResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = TAG, description = "Posts and the feed"))
)]
pub struct ApiDoc;

pub fn router<R: PostRepository + 'static>(service: PostService<R>) -> Router {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/{id}", get(get_post).put(update_post).delete(delete_post))
        .with_state(Arc::new(service))
}

/// The feed: newest first, or the ten posts closest to `search`
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(FeedQuery),
    responses(
        (status = 200, description = "Posts in feed order", body = Vec<Post>),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_posts<R: PostRepository>(
    State(service): State<Arc<PostService<R>>>,
    Query(query): Query<FeedQuery>,
) -> ForumResult<Json<Vec<Post>>> {
    Ok(Json(service.list_posts(query).await?))
}

/// Create a post
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreatePost,
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 502, response = BadGatewayResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_post<R: PostRepository>(
    State(service): State<Arc<PostService<R>>>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<CreatePost>,
) -> ForumResult<impl IntoResponse> {
    let post = service.create_post(&user.into(), input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Get a post by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post found", body = Post),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_post<R: PostRepository>(
    State(service): State<Arc<PostService<R>>>,
    UuidPath(id): UuidPath,
) -> ForumResult<Json<Post>> {
    Ok(Json(service.get_post(id).await?))
}

/// Edit a post (author only)
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = UpdatePost,
    responses(
        (status = 200, description = "Post updated", body = Post),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_post<R: PostRepository>(
    State(service): State<Arc<PostService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdatePost>,
) -> ForumResult<Json<Post>> {
    Ok(Json(service.update_post(&user.into(), id, input).await?))
}

/// Soft-delete a post (author only)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_post<R: PostRepository>(
    State(service): State<Arc<PostService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> ForumResult<StatusCode> {
    service.delete_post(&user.into(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
