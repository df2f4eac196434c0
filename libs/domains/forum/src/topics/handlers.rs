use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{
    CurrentUser, UuidPath, UuidPathPair, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::models::{CreateTopic, Topic, UpdateTopic};
use super::repository::TopicRepository;
use super::service::TopicService;
use crate::error::ForumResult;
use crate::users::Author;

pub const TAG: &str = "topics";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_topics,
        create_topic,
        get_topic,
        update_topic,
        delete_topic,
        list_moderators,
        add_moderator,
        remove_moderator,
    ),
    components(
        schemas(Topic, CreateTopic, UpdateTopic, Author),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = TAG, description = "Topics and their moderators"))
)]
pub struct ApiDoc;

pub fn router<R: TopicRepository + 'static>(service: TopicService<R>) -> Router {
    Router::new()
        .route("/", get(list_topics).post(create_topic))
        .route(
            "/{id}",
            get(get_topic).put(update_topic).delete(delete_topic),
        )
        .route("/{id}/moderators", get(list_moderators))
        .route(
            "/{id}/moderators/{user_id}",
            put(add_moderator).delete(remove_moderator),
        )
        .with_state(Arc::new(service))
}

/// List live topics ordered by slug
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "List of topics", body = Vec<Topic>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_topics<R: TopicRepository>(
    State(service): State<Arc<TopicService<R>>>,
) -> ForumResult<Json<Vec<Topic>>> {
    Ok(Json(service.list_topics().await?))
}

/// Create a topic
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateTopic,
    responses(
        (status = 201, description = "Topic created", body = Topic),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_topic<R: TopicRepository>(
    State(service): State<Arc<TopicService<R>>>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<CreateTopic>,
) -> ForumResult<impl IntoResponse> {
    let topic = service.create_topic(&user.into(), input).await?;
    Ok((StatusCode::CREATED, Json(topic)))
}

/// Get a topic by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Topic ID")),
    responses(
        (status = 200, description = "Topic found", body = Topic),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_topic<R: TopicRepository>(
    State(service): State<Arc<TopicService<R>>>,
    UuidPath(id): UuidPath,
) -> ForumResult<Json<Topic>> {
    Ok(Json(service.get_topic(id).await?))
}

/// Update a topic (sys_admin or moderator)
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Topic ID")),
    request_body = UpdateTopic,
    responses(
        (status = 200, description = "Topic updated", body = Topic),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_topic<R: TopicRepository>(
    State(service): State<Arc<TopicService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateTopic>,
) -> ForumResult<Json<Topic>> {
    Ok(Json(service.update_topic(&user.into(), id, input).await?))
}

/// Soft-delete a topic (sys_admin or moderator)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Topic ID")),
    responses(
        (status = 204, description = "Topic deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_topic<R: TopicRepository>(
    State(service): State<Arc<TopicService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> ForumResult<StatusCode> {
    service.delete_topic(&user.into(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List a topic's moderators
#[utoipa::path(
    get,
    path = "/{id}/moderators",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Topic ID")),
    responses(
        (status = 200, description = "Moderators", body = Vec<Author>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_moderators<R: TopicRepository>(
    State(service): State<Arc<TopicService<R>>>,
    UuidPath(id): UuidPath,
) -> ForumResult<Json<Vec<Author>>> {
    Ok(Json(service.list_moderators(id).await?))
}

/// Make a user a moderator of the topic (sys_admin)
#[utoipa::path(
    put,
    path = "/{id}/moderators/{user_id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Topic ID"),
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "Moderator added"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_moderator<R: TopicRepository>(
    State(service): State<Arc<TopicService<R>>>,
    user: CurrentUser,
    UuidPathPair(id, user_id): UuidPathPair,
) -> ForumResult<StatusCode> {
    service.add_moderator(&user.into(), id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a moderator from the topic (sys_admin)
#[utoipa::path(
    delete,
    path = "/{id}/moderators/{user_id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Topic ID"),
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "Moderator removed"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn remove_moderator<R: TopicRepository>(
    State(service): State<Arc<TopicService<R>>>,
    user: CurrentUser,
    UuidPathPair(id, user_id): UuidPathPair,
) -> ForumResult<StatusCode> {
    service.remove_moderator(&user.into(), id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
