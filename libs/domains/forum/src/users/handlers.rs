use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    CurrentUser, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::models::{LoginUser, RegisterUser, Role, UserProfile};
use super::repository::UserRepository;
use super::service::UserService;
use crate::error::ForumResult;

pub const TAG: &str = "users";

#[derive(OpenApi)]
#[openapi(
    paths(register_user, login, current_user, get_user, delete_user),
    components(
        schemas(UserProfile, RegisterUser, LoginUser, Role),
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
    tags((name = TAG, description = "User registration, login and profiles"))
)]
pub struct ApiDoc;

pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    Router::new()
        .route("/", post(register_user))
        .route("/login", post(login))
        .route("/me", get(current_user))
        .route("/{id}", get(get_user).delete(delete_user))
        .with_state(Arc::new(service))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User registered", body = UserProfile),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<RegisterUser>,
) -> ForumResult<impl IntoResponse> {
    let profile = service.register(input).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Log in with a username and password
#[utoipa::path(
    post,
    path = "/login",
    tag = TAG,
    request_body = LoginUser,
    responses(
        (status = 200, description = "Credentials accepted", body = UserProfile),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<LoginUser>,
) -> ForumResult<Json<UserProfile>> {
    Ok(Json(service.authenticate(input).await?))
}

/// Profile of the calling user
#[utoipa::path(
    get,
    path = "/me",
    tag = TAG,
    responses(
        (status = 200, description = "Calling user", body = UserProfile),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn current_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    user: CurrentUser,
) -> ForumResult<Json<UserProfile>> {
    Ok(Json(service.current_profile(&user.into()).await?))
}

/// Get a user profile
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserProfile),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
) -> ForumResult<Json<UserProfile>> {
    Ok(Json(service.get_user(id).await?))
}

/// Soft-delete a user (self or sys_admin)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> ForumResult<StatusCode> {
    service.delete_user(&user.into(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
