use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    CurrentUser, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::models::{CreateVote, TallyQuery, Vote, VoteTally, VoteTargetType};
use super::repository::VoteRepository;
use super::service::VoteService;
use crate::error::ForumResult;

pub const TAG: &str = "votes";

#[derive(OpenApi)]
#[openapi(
    paths(create_vote, tally),
    components(
        schemas(Vote, CreateVote, VoteTally, VoteTargetType),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = TAG, description = "Up/down votes on posts and comments"))
)]
pub struct ApiDoc;

pub fn router<R: VoteRepository + 'static>(service: VoteService<R>) -> Router {
    Router::new()
        .route("/", post(create_vote))
        .route("/tally", get(tally))
        .with_state(Arc::new(service))
}

/// Vote on a post or comment, once per target
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateVote,
    responses(
        (status = 201, description = "Vote recorded", body = Vote),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_vote<R: VoteRepository>(
    State(service): State<Arc<VoteService<R>>>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<CreateVote>,
) -> ForumResult<impl IntoResponse> {
    let vote = service.create_vote(&user.into(), input).await?;
    Ok((StatusCode::CREATED, Json(vote)))
}

/// Score and vote counts of one target
#[utoipa::path(
    get,
    path = "/tally",
    tag = TAG,
    params(TallyQuery),
    responses(
        (status = 200, description = "Vote tally", body = VoteTally),
        (status = 400, description = "Missing or malformed query parameters"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn tally<R: VoteRepository>(
    State(service): State<Arc<VoteService<R>>>,
    Query(query): Query<TallyQuery>,
) -> ForumResult<Json<VoteTally>> {
    Ok(Json(service.tally(query.target()).await?))
}
