use axum::{Router, middleware};
use axum_helpers::forwarded_identity;
use domain_forum::{
    CommentService, PgCommentRepository, PgPostRepository, PgTopicRepository, PgUserRepository,
    PgVoteRepository, PostService, TopicService, UserService, VoteService, comments, posts,
    topics, users, votes,
};

use crate::state::AppState;

pub mod health;

/// The forum routes, without the `/api` prefix (`create_router` adds it).
///
/// Caller identity arrives in forwarded headers; the layer turns them into a
/// `CurrentUser` for the handlers that need one.
pub fn routes(state: &AppState) -> Router {
    let db = &state.db;

    Router::new()
        .nest(
            "/users",
            users::handlers::router(UserService::new(PgUserRepository::new(db.clone()))),
        )
        .nest(
            "/topics",
            topics::handlers::router(TopicService::new(PgTopicRepository::new(db.clone()))),
        )
        .nest(
            "/posts",
            posts::handlers::router(PostService::new(
                PgPostRepository::new(db.clone()),
                state.embedder.clone(),
            )),
        )
        // Comment routes span /posts/{id}/comments and /comments/{id}
        .merge(comments::handlers::router(CommentService::new(
            PgCommentRepository::new(db.clone()),
        )))
        .nest(
            "/votes",
            votes::handlers::router(VoteService::new(PgVoteRepository::new(db.clone()))),
        )
        .layer(middleware::from_fn(forwarded_identity))
}

/// `/ready`, with state applied so it merges into the stateless app router.
pub fn ready_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
