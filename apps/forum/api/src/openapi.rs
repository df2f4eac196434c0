use domain_forum::{comments, posts, topics, users, votes};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(schemas(axum_helpers::ErrorResponse)),
    info(
        title = "Forum API",
        version = "0.1.0",
        description = "Users, topics, posts with semantic search, threaded comments and votes"
    ),
    servers((url = "/api", description = "API base path")),
    nest(
        (path = "/users", api = users::handlers::ApiDoc),
        (path = "/topics", api = topics::handlers::ApiDoc),
        (path = "/posts", api = posts::handlers::ApiDoc),
        (path = "/votes", api = votes::handlers::ApiDoc)
    )
)]
struct NestedDoc;

/// The combined document. Comment paths are already absolute, so that doc is
/// merged rather than nested.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = NestedDoc::openapi();
        doc.merge(comments::handlers::ApiDoc::openapi());
        doc
    }
}
