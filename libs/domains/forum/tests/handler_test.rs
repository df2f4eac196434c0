//! HTTP-level tests: the domain routers over an `InMemoryStore`, with identity
//! forwarded through headers the way the gateway sends it.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    middleware,
};
use axum_helpers::forwarded_identity;
use axum_helpers::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use domain_embeddings::{
    EMBEDDING_DIMENSION, Embedding, EmbeddingError, EmbeddingProvider, MockEmbeddingProvider,
};
use domain_forum::{
    CommentService, InMemoryStore, PostService, TopicService, UserService, VoteService,
    comments, posts, topics, users, votes,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

fn app(store: InMemoryStore, embedder: Arc<dyn EmbeddingProvider>) -> Router {
    let api = Router::new()
        .nest("/users", users::handlers::router(UserService::new(store.clone())))
        .nest("/topics", topics::handlers::router(TopicService::new(store.clone())))
        .nest(
            "/posts",
            posts::handlers::router(PostService::new(store.clone(), embedder)),
        )
        .merge(comments::handlers::router(CommentService::new(store.clone())))
        .nest("/votes", votes::handlers::router(VoteService::new(store)));

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn(forwarded_identity))
}

fn working_embedder() -> Arc<dyn EmbeddingProvider> {
    let mut mock = MockEmbeddingProvider::new();
    mock.expect_embed().returning(|text| {
        let mut values = vec![0.0; EMBEDDING_DIMENSION];
        values[text.len() % EMBEDDING_DIMENSION] = 1.0;
        Ok(Embedding::new(values).unwrap())
    });
    Arc::new(mock)
}

fn failing_embedder() -> Arc<dyn EmbeddingProvider> {
    let mut mock = MockEmbeddingProvider::new();
    mock.expect_embed().returning(|_| {
        Err(EmbeddingError::Api {
            status: 500,
            body: "upstream down".into(),
        })
    });
    Arc::new(mock)
}

struct Client {
    app: Router,
}

impl Client {
    fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            app: app(InMemoryStore::seeded(), embedder),
        }
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        identity: Option<(Uuid, &str)>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some((id, role)) = identity {
            request = request
                .header(USER_ID_HEADER, id.to_string())
                .header(USER_ROLE_HEADER, role);
        }
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn register(&self, username: &str) -> Uuid {
        let (status, body) = self
            .send(
                "POST",
                "/api/users",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "correct horse battery"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().parse().unwrap()
    }

    async fn create_post(&self, author: Uuid, title: &str) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/api/posts",
                Some((author, "user")),
                Some(json!({ "title": title, "body": "Some thoughts" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}

#[tokio::test]
async fn test_register_hides_credentials() {
    let client = Client::new(working_embedder());
    let id = client.register("alice").await;

    let (status, body) = client
        .send("GET", &format!("/api/users/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "user");
    assert!(body.get("password_hash").is_none());
    assert!(body.get("email").is_none());
}

#[tokio::test]
async fn test_login_and_current_user() {
    let client = Client::new(working_embedder());
    let id = client.register("alice").await;

    let (status, body) = client
        .send(
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "username": "alice", "password": "correct horse battery" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["id"], id.to_string());
    assert!(body.get("password_hash").is_none());

    let (status, body) = client
        .send("GET", "/api/users/me", Some((id, "user")), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    let (status, _) = client.send("GET", "/api/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bad_login_does_not_reveal_which_part_was_wrong() {
    let client = Client::new(working_embedder());
    client.register("alice").await;

    let (wrong_status, wrong_password) = client
        .send(
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "username": "alice", "password": "not the password" })),
        )
        .await;
    let (unknown_status, unknown_user) = client
        .send(
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "username": "mallory", "password": "correct horse battery" })),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_user);
}

#[tokio::test]
async fn test_deleted_user_cannot_log_in() {
    let client = Client::new(working_embedder());
    let id = client.register("alice").await;

    let (status, _) = client
        .send("DELETE", &format!("/api/users/{id}"), Some((id, "user")), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = client
        .send(
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "username": "alice", "password": "correct horse battery" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = client
        .send("GET", "/api/users/me", Some((id, "user")), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_registration_is_validation_error() {
    let client = Client::new(working_embedder());
    let (status, body) = client
        .send(
            "POST",
            "/api/users",
            None,
            Some(json!({ "username": "a", "email": "nope", "password": "short" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_post_requires_identity() {
    let client = Client::new(working_embedder());
    let (status, _) = client
        .send(
            "POST",
            "/api/posts",
            None,
            Some(json!({ "title": "Hi", "body": "there" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_post_lifecycle_and_ownership() {
    let client = Client::new(working_embedder());
    let alice = client.register("alice").await;
    let bob = client.register("bob").await;

    let post = client.create_post(alice, "Lifetimes").await;
    assert_eq!(post["topic"]["slug"], "general");
    assert_eq!(post["author"]["username"], "alice");
    let uri = format!("/api/posts/{}", post["id"].as_str().unwrap());

    let edit = json!({ "title": "Lifetimes, revisited" });
    let (status, body) = client
        .send("PUT", &uri, Some((bob, "sys_admin")), Some(edit.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let (status, body) = client
        .send("PUT", &uri, Some((alice, "user")), Some(edit))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Lifetimes, revisited");

    let (status, _) = client.send("DELETE", &uri, Some((bob, "user")), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = client.send("DELETE", &uri, Some((alice, "user")), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = client.send("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_embedding_outage_maps_to_gateway_errors() {
    let client = Client::new(failing_embedder());
    let alice = client.register("alice").await;

    let (status, body) = client
        .send(
            "POST",
            "/api/posts",
            Some((alice, "user")),
            Some(json!({ "title": "Hi", "body": "there" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(!body["message"].as_str().unwrap().contains("upstream down"));

    let (status, _) = client
        .send("GET", "/api/posts?search=rust%20ownership", None, None)
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = client.send("GET", "/api/posts", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_feed_filters_by_topic() {
    let client = Client::new(working_embedder());
    let alice = client.register("alice").await;

    let (status, topic) = client
        .send(
            "POST",
            "/api/topics",
            Some((alice, "user")),
            Some(json!({ "slug": "rust", "title": "Rust" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let topic_id = topic["id"].as_str().unwrap();

    client.create_post(alice, "In general").await;
    let (status, _) = client
        .send(
            "POST",
            "/api/posts",
            Some((alice, "user")),
            Some(json!({ "title": "Borrowck", "body": "why", "topic_id": topic_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, all) = client.send("GET", "/api/posts", None, None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, filtered) = client
        .send("GET", &format!("/api/posts?topic_id={topic_id}"), None, None)
        .await;
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["title"], "Borrowck");
}

#[tokio::test]
async fn test_duplicate_topic_slug_is_conflict() {
    let client = Client::new(working_embedder());
    let alice = client.register("alice").await;
    let topic = json!({ "slug": "tech", "title": "Technology" });

    let (status, _) = client
        .send("POST", "/api/topics", Some((alice, "user")), Some(topic.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = client
        .send("POST", "/api/topics", Some((alice, "user")), Some(topic))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_comment_tree_over_http() {
    let client = Client::new(working_embedder());
    let alice = client.register("alice").await;
    let bob = client.register("bob").await;
    let post = client.create_post(alice, "Threads").await;
    let comments_uri = format!("/api/posts/{}/comments", post["id"].as_str().unwrap());

    let (status, root) = client
        .send(
            "POST",
            &comments_uri,
            Some((alice, "user")),
            Some(json!({ "body": "root" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, reply) = client
        .send(
            "POST",
            &comments_uri,
            Some((bob, "user")),
            Some(json!({ "body": "reply", "parent_id": root["id"] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, tree) = client.send("GET", &comments_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tree[0]["comment"]["body"], "root");
    assert_eq!(tree[0]["replies"][0]["comment"]["id"], reply["id"]);
    assert_eq!(tree[0]["replies"][0]["comment"]["author"]["username"], "bob");

    let reply_uri = format!("/api/comments/{}", reply["id"].as_str().unwrap());
    let (status, _) = client
        .send("PUT", &reply_uri, Some((alice, "user")), Some(json!({ "body": "edited" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = client.send("DELETE", &reply_uri, Some((bob, "user")), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, tree) = client.send("GET", &comments_uri, None, None).await;
    assert_eq!(tree[0]["replies"], json!([]));
}

#[tokio::test]
async fn test_votes_once_per_target() {
    let client = Client::new(working_embedder());
    let alice = client.register("alice").await;
    let post = client.create_post(alice, "Vote on me").await;
    let vote = |value: i32| json!({ "target_type": "post", "target_id": post["id"], "value": value });

    let (status, _) = client
        .send("POST", "/api/votes", Some((alice, "user")), Some(vote(2)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = client
        .send("POST", "/api/votes", Some((alice, "user")), Some(vote(1)))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = client
        .send("POST", "/api/votes", Some((alice, "user")), Some(vote(-1)))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, tally) = client
        .send(
            "GET",
            &format!(
                "/api/votes/tally?target_type=post&target_id={}",
                post["id"].as_str().unwrap()
            ),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tally["score"], 1);
    assert_eq!(tally["upvotes"], 1);
    assert_eq!(tally["downvotes"], 0);
}

#[tokio::test]
async fn test_malformed_path_id_is_bad_request() {
    let client = Client::new(working_embedder());
    let (status, body) = client.send("GET", "/api/posts/not-a-uuid", None, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_UUID");
}
