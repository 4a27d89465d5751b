//! In-process stand-in for the placeholder posts service.
//!
//! Serves a fixed, seeded collection and answers writes the way the public
//! service does: plausible echoes, nothing stored.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Number of posts the default app is seeded with.
pub const SEED_COUNT: i64 = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: i64,
    pub id: i64,
    pub title: String,
    pub body: String,
}

/// Body accepted by create and update. Any `id` in the body is ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

pub type Posts = Arc<Vec<Post>>;

/// Deterministic seed data: ten posts per user.
pub fn seed_posts(count: i64) -> Vec<Post> {
    (1..=count)
        .map(|id| Post {
            user_id: (id - 1) / 10 + 1,
            id,
            title: format!("post {id}"),
            body: format!("body of post {id}"),
        })
        .collect()
}

pub fn app() -> Router {
    app_with(seed_posts(SEED_COUNT))
}

pub fn app_with(posts: Vec<Post>) -> Router {
    let posts: Posts = Arc::new(posts);
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", get(get_post).put(update_post).delete(delete_post))
        .layer(TraceLayer::new_for_http())
        .with_state(posts)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, posts: Vec<Post>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(posts)).await
}

async fn list_posts(State(posts): State<Posts>) -> Json<Vec<Post>> {
    Json(posts.as_ref().clone())
}

async fn get_post(
    State(posts): State<Posts>,
    Path(id): Path<i64>,
) -> Result<Json<Post>, (StatusCode, Json<Value>)> {
    find(&posts, id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, Json(json!({}))))
}

/// Echoes the input with the next id. The collection is left as is.
async fn create_post(
    State(posts): State<Posts>,
    Json(input): Json<PostInput>,
) -> (StatusCode, Json<Post>) {
    let post = input.into_post(posts.len() as i64 + 1);
    tracing::debug!(id = post.id, "create echoed");
    (StatusCode::CREATED, Json(post))
}

/// Echoes the input under the path id. Unknown ids fail with a 500, as the
/// public service does.
async fn update_post(
    State(posts): State<Posts>,
    Path(id): Path<i64>,
    Json(input): Json<PostInput>,
) -> Result<Json<Post>, (StatusCode, String)> {
    if find(&posts, id).is_none() {
        tracing::debug!(id, "update of unknown post");
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("TypeError: Cannot read properties of undefined (reading 'id') [{id}]"),
        ));
    }
    Ok(Json(input.into_post(id)))
}

/// Always succeeds with an empty object.
async fn delete_post(Path(id): Path<i64>) -> Json<Value> {
    tracing::debug!(id, "delete acknowledged");
    Json(json!({}))
}

fn find(posts: &[Post], id: i64) -> Option<&Post> {
    posts.iter().find(|p| p.id == id)
}

impl PostInput {
    fn into_post(self, id: i64) -> Post {
        Post {
            user_id: self.user_id,
            id,
            title: self.title,
            body: self.body,
        }
    }
}
