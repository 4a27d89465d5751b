//! End-to-end store tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `PostStore` over real
//! HTTP with `ReqwestTransport`. Validates that request building, status
//! handling and the store's update rules agree with the server's schema.

use std::sync::Arc;

use posts_core::{
    ApiError, ClientConfig, ListOutcome, NewPost, PostClient, PostStore, ReqwestTransport,
};

async fn spawn_server(posts: Vec<mock_server::Post>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run_with(listener, posts));
    format!("http://{addr}")
}

fn store_for(base_url: &str) -> PostStore {
    PostStore::from_config(&ClientConfig {
        base_url: base_url.to_string(),
    })
}

#[tokio::test]
async fn crud_lifecycle() {
    let base_url = spawn_server(mock_server::seed_posts(mock_server::SEED_COUNT)).await;
    let store = store_for(&base_url);

    // Step 1: list — mirrors the seeded collection.
    let outcome = store.list().await;
    assert_eq!(outcome, ListOutcome::Loaded(mock_server::SEED_COUNT as usize));
    let state = store.snapshot();
    assert!(!state.loading);
    assert!(state.error.is_none());
    let seeded: Vec<i64> = mock_server::seed_posts(mock_server::SEED_COUNT)
        .iter()
        .map(|p| p.id)
        .collect();
    let loaded: Vec<i64> = state.items.iter().map(|p| p.id).collect();
    assert_eq!(loaded, seeded);

    // Step 2: create — prepended under a local id, not the server's 101.
    let created = store
        .create(NewPost {
            user_id: 1,
            title: "T".to_string(),
            body: "B".to_string(),
        })
        .await;
    assert_ne!(created.id, mock_server::SEED_COUNT + 1);
    assert_eq!(store.snapshot().items[0], created);
    assert_eq!(store.snapshot().items.len(), seeded.len() + 1);

    // Step 3: update a seeded post — replaced in place.
    let mut edited = store.snapshot().items[1].clone();
    edited.title.push_str(" (Updated)");
    store.update(edited.clone()).await.unwrap();
    assert_eq!(store.snapshot().items[1], edited);

    // Step 4: update the locally created post — the service rejects it.
    let mut local = created.clone();
    local.title = "never applied".to_string();
    let err = store.update(local).await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 500, .. }));
    assert_eq!(store.snapshot().items[0], created);

    // Step 5: delete the created post, twice.
    store.delete(created.id).await.unwrap();
    let after_once = store.snapshot();
    store.delete(created.id).await.unwrap();
    assert_eq!(store.snapshot(), after_once);
    assert!(after_once.items.iter().all(|p| p.id != created.id));
    assert_eq!(after_once.items.len(), seeded.len());
}

#[tokio::test]
async fn list_against_missing_route_keeps_items() {
    let base_url = spawn_server(mock_server::seed_posts(3)).await;
    let good = store_for(&base_url);
    assert_eq!(good.list().await, ListOutcome::Loaded(3));

    // A caller-built reqwest client, pointed at a prefix the server does not route.
    let http = reqwest::Client::builder()
        .user_agent("posts-core-tests")
        .build()
        .unwrap();
    let bad = PostStore::new(
        PostClient::new(&format!("{base_url}/v2")),
        Arc::new(ReqwestTransport::with_client(http)),
    );
    let outcome = bad.list().await;
    assert_eq!(outcome, ListOutcome::Failed("resource not found".to_string()));
    assert!(bad.snapshot().items.is_empty());
    assert!(!bad.snapshot().loading);
}

#[tokio::test]
async fn unreachable_service_surfaces_error_and_still_creates() {
    // Bind then drop to get a port with nothing listening on it.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let store = store_for(&format!("http://{addr}"));

    match store.list().await {
        ListOutcome::Failed(error) => assert!(error.starts_with("transport failed")),
        other => panic!("expected failure, got {other:?}"),
    }

    let created = store
        .create(NewPost {
            user_id: 1,
            title: "offline".to_string(),
            body: "b".to_string(),
        })
        .await;
    assert_eq!(store.snapshot().items, vec![created]);

    let err = store.delete(1).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
