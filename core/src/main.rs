//! Terminal viewer: drives the store through one list/create/update/delete
//! pass and prints the list every time it changes.

use std::sync::Arc;

use posts_core::{ClientConfig, ListOutcome, NewPost, Post, PostStore, PostsState};
use tracing_subscriber::EnvFilter;

const PREVIEW_ROWS: usize = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(base_url = %config.base_url, "starting viewer");
    let store = Arc::new(PostStore::from_config(&config));

    let mut changes = store.subscribe();
    let view = tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            let state = changes.borrow_and_update().clone();
            println!("{}", render(&state));
        }
    });

    replay(&store).await;

    drop(store);
    view.await?;
    Ok(())
}

/// One pass of the page flow: load, add a post, edit the first loaded post,
/// delete the last loaded post. A failed step is reported and the pass goes on.
async fn replay(store: &PostStore) {
    if let ListOutcome::Failed(error) = store.list().await {
        tracing::warn!(%error, "showing posts without a fresh list");
    }

    let created = store
        .create(NewPost {
            user_id: 1,
            title: "New Post".to_string(),
            body: "This is a new post created from the viewer!".to_string(),
        })
        .await;

    // The service rejects edits to ids it never issued, so skip the local post.
    let loaded: Vec<Post> = store
        .snapshot()
        .items
        .into_iter()
        .filter(|p| p.id != created.id)
        .collect();

    if let Some(mut post) = loaded.first().cloned() {
        post.title.push_str(" (Updated)");
        if let Err(error) = store.update(post).await {
            tracing::warn!(%error, "update failed");
        }
    }
    if let Some(last) = loaded.last() {
        if let Err(error) = store.delete(last.id).await {
            tracing::warn!(%error, "delete failed");
        }
    }
}

fn render(state: &PostsState) -> String {
    let mut out = String::new();
    if state.loading {
        out.push_str("Loading...\n");
    }
    if let Some(error) = &state.error {
        out.push_str(&format!("error: {error}\n"));
    }
    out.push_str(&format!("{} posts\n", state.items.len()));
    for post in state.items.iter().take(PREVIEW_ROWS) {
        out.push_str(&format!("  #{:<14} {}\n", post.id, post.title));
    }
    if state.items.len() > PREVIEW_ROWS {
        out.push_str("  ...\n");
    }
    out
}
