//! The post store: authoritative in-memory list of posts plus load status.
//!
//! # Design
//! State lives in a `tokio::sync::watch` channel. The store owns the sender
//! and is the only writer; views call `subscribe` and re-render whenever the
//! receiver reports a change. Every mutation is a single closure run under the
//! channel's lock, so no lock is ever held across a network round-trip.
//!
//! Each operation issues exactly one request through the `Transport` and then
//! applies a fixed rule:
//!
//! | Operation | On success | On failure |
//! |---|---|---|
//! | `list` | replace `items`, clear `loading` | keep `items`, set `error` |
//! | `create` | prepend with a local id | same as success (optimistic, no rollback) |
//! | `update` | replace matching item in place | return the error, no change |
//! | `delete` | remove matching items | return the error, no change |
//!
//! `list` calls are tagged with a generation number. A response that arrives
//! after a newer `list` was issued is dropped, so the latest issued call wins
//! regardless of completion order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::client::PostClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::ids::LocalIds;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{NewPost, Post, PostsState};

/// How a `list` call settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    /// `items` was replaced with this many posts.
    Loaded(usize),
    /// `error` was set; `items` kept its previous contents.
    Failed(String),
    /// A newer `list` was issued before this one settled; nothing was applied.
    Superseded,
}

/// Single writer of the posts state.
///
/// Share it behind an `Arc`; every operation takes `&self` and may run
/// concurrently with the others. Views observe it through `subscribe`.
pub struct PostStore {
    client: PostClient,
    transport: Arc<dyn Transport>,
    state: watch::Sender<PostsState>,
    generation: AtomicU64,
    ids: LocalIds,
}

impl PostStore {
    pub fn new(client: PostClient, transport: Arc<dyn Transport>) -> Self {
        Self {
            client,
            transport,
            state: watch::Sender::new(PostsState::default()),
            generation: AtomicU64::new(0),
            ids: LocalIds::new(),
        }
    }

    /// Store talking to `config.base_url` over reqwest.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            PostClient::new(&config.base_url),
            Arc::new(ReqwestTransport::new()),
        )
    }

    pub fn subscribe(&self) -> watch::Receiver<PostsState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> PostsState {
        self.state.borrow().clone()
    }

    /// Fetch the full collection and replace `items` with it.
    pub async fn list(&self) -> ListOutcome {
        let generation = self.begin_list();
        tracing::debug!(generation, "listing posts");

        let result = self.fetch_all().await;
        let outcome = self.settle_list(generation, result);

        match &outcome {
            ListOutcome::Loaded(count) => tracing::info!(generation, count, "posts loaded"),
            ListOutcome::Failed(error) => tracing::warn!(generation, %error, "failed to load posts"),
            ListOutcome::Superseded => {
                tracing::debug!(generation, "discarding response from superseded list")
            }
        }
        outcome
    }

    /// Issue a new generation and publish `loading`. Both happen under the
    /// channel lock, so a newer generation is never published before an
    /// older one.
    fn begin_list(&self) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
            state.loading = true;
            state.error = None;
        });
        generation
    }

    /// Apply a list result if `generation` is still the latest one issued.
    fn settle_list(&self, generation: u64, result: Result<Vec<Post>, ApiError>) -> ListOutcome {
        let mut outcome = ListOutcome::Superseded;
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::Acquire) != generation {
                return false;
            }
            state.loading = false;
            outcome = match result {
                Ok(items) => {
                    let count = items.len();
                    state.items = items;
                    ListOutcome::Loaded(count)
                }
                Err(err) => {
                    let message = err.to_string();
                    state.error = Some(message.clone());
                    ListOutcome::Failed(message)
                }
            };
            true
        });
        outcome
    }

    /// Send the candidate to the service, then prepend it under a local id.
    ///
    /// The insert happens whether or not the request succeeded; a failure is
    /// only logged.
    pub async fn create(&self, input: NewPost) -> Post {
        match self.send_create(&input).await {
            Ok(echo) => tracing::debug!(remote_id = echo.id, "service accepted post"),
            Err(error) => tracing::warn!(%error, "create request failed, inserting locally"),
        }

        let mut post = input.with_id(0);
        self.state.send_modify(|state| {
            post.id = self.ids.next(|id| state.items.iter().any(|p| p.id == id));
            state.items.insert(0, post.clone());
        });
        tracing::info!(id = post.id, "post created");
        post
    }

    /// Replace the post with the same id, keeping its position. A missing id
    /// is not an error.
    pub async fn update(&self, post: Post) -> Result<(), ApiError> {
        let id = post.id;
        let request = self.client.build_update_post(&post)?;
        let response = self.transport.execute(request).await;
        response
            .and_then(|r| self.client.parse_update_post(r))
            .inspect_err(|error| tracing::warn!(id, %error, "update request failed"))?;

        let replaced = self.state.send_if_modified(|state| {
            match state.items.iter_mut().find(|p| p.id == id) {
                Some(slot) => {
                    *slot = post;
                    true
                }
                None => false,
            }
        });
        tracing::info!(id, replaced, "post updated");
        Ok(())
    }

    /// Remove every post with `id`. A missing id is not an error.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let request = self.client.build_delete_post(id);
        let response = self.transport.execute(request).await;
        response
            .and_then(|r| self.client.parse_delete_post(r))
            .inspect_err(|error| tracing::warn!(id, %error, "delete request failed"))?;

        let removed = self.state.send_if_modified(|state| {
            let before = state.items.len();
            state.items.retain(|p| p.id != id);
            state.items.len() != before
        });
        tracing::info!(id, removed, "post deleted");
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<Post>, ApiError> {
        let response = self.transport.execute(self.client.build_list_posts()).await?;
        self.client.parse_list_posts(response)
    }

    async fn send_create(&self, input: &NewPost) -> Result<Post, ApiError> {
        let request = self.client.build_create_post(input)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_create_post(response)
    }
}
