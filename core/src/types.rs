//! Domain DTOs for the posts API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Field names are snake_case in Rust and camelCase on the wire, matching the
//! placeholder service. Integration tests catch any schema drift between the
//! two crates.

use serde::{Deserialize, Serialize};

/// A single post as returned by the API and held by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: i64,
    pub id: i64,
    pub title: String,
    pub body: String,
}

/// Request payload for creating a post. Carries no id; the store assigns one
/// locally once the request has been issued.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

impl NewPost {
    /// Attach an identity, producing the record the store will insert.
    pub fn with_id(self, id: i64) -> Post {
        Post {
            user_id: self.user_id,
            id,
            title: self.title,
            body: self.body,
        }
    }
}

/// Snapshot of the store published to subscribers on every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostsState {
    pub items: Vec<Post>,
    /// True while the most recently issued list request is in flight.
    pub loading: bool,
    /// Message from the most recent failed list request.
    pub error: Option<String>,
}
