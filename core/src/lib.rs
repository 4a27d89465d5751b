//! Client core for the placeholder posts API.
//!
//! # Overview
//! `PostStore` holds the authoritative in-memory list of posts and publishes
//! every change through a watch channel. Its four operations (list, create,
//! update, delete) each issue one request and apply a fixed rule to the list.
//!
//! # Design
//! - `PostClient` is stateless and only builds `HttpRequest` / parses
//!   `HttpResponse` values; it never touches the network.
//! - `Transport` is the one async I/O seam. `ReqwestTransport` is the
//!   production impl; tests plug in fakes or a live mock server.
//! - Created posts get local ids from `LocalIds`. The placeholder service
//!   does not persist writes, so its ids are ignored.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod ids;
pub mod store;
pub mod transport;
pub mod types;

pub use client::PostClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use store::{ListOutcome, PostStore};
pub use transport::{ReqwestTransport, Transport};
pub use types::{NewPost, Post, PostsState};
