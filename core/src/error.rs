//! Error types for the posts API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `Http` with the raw status
//! code and body for debugging. `Transport` covers failures where no response
//! was received at all.

use thiserror::Error;

/// Errors returned by `PostClient` parse methods and `Transport` impls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404 — the requested post does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The request never produced a response (connect, DNS, TLS, body read).
    #[error("transport failed: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(ApiError::NotFound.to_string(), "resource not found");
        let err = ApiError::Http {
            status: 503,
            body: "down".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: down");
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "transport failed: connection refused");
    }
}
