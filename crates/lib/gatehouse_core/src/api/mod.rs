//! API gateway, the thin HTTP transport to the backend.
//!
//! [`ApiClient`] is the only component that talks HTTP. Everything above it
//! consumes the typed [`Backend`] surface so views can be exercised against
//! fakes.

pub mod client;
#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AuditEvent, ChatTurn, TokenPair, User, Visitor, VisitorId};
use crate::storage::StorageError;

pub use client::ApiClient;

/// Errors surfaced by the gateway. The gateway never retries.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with status code {status}")]
    Status { status: u16, body: String },

    #[error("Response decode error: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Backend resources used by the client.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /token/`: exchange username/password for credentials.
    async fn obtain_token(&self, username: &str, password: &str) -> Result<TokenPair, ApiError>;

    /// `GET /visitors/`
    async fn list_visitors(&self) -> Result<Vec<Visitor>, ApiError>;

    /// `POST /visitors/{id}/checkin/`
    async fn check_in(&self, id: VisitorId) -> Result<Visitor, ApiError>;

    /// `POST /visitors/{id}/checkout/`
    async fn check_out(&self, id: VisitorId) -> Result<Visitor, ApiError>;

    /// `POST /visitors/{id}/approve/`
    async fn approve(&self, id: VisitorId) -> Result<Visitor, ApiError>;

    /// `POST /visitors/{id}/deny/`
    async fn deny(&self, id: VisitorId) -> Result<Visitor, ApiError>;

    /// `GET /events/`
    async fn list_events(&self) -> Result<Vec<AuditEvent>, ApiError>;

    /// `GET /users/`
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;

    /// `POST /chat/`: returns the assistant's reply.
    async fn chat(&self, history: &[ChatTurn]) -> Result<String, ApiError>;

    /// `POST /register-fcm/`
    async fn register_push_token(&self, registration_id: &str) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_reports_code() {
        let e = ApiError::Status {
            status: 401,
            body: "{}".into(),
        };
        assert!(e.is_unauthorized());
        assert_eq!(e.to_string(), "Request failed with status code 401");
    }

    #[test]
    fn timeout_is_not_unauthorized() {
        assert!(!ApiError::Timeout.is_unauthorized());
        assert_eq!(ApiError::Timeout.status(), None);
    }
}
